//! Forecast Core
//!
//! Core implementations for the one-step forecasting pipeline: min-max
//! scaling, windowing, the LSTM engine and model caching.

pub mod config;
pub mod lstm;
pub mod normalize;
pub mod pipeline;
pub mod store;
pub mod window;

// Re-export SPI traits for implementations
pub use forecast_spi::{
    ExclusiveModel, Forecast, ForecastError, ModelLoader, ModelResult, PipelineStep, Result,
    SequenceModel, SharedModel, Window,
};

// Re-export main types
pub use config::{ForecastConfig, DEFAULT_MIN_HISTORY, DEFAULT_MODEL_PATH, DEFAULT_WINDOW_SIZE};
pub use lstm::{DenseLayer, LstmLayer, LstmModel, LstmWeights};
pub use normalize::NormalizeStep;
pub use pipeline::{predict_next, ForecastPipeline};
pub use store::{JsonModelLoader, ModelStore, Serialized};
pub use window::{clean_series, trailing_window};
