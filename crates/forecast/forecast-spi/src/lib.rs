//! Forecast Service Provider Interface
//!
//! Defines the contracts of the one-step forecasting pipeline: scaling
//! steps, sequence models and the loaders that bring them in from storage.

pub mod contract;
pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use contract::{ExclusiveModel, ModelLoader, ModelResult, PipelineStep, SequenceModel, SharedModel};
pub use error::{ForecastError, Result};
pub use model::{Forecast, Window};
