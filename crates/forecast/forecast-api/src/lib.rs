//! Forecast Consumer API
//!
//! Consumer configuration and builder APIs for the one-step forecasting
//! pipeline.
//!
//! This crate provides:
//! - A builder for [`ForecastConfig`]
//! - TOML and environment loading of the configuration
//! - Re-exports from SPI and core for convenience

pub mod builder;
pub mod loader;

pub use builder::ForecastConfigBuilder;
pub use loader::{
    apply_env_overrides, apply_overrides, from_toml_str, load_config, ENV_MIN_HISTORY,
    ENV_MODEL_PATH, ENV_WINDOW_SIZE,
};

// Re-export from core
pub use forecast_core::{
    clean_series, config, lstm, normalize, pipeline, predict_next, store, trailing_window, window,
    ForecastConfig, ForecastPipeline, JsonModelLoader, LstmModel, LstmWeights, ModelStore,
    NormalizeStep, Serialized, DEFAULT_MIN_HISTORY, DEFAULT_MODEL_PATH, DEFAULT_WINDOW_SIZE,
};

// Re-export traits from SPI
pub use forecast_spi::{
    ExclusiveModel, Forecast, ForecastError, ModelLoader, ModelResult, PipelineStep, Result,
    SequenceModel, SharedModel, Window,
};

/// Open a pipeline and the store caching its model.
///
/// The model is loaded eagerly so a missing or corrupt file is reported at
/// startup rather than on the first request.
pub fn open_pipeline(config: ForecastConfig) -> Result<(ForecastPipeline, ModelStore)> {
    config.validate()?;
    let store = ModelStore::open(config.model_path.clone(), JsonModelLoader)?;
    let pipeline = ForecastPipeline::from_store(config, &store)?;
    Ok((pipeline, store))
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        apply_env_overrides, load_config, open_pipeline, ForecastConfigBuilder,
    };
    pub use forecast_core::{
        predict_next, ForecastConfig, ForecastPipeline, JsonModelLoader, ModelStore,
        NormalizeStep,
    };
    pub use forecast_spi::{
        Forecast, ForecastError, PipelineStep, Result, SequenceModel, SharedModel, Window,
    };
}
