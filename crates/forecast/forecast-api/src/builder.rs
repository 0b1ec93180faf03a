//! Forecast configuration builder.

use std::path::PathBuf;

use forecast_core::ForecastConfig;
use forecast_spi::Result;

/// Builder for [`ForecastConfig`].
#[derive(Debug, Clone, Default)]
pub struct ForecastConfigBuilder {
    config: ForecastConfig,
}

impl ForecastConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration.
    pub fn from_config(config: ForecastConfig) -> Self {
        Self { config }
    }

    /// Set the model weight file.
    pub fn model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.model_path = path.into();
        self
    }

    /// Set the trailing window length.
    pub fn window_size(mut self, window_size: usize) -> Self {
        self.config.window_size = window_size;
        self
    }

    /// Set the minimum usable history.
    pub fn min_history(mut self, min_history: usize) -> Self {
        self.config.min_history = min_history;
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> Result<ForecastConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
