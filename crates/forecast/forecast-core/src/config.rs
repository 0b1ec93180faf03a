//! Pipeline configuration

use std::path::PathBuf;

use forecast_spi::{ForecastError, Result};
use serde::{Deserialize, Serialize};

/// Default trailing window: one day of hourly samples
pub const DEFAULT_WINDOW_SIZE: usize = 24;

/// Default minimum number of usable points before a forecast is attempted
pub const DEFAULT_MIN_HISTORY: usize = 30;

/// Default location of the CO model weights
pub const DEFAULT_MODEL_PATH: &str = "models/co_lstm.json";

/// Configuration passed to the forecast pipeline constructor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Location of the persisted forecast model
    pub model_path: PathBuf,
    /// Trailing window length fed to the model
    pub window_size: usize,
    /// Minimum usable series length required before predicting
    pub min_history: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            window_size: DEFAULT_WINDOW_SIZE,
            min_history: DEFAULT_MIN_HISTORY,
        }
    }
}

impl ForecastConfig {
    /// Number of usable points a series needs.
    ///
    /// The window must be strictly shorter than the series, so the result is
    /// never below `window_size + 1` whatever `min_history` says.
    pub fn required_points(&self) -> usize {
        self.min_history.max(self.window_size.saturating_add(1))
    }

    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(ForecastError::InvalidParameter {
                name: "window_size".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ForecastConfig::default();
        assert_eq!(config.window_size, 24);
        assert_eq!(config.min_history, 30);
        assert_eq!(config.model_path, PathBuf::from("models/co_lstm.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_required_points_uses_min_history() {
        let config = ForecastConfig::default();
        assert_eq!(config.required_points(), 30);
    }

    #[test]
    fn test_required_points_never_below_window_plus_one() {
        let config = ForecastConfig {
            min_history: 0,
            ..ForecastConfig::default()
        };
        assert_eq!(config.required_points(), 25);
    }

    #[test]
    fn test_zero_window_rejected() {
        let config = ForecastConfig {
            window_size: 0,
            ..ForecastConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ForecastError::InvalidParameter { ref name, .. }) if name == "window_size"
        ));
    }

    #[test]
    fn test_huge_window_saturates() {
        let config = ForecastConfig {
            window_size: usize::MAX,
            ..ForecastConfig::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.required_points(), usize::MAX);
    }
}
