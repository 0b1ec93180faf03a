//! Forecast error types

use thiserror::Error;

/// Errors that can occur while producing a one-step forecast
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Fewer usable points than one window plus the minimum history
    #[error("Insufficient data: need at least {required} points, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// Every usable value is identical, so min-max scaling is undefined
    #[error("Degenerate series: all {len} values equal {value}, no signal to scale")]
    DegenerateSeries { value: f64, len: usize },

    /// The persisted model is missing or cannot be deserialized
    #[error("Model unavailable at '{path}': {reason}")]
    ModelUnavailable { path: String, reason: String },

    /// The model rejected the window or produced a non-finite value
    #[error(
        "Inference failed for window shape {window_shape:?} over {series_len} points: {reason}"
    )]
    Inference {
        reason: String,
        window_shape: [usize; 3],
        series_len: usize,
    },

    /// Invalid parameter value
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// Scaling step used before it was fitted
    #[error("Pipeline step must be fitted before transformation")]
    NotFitted,
}

impl ForecastError {
    /// Whether the caller can recover by collecting more or different data
    pub fn is_data_problem(&self) -> bool {
        matches!(
            self,
            ForecastError::InsufficientData { .. } | ForecastError::DegenerateSeries { .. }
        )
    }
}
