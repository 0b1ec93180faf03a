//! Forecast result model

use serde::{Deserialize, Serialize};

/// A one-step forecast together with the state that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    /// Forecast in the original units of the series
    pub value: f64,
    /// Raw model output before inverse scaling
    pub scaled: f64,
    /// Minimum of the usable series
    pub min: f64,
    /// Maximum of the usable series
    pub max: f64,
    /// Number of usable (non-missing) points the scaler was fitted on
    pub points_used: usize,
    /// Number of missing entries dropped from the input
    pub points_dropped: usize,
    /// Length of the window passed to the model
    pub window_size: usize,
}
