//! Missing-value filtering and trailing window extraction

use forecast_spi::{ForecastError, Result, Window};

/// Drop missing entries, keeping the chronological order.
///
/// `NaN` marks a missing observation. Infinite values cannot be scaled and
/// are dropped the same way.
pub fn clean_series(series: &[f64]) -> Vec<f64> {
    series.iter().copied().filter(|v| v.is_finite()).collect()
}

/// Take the last `window_size` values as a model window
pub fn trailing_window(scaled: &[f64], window_size: usize) -> Result<Window> {
    if window_size == 0 {
        return Err(ForecastError::InvalidParameter {
            name: "window_size".to_string(),
            reason: "must be positive".to_string(),
        });
    }
    if scaled.len() < window_size {
        return Err(ForecastError::InsufficientData {
            required: window_size,
            actual: scaled.len(),
        });
    }
    Ok(Window::new(scaled[scaled.len() - window_size..].to_vec()))
}
