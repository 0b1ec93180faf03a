//! Min-max normalization step

use forecast_spi::{ForecastError, PipelineStep, Result};
use serde::{Deserialize, Serialize};

/// Normalize data to the [0, 1] range observed during `fit`.
///
/// A constant series has no range to scale by and is rejected with
/// [`ForecastError::DegenerateSeries`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NormalizeStep {
    range: Option<(f64, f64)>,
}

impl NormalizeStep {
    pub fn new() -> Self {
        Self { range: None }
    }

    /// Build an already fitted step from a known `(min, max)` pair
    pub fn with_range(min: f64, max: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() || min > max || !(max - min).is_finite() {
            return Err(ForecastError::InvalidParameter {
                name: "range".to_string(),
                reason: format!("expected finite min <= max, got ({}, {})", min, max),
            });
        }
        if min == max {
            return Err(ForecastError::DegenerateSeries { value: min, len: 0 });
        }
        Ok(Self {
            range: Some((min, max)),
        })
    }

    pub fn min(&self) -> Option<f64> {
        self.range.map(|(min, _)| min)
    }

    pub fn max(&self) -> Option<f64> {
        self.range.map(|(_, max)| max)
    }

    pub fn is_fitted(&self) -> bool {
        self.range.is_some()
    }

    fn fitted_range(&self) -> Result<(f64, f64)> {
        self.range.ok_or(ForecastError::NotFitted)
    }

    /// Scale a single value
    pub fn scale_value(&self, x: f64) -> Result<f64> {
        let (min, max) = self.fitted_range()?;
        Ok((x - min) / (max - min))
    }

    /// Undo the scaling of a single value
    pub fn unscale_value(&self, x: f64) -> Result<f64> {
        let (min, max) = self.fitted_range()?;
        Ok(x * (max - min) + min)
    }
}

impl PipelineStep for NormalizeStep {
    fn fit(&mut self, data: &[f64]) -> Result<()> {
        if data.is_empty() {
            return Err(ForecastError::InsufficientData {
                required: 2,
                actual: 0,
            });
        }
        if data.iter().any(|x| !x.is_finite()) {
            return Err(ForecastError::InvalidParameter {
                name: "data".to_string(),
                reason: "contains missing or non-finite values".to_string(),
            });
        }

        let min = data.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = data.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        if min == max {
            self.range = None;
            return Err(ForecastError::DegenerateSeries {
                value: min,
                len: data.len(),
            });
        }

        if !(max - min).is_finite() {
            self.range = None;
            return Err(ForecastError::InvalidParameter {
                name: "data".to_string(),
                reason: format!("range from {} to {} is too wide to scale", min, max),
            });
        }

        self.range = Some((min, max));
        Ok(())
    }

    fn transform(&self, data: &[f64]) -> Result<Vec<f64>> {
        let (min, max) = self.fitted_range()?;
        let range = max - min;
        Ok(data.iter().map(|&x| (x - min) / range).collect())
    }

    fn inverse_transform(&self, data: &[f64]) -> Result<Vec<f64>> {
        let (min, max) = self.fitted_range()?;
        let range = max - min;
        Ok(data.iter().map(|&x| x * range + min).collect())
    }

    fn name(&self) -> &str {
        "normalize"
    }
}
