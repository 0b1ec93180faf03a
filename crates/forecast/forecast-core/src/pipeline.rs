//! One-step forecasting pipeline
//!
//! Cleans the series, fits a min-max scaler on it, feeds the trailing window
//! to the model and maps the output back to the series' units.

use std::sync::Arc;

use forecast_spi::{Forecast, ForecastError, PipelineStep, Result, SequenceModel, SharedModel};

use crate::config::{ForecastConfig, DEFAULT_MIN_HISTORY};
use crate::normalize::NormalizeStep;
use crate::store::{JsonModelLoader, ModelStore};
use crate::window::{clean_series, trailing_window};

/// Predicts the next value of a pollutant series with a loaded model
pub struct ForecastPipeline {
    config: ForecastConfig,
    model: SharedModel,
}

impl ForecastPipeline {
    /// Build a pipeline around an already loaded model
    pub fn new(config: ForecastConfig, model: SharedModel) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, model })
    }

    /// Validate the config and load the model stored at `config.model_path`
    pub fn from_config(config: ForecastConfig) -> Result<Self> {
        config.validate()?;
        let store = ModelStore::open(config.model_path.clone(), JsonModelLoader)?;
        let model = store.get()?;
        Self::new(config, model)
    }

    /// Build a pipeline sharing the model cached in `store`
    pub fn from_store<L: forecast_spi::ModelLoader>(
        config: ForecastConfig,
        store: &ModelStore<L>,
    ) -> Result<Self> {
        config.validate()?;
        let model = store.get()?;
        Self::new(config, model)
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    pub fn model(&self) -> SharedModel {
        Arc::clone(&self.model)
    }

    /// Predict the value immediately following the last observation
    pub fn predict_next(&self, series: &[f64]) -> Result<f64> {
        self.predict_next_detailed(series).map(|f| f.value)
    }

    /// Same as [`predict_next`](Self::predict_next), keeping the scaling state
    pub fn predict_next_detailed(&self, series: &[f64]) -> Result<Forecast> {
        run(
            self.model.as_ref(),
            series,
            self.config.window_size,
            self.config.required_points(),
        )
    }
}

/// Predict the next value of `series` with `model` using the default
/// minimum history
pub fn predict_next(model: &dyn SequenceModel, series: &[f64], window_size: usize) -> Result<f64> {
    let config = ForecastConfig {
        window_size,
        ..ForecastConfig::default()
    };
    config.validate()?;
    let required = DEFAULT_MIN_HISTORY.max(window_size.saturating_add(1));
    run(model, series, window_size, required).map(|f| f.value)
}

fn run(
    model: &dyn SequenceModel,
    series: &[f64],
    window_size: usize,
    required: usize,
) -> Result<Forecast> {
    let usable = clean_series(series);
    let dropped = series.len() - usable.len();
    if dropped > 0 {
        tracing::warn!(dropped, kept = usable.len(), "dropped missing values from series");
    }

    if usable.len() < required {
        return Err(ForecastError::InsufficientData {
            required,
            actual: usable.len(),
        });
    }

    let mut scaler = NormalizeStep::new();
    scaler.fit(&usable)?;
    let scaled = scaler.transform(&usable)?;
    let window = trailing_window(&scaled, window_size)?;

    let inference_error = |reason: String| ForecastError::Inference {
        reason,
        window_shape: window.shape(),
        series_len: usable.len(),
    };

    let output = model
        .predict(&window)
        .map_err(|e| inference_error(e.to_string()))?;
    if !output.is_finite() {
        return Err(inference_error(format!("model output is {}", output)));
    }

    let value = scaler.unscale_value(output)?;
    if !value.is_finite() {
        return Err(inference_error(format!(
            "de-normalized output overflowed from {}",
            output
        )));
    }

    let (min, max) = match (scaler.min(), scaler.max()) {
        (Some(min), Some(max)) => (min, max),
        _ => return Err(ForecastError::NotFitted),
    };

    tracing::debug!(
        model = model.name(),
        window = window_size,
        points = usable.len(),
        scaled = output,
        value,
        "predicted next value"
    );

    Ok(Forecast {
        value,
        scaled: output,
        min,
        max,
        points_used: usable.len(),
        points_dropped: dropped,
        window_size,
    })
}
