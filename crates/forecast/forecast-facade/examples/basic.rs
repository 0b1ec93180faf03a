//! Basic example demonstrating the one-step CO forecast
//!
//! Run with: cargo run --example basic -p forecast-facade

use std::sync::Arc;

use forecast_facade::prelude::*;
use forecast_facade::ModelResult;

/// Persistence model: predicts the last observed value
struct Persistence;

impl SequenceModel for Persistence {
    fn predict(&self, window: &Window) -> ModelResult<f64> {
        window.last().ok_or_else(|| "empty window".into())
    }

    fn name(&self) -> &str {
        "persistence"
    }
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    println!("=== One-step CO forecast ===\n");

    let series: Vec<f64> = (0..48)
        .map(|h| 0.3 + 0.08 * ((h % 24) as f64 / 24.0 * std::f64::consts::TAU).sin())
        .collect();

    let config = ForecastConfigBuilder::new().window_size(24).build()?;
    let pipeline = ForecastPipeline::new(config, Arc::new(Persistence))?;

    let forecast = pipeline.predict_next_detailed(&series)?;
    println!("Points used:  {}", forecast.points_used);
    println!("Scaled range: [{:.3}, {:.3}]", forecast.min, forecast.max);
    println!("Model output: {:.3}", forecast.scaled);
    println!("Next CO:      {:.3}", forecast.value);

    match pipeline.predict_next(&series[..10]) {
        Err(e) => println!("\nShort series: {}", e),
        Ok(v) => println!("\nUnexpected forecast {}", v),
    }

    Ok(())
}
