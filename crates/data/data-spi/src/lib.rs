//! Data Source Service Provider Interface
//!
//! Defines traits and types for collecting hourly air-quality observations
//! and resolving the location they are collected for.

pub mod contract;
pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use contract::{LocationProvider, SeriesSource};
pub use error::{DataError, Result};
pub use model::{
    latest_value, next_timestamp, pollutant_series, raw_series, short_term_trend, Coordinates,
    Observation, Pollutant, Trend, DEFAULT_LATITUDE, DEFAULT_LONGITUDE, TREND_SAMPLES,
};
