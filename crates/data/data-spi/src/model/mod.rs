//! Data models for air-quality observations.

mod coordinates;
mod observation;
mod pollutant;
mod utils;

pub use coordinates::{Coordinates, DEFAULT_LATITUDE, DEFAULT_LONGITUDE};
pub use observation::Observation;
pub use pollutant::Pollutant;
pub use utils::{
    latest_value, next_timestamp, pollutant_series, raw_series, short_term_trend, Trend,
    TREND_SAMPLES,
};
