//! Data Source Consumer API
//!
//! Configuration types and builders for air-quality data sources.

pub mod config;

pub use config::{
    FetchConfig, FetchConfigBuilder, AIR_QUALITY_URL, DEFAULT_DATABASE, DEFAULT_PAST_DAYS,
    MAX_PAST_DAYS, WEATHER_URL,
};
