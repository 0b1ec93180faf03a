//! Data Source Core
//!
//! Implementations for observation sources and location providers.

pub mod location;
pub mod open_meteo;
pub mod sqlite;
pub mod timestamp;

pub use location::{
    BrowserLocationProvider, BrowserPosition, FallbackLocationProvider, ManualLocationProvider,
};
pub use open_meteo::{build_url, merge_observations, parse_hourly, AirQualityClient};
pub use sqlite::{SqliteStore, TABLE};
pub use timestamp::{format_timestamp, parse_timestamp};

#[cfg(feature = "fetch")]
pub use open_meteo::fetch_location;
