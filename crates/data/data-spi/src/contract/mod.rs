//! Contracts for observation sources and location providers.

mod location_provider;
mod series_source;

pub use location_provider::LocationProvider;
pub use series_source::SeriesSource;
