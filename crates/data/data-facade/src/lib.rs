//! Data Source Facade
//!
//! Unified re-exports for the data module.
//!
//! This facade provides a single entry point for all data source functionality:
//! - `data_spi` - Observation types, traits and errors
//! - `data_api` - Fetch configuration and builders
//! - `data_core` - Implementations (Open-Meteo, SQLite, location providers)
//!
//! # Example
//!
//! ```rust,ignore
//! use data_facade::{fetch_location, pollutant_series, Coordinates, Pollutant};
//!
//! #[tokio::main]
//! async fn main() {
//!     let rows = fetch_location(Coordinates::default()).await.unwrap();
//!     let co = pollutant_series(&rows, Pollutant::Co);
//!     println!("Got {} CO readings", co.len());
//! }
//! ```

// Re-export everything from SPI
pub use data_spi::*;

// Re-export everything from API
pub use data_api::*;

// Re-export everything from Core
pub use data_core::*;
