//! Forecast Facade
//!
//! High-level API for one-step pollutant forecasting. Re-exports all public
//! types from the forecast stack for convenient usage.

// Re-export everything from API (which includes SPI and core)
pub use forecast_api::*;

// Explicit re-exports for documentation
pub use forecast_api::prelude;

// Re-export model weight types at root
pub use forecast_core::lstm::{DenseLayer, LstmLayer};
