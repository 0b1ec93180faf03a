//! Data error types.

use thiserror::Error;

/// Errors raised while collecting observations or resolving a location.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DataError {
    /// HTTP request failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse a response or stored value
    #[error("Parse error: {0}")]
    ParseError(String),

    /// No data returned
    #[error("No data returned")]
    NoData,

    /// API error from data provider
    #[error("API error [{code}]: {description}")]
    ApiError { code: String, description: String },

    /// Relational store failure
    #[error("Database error: {0}")]
    Database(String),

    /// The location could not be determined (permission denied, no fix)
    #[error("Location unavailable: {0}")]
    LocationUnavailable(String),

    /// Coordinates are non-numeric or out of range
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DataError {
    /// Whether the failure came from the user's location input
    pub fn is_location_problem(&self) -> bool {
        matches!(
            self,
            DataError::LocationUnavailable(_) | DataError::InvalidCoordinates(_)
        )
    }
}

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;
