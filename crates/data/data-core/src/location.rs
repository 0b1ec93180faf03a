//! Location providers
//!
//! The browser variant wraps whatever the browser's geolocation prompt
//! reported; the manual variant parses coordinates typed by the user.

use async_trait::async_trait;
use data_spi::{Coordinates, DataError, LocationProvider, Result};
use serde::{Deserialize, Serialize};

/// Position reported by a browser geolocation call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrowserPosition {
    pub latitude: f64,
    pub longitude: f64,
    /// Accuracy radius in metres, when reported
    #[serde(default)]
    pub accuracy: Option<f64>,
}

/// Uses the position shared by the user's browser.
#[derive(Debug, Clone, PartialEq)]
pub struct BrowserLocationProvider {
    position: Option<BrowserPosition>,
    reason: String,
}

impl BrowserLocationProvider {
    /// Wrap a reported position, or its absence.
    pub fn from_report(position: Option<BrowserPosition>) -> Self {
        Self {
            position,
            reason: "permission denied or position unavailable".to_string(),
        }
    }

    pub fn from_position(latitude: f64, longitude: f64) -> Self {
        Self::from_report(Some(BrowserPosition {
            latitude,
            longitude,
            accuracy: None,
        }))
    }

    /// The browser refused or failed to share a position.
    pub fn denied(reason: impl Into<String>) -> Self {
        Self {
            position: None,
            reason: reason.into(),
        }
    }

    pub fn position(&self) -> Option<BrowserPosition> {
        self.position
    }
}

#[async_trait]
impl LocationProvider for BrowserLocationProvider {
    fn name(&self) -> &str {
        "browser"
    }

    async fn locate(&self) -> Result<Coordinates> {
        let position = self
            .position
            .ok_or_else(|| DataError::LocationUnavailable(self.reason.clone()))?;
        Coordinates::new(position.latitude, position.longitude)
    }
}

/// Uses latitude and longitude entered as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualLocationProvider {
    latitude: String,
    longitude: String,
}

impl ManualLocationProvider {
    pub fn new(latitude: impl Into<String>, longitude: impl Into<String>) -> Self {
        Self {
            latitude: latitude.into(),
            longitude: longitude.into(),
        }
    }

    /// Parse the entered text without going through the async trait.
    pub fn parse(&self) -> Result<Coordinates> {
        let lat = self.latitude.trim();
        let lon = self.longitude.trim();
        if lat.is_empty() || lon.is_empty() {
            return Err(DataError::LocationUnavailable(
                "latitude and longitude were not entered".to_string(),
            ));
        }
        let latitude = parse_degrees("latitude", lat)?;
        let longitude = parse_degrees("longitude", lon)?;
        Coordinates::new(latitude, longitude)
    }
}

fn parse_degrees(name: &str, text: &str) -> Result<f64> {
    text.parse::<f64>()
        .map_err(|_| DataError::InvalidCoordinates(format!("{} '{}' is not a number", name, text)))
}

#[async_trait]
impl LocationProvider for ManualLocationProvider {
    fn name(&self) -> &str {
        "manual"
    }

    async fn locate(&self) -> Result<Coordinates> {
        self.parse()
    }
}

/// Tries providers in order and returns the first resolved location.
///
/// Mirrors the dashboard flow: browser position first, manual entry as the
/// fallback. Invalid coordinates stop the chain; only an unavailable
/// location moves on to the next provider.
pub struct FallbackLocationProvider {
    providers: Vec<Box<dyn LocationProvider>>,
}

impl FallbackLocationProvider {
    pub fn new(providers: Vec<Box<dyn LocationProvider>>) -> Self {
        Self { providers }
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[async_trait]
impl LocationProvider for FallbackLocationProvider {
    fn name(&self) -> &str {
        "fallback"
    }

    async fn locate(&self) -> Result<Coordinates> {
        let mut last = DataError::LocationUnavailable("no location provider configured".to_string());
        for provider in &self.providers {
            match provider.locate().await {
                Ok(c) => {
                    tracing::debug!(provider = provider.name(), location = %c, "resolved location");
                    return Ok(c);
                }
                Err(e @ DataError::LocationUnavailable(_)) => last = e,
                Err(e) => return Err(e),
            }
        }
        Err(last)
    }
}
