//! Data source configuration types.

use data_spi::{Coordinates, DataError, Pollutant, Result};
use serde::{Deserialize, Serialize};

/// Open-Meteo air-quality endpoint.
pub const AIR_QUALITY_URL: &str = "https://air-quality-api.open-meteo.com/v1/air-quality";
/// Open-Meteo weather forecast endpoint.
pub const WEATHER_URL: &str = "https://api.open-meteo.com/v1/forecast";
/// Default SQLite database file.
pub const DEFAULT_DATABASE: &str = "ghg_database.db";
/// Default amount of history to request.
pub const DEFAULT_PAST_DAYS: u32 = 3;
/// Largest history window the APIs serve.
pub const MAX_PAST_DAYS: u32 = 92;

/// Configuration for fetching hourly observations for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Location to fetch for
    pub coordinates: Coordinates,
    /// Hourly variables to request
    pub variables: Vec<Pollutant>,
    /// Days of history before today
    pub past_days: u32,
    /// Days of forecast after today
    pub forecast_days: u32,
    /// Air-quality endpoint
    pub air_quality_url: String,
    /// Weather endpoint
    pub weather_url: String,
}

impl FetchConfig {
    /// Create a configuration fetching every variable for `coordinates`.
    pub fn new(coordinates: Coordinates) -> Self {
        Self {
            coordinates,
            variables: Pollutant::ALL.to_vec(),
            past_days: DEFAULT_PAST_DAYS,
            forecast_days: 0,
            air_quality_url: AIR_QUALITY_URL.to_string(),
            weather_url: WEATHER_URL.to_string(),
        }
    }

    /// Variables served by the air-quality endpoint.
    pub fn air_quality_variables(&self) -> Vec<Pollutant> {
        self.variables
            .iter()
            .copied()
            .filter(|p| !p.is_meteorological())
            .collect()
    }

    /// Variables served by the weather endpoint.
    pub fn weather_variables(&self) -> Vec<Pollutant> {
        self.variables
            .iter()
            .copied()
            .filter(|p| p.is_meteorological())
            .collect()
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self::new(Coordinates::default())
    }
}

/// Builder for FetchConfig.
#[derive(Debug, Default)]
pub struct FetchConfigBuilder {
    latitude: Option<f64>,
    longitude: Option<f64>,
    coordinates: Option<Coordinates>,
    variables: Option<Vec<Pollutant>>,
    past_days: Option<u32>,
    forecast_days: Option<u32>,
    air_quality_url: Option<String>,
    weather_url: Option<String>,
}

impl FetchConfigBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set already validated coordinates.
    pub fn coordinates(mut self, coordinates: Coordinates) -> Self {
        self.coordinates = Some(coordinates);
        self
    }

    /// Set the latitude.
    pub fn latitude(mut self, latitude: f64) -> Self {
        self.latitude = Some(latitude);
        self
    }

    /// Set the longitude.
    pub fn longitude(mut self, longitude: f64) -> Self {
        self.longitude = Some(longitude);
        self
    }

    /// Set the requested variables.
    pub fn variables(mut self, variables: &[Pollutant]) -> Self {
        self.variables = Some(variables.to_vec());
        self
    }

    /// Set the history length in days.
    pub fn past_days(mut self, days: u32) -> Self {
        self.past_days = Some(days);
        self
    }

    /// Set the forecast length in days.
    pub fn forecast_days(mut self, days: u32) -> Self {
        self.forecast_days = Some(days);
        self
    }

    /// Override the air-quality endpoint.
    pub fn air_quality_url(mut self, url: &str) -> Self {
        self.air_quality_url = Some(url.trim_end_matches('/').to_string());
        self
    }

    /// Override the weather endpoint.
    pub fn weather_url(mut self, url: &str) -> Self {
        self.weather_url = Some(url.trim_end_matches('/').to_string());
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<FetchConfig> {
        let coordinates = match (self.coordinates, self.latitude, self.longitude) {
            (Some(c), None, None) => c,
            (None, Some(lat), Some(lon)) => Coordinates::new(lat, lon)?,
            (None, None, None) => {
                return Err(DataError::ConfigError("coordinates are required".to_string()))
            }
            (Some(_), _, _) => {
                return Err(DataError::ConfigError(
                    "set either coordinates or latitude/longitude, not both".to_string(),
                ))
            }
            (None, _, _) => {
                return Err(DataError::ConfigError(
                    "latitude and longitude must be set together".to_string(),
                ))
            }
        };

        let variables = self.variables.unwrap_or_else(|| Pollutant::ALL.to_vec());
        if variables.is_empty() {
            return Err(DataError::ConfigError(
                "at least one variable is required".to_string(),
            ));
        }

        let past_days = self.past_days.unwrap_or(DEFAULT_PAST_DAYS);
        if past_days > MAX_PAST_DAYS {
            return Err(DataError::ConfigError(format!(
                "past_days must be at most {}, got {}",
                MAX_PAST_DAYS, past_days
            )));
        }

        Ok(FetchConfig {
            coordinates,
            variables,
            past_days,
            forecast_days: self.forecast_days.unwrap_or(0),
            air_quality_url: self
                .air_quality_url
                .unwrap_or_else(|| AIR_QUALITY_URL.to_string()),
            weather_url: self.weather_url.unwrap_or_else(|| WEATHER_URL.to_string()),
        })
    }
}
