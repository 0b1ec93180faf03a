//! Open-Meteo hourly data fetcher
//!
//! Fetches hourly pollutant readings from the air-quality API and
//! meteorological readings from the forecast API, merged on timestamp.
//!
//! # Example
//!
//! ```rust,no_run
//! use data_core::AirQualityClient;
//! use data_api::FetchConfig;
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = AirQualityClient::new(FetchConfig::default());
//!     let rows = client.fetch().await.unwrap();
//!     println!("Got {} hourly rows", rows.len());
//! }
//! ```

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use data_api::FetchConfig;
use data_spi::{Coordinates, DataError, Observation, Pollutant, Result};
use serde::Deserialize;

use crate::timestamp::parse_timestamp;

/// Open-Meteo API response structure
#[derive(Debug, Deserialize)]
struct HourlyResponse {
    #[serde(default)]
    error: bool,
    reason: Option<String>,
    hourly: Option<HourlyBlock>,
}

#[derive(Debug, Deserialize)]
struct HourlyBlock {
    time: Vec<String>,
    #[serde(flatten)]
    values: HashMap<String, Vec<Option<f64>>>,
}

/// Build a request URL for one endpoint.
pub fn build_url(
    base_url: &str,
    coordinates: &Coordinates,
    variables: &[Pollutant],
    past_days: u32,
    forecast_days: u32,
) -> String {
    let hourly: Vec<&str> = variables.iter().map(|p| p.api_variable()).collect();
    format!(
        "{}?latitude={}&longitude={}&hourly={}&past_days={}&forecast_days={}&timezone=GMT",
        base_url,
        coordinates.latitude(),
        coordinates.longitude(),
        hourly.join(","),
        past_days,
        forecast_days
    )
}

/// Parse an hourly response body into observation rows.
///
/// Unknown variables are ignored; `null` readings stay missing.
pub fn parse_hourly(json: &str) -> Result<Vec<Observation>> {
    let response: HourlyResponse =
        serde_json::from_str(json).map_err(|e| DataError::ParseError(e.to_string()))?;

    if response.error {
        return Err(DataError::ApiError {
            code: "open-meteo".to_string(),
            description: response.reason.unwrap_or_else(|| "unknown error".to_string()),
        });
    }

    let hourly = response.hourly.ok_or(DataError::NoData)?;
    let mut rows = hourly
        .time
        .iter()
        .map(|t| parse_timestamp(t).map(Observation::new))
        .collect::<Result<Vec<_>>>()?;

    for (name, values) in &hourly.values {
        let Some(pollutant) = Pollutant::from_api_variable(name) else {
            continue;
        };
        for (row, value) in rows.iter_mut().zip(values) {
            row.set(pollutant, value.filter(|v| v.is_finite()));
        }
    }

    if rows.is_empty() {
        return Err(DataError::NoData);
    }
    Ok(rows)
}

/// Outer-join two row sets on timestamp, oldest first.
pub fn merge_observations(primary: Vec<Observation>, secondary: Vec<Observation>) -> Vec<Observation> {
    let mut by_time: BTreeMap<DateTime<Utc>, Observation> = BTreeMap::new();
    for row in primary.into_iter().chain(secondary) {
        match by_time.get_mut(&row.timestamp) {
            Some(existing) => existing.merge(&row),
            None => {
                by_time.insert(row.timestamp, row);
            }
        }
    }
    by_time.into_values().collect()
}

/// Open-Meteo client
#[derive(Debug, Clone)]
pub struct AirQualityClient {
    config: FetchConfig,
}

impl Default for AirQualityClient {
    fn default() -> Self {
        Self::new(FetchConfig::default())
    }
}

impl AirQualityClient {
    /// Create a new client
    pub fn new(config: FetchConfig) -> Self {
        Self { config }
    }

    /// Same client pointed at other coordinates
    pub fn for_location(&self, coordinates: Coordinates) -> Self {
        let mut config = self.config.clone();
        config.coordinates = coordinates;
        Self { config }
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// URL of the air-quality request, if any pollutant is requested
    pub fn air_quality_url(&self) -> Option<String> {
        let vars = self.config.air_quality_variables();
        (!vars.is_empty()).then(|| {
            build_url(
                &self.config.air_quality_url,
                &self.config.coordinates,
                &vars,
                self.config.past_days,
                self.config.forecast_days,
            )
        })
    }

    /// URL of the weather request, if any meteorological variable is requested
    pub fn weather_url(&self) -> Option<String> {
        let vars = self.config.weather_variables();
        (!vars.is_empty()).then(|| {
            build_url(
                &self.config.weather_url,
                &self.config.coordinates,
                &vars,
                self.config.past_days,
                self.config.forecast_days,
            )
        })
    }

    /// Fetch and merge every requested variable
    #[cfg(feature = "fetch")]
    pub async fn fetch(&self) -> Result<Vec<Observation>> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("ghg-monitor/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DataError::RequestFailed(e.to_string()))?;

        let air = match self.air_quality_url() {
            Some(url) => Self::get_hourly(&client, &url).await?,
            None => Vec::new(),
        };
        let weather = match self.weather_url() {
            Some(url) => Self::get_hourly(&client, &url).await?,
            None => Vec::new(),
        };

        let rows = merge_observations(air, weather);
        if rows.is_empty() {
            return Err(DataError::NoData);
        }
        tracing::info!(
            location = %self.config.coordinates,
            rows = rows.len(),
            "fetched hourly observations"
        );
        Ok(rows)
    }

    #[cfg(feature = "fetch")]
    async fn get_hourly(client: &reqwest::Client, url: &str) -> Result<Vec<Observation>> {
        tracing::debug!(%url, "requesting hourly data");
        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| DataError::RequestFailed(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| DataError::RequestFailed(e.to_string()))?;

        if !status.is_success() {
            return Err(match parse_hourly(&text) {
                Err(DataError::ApiError { description, .. }) => DataError::ApiError {
                    code: status.as_u16().to_string(),
                    description,
                },
                _ => DataError::ApiError {
                    code: status.as_u16().to_string(),
                    description: status.canonical_reason().unwrap_or("error").to_string(),
                },
            });
        }

        parse_hourly(&text)
    }
}

#[cfg(feature = "fetch")]
#[async_trait::async_trait]
impl data_spi::SeriesSource for AirQualityClient {
    fn name(&self) -> &str {
        "open-meteo"
    }

    async fn observations(&self) -> Result<Vec<Observation>> {
        self.fetch().await
    }
}

/// Convenience function to fetch every variable for a location
#[cfg(feature = "fetch")]
pub async fn fetch_location(coordinates: Coordinates) -> Result<Vec<Observation>> {
    AirQualityClient::new(FetchConfig::new(coordinates)).fetch().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const AIR_BODY: &str = r#"{
        "latitude": 22.5,
        "longitude": 88.375,
        "hourly_units": { "time": "iso8601", "carbon_monoxide": "μg/m³" },
        "hourly": {
            "time": ["2024-11-03T00:00", "2024-11-03T01:00", "2024-11-03T02:00"],
            "carbon_monoxide": [412.0, null, 398.5],
            "ozone": [61.0, 63.0, 66.0]
        }
    }"#;

    const WEATHER_BODY: &str = r#"{
        "hourly": {
            "time": ["2024-11-03T01:00", "2024-11-03T02:00", "2024-11-03T03:00"],
            "temperature_2m": [24.1, 23.8, 23.5],
            "relative_humidity_2m": [78.0, 80.0, 81.0]
        }
    }"#;

    fn ts(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 11, 3, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_hourly() {
        let rows = parse_hourly(AIR_BODY).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].timestamp, ts(0));
        assert_eq!(rows[0].co, Some(412.0));
        assert_eq!(rows[1].co, None);
        assert_eq!(rows[2].o3, Some(66.0));
        assert_eq!(rows[2].no2, None);
    }

    #[test]
    fn test_parse_api_error() {
        let body = r#"{"error": true, "reason": "Latitude must be in range of -90 to 90°."}"#;
        match parse_hourly(body) {
            Err(DataError::ApiError { description, .. }) => {
                assert!(description.starts_with("Latitude"))
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_parse_missing_hourly() {
        assert_eq!(parse_hourly(r#"{"latitude": 1.0}"#), Err(DataError::NoData));
        assert_eq!(
            parse_hourly(r#"{"hourly": {"time": []}}"#),
            Err(DataError::NoData)
        );
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(matches!(parse_hourly("<html>"), Err(DataError::ParseError(_))));
    }

    #[test]
    fn test_parse_ignores_unknown_variables() {
        let body = r#"{"hourly": {"time": ["2024-11-03T00:00"], "dust": [3.0], "pm10": [40.0]}}"#;
        let rows = parse_hourly(body).unwrap();
        assert_eq!(rows[0].pm10, Some(40.0));
    }

    #[test]
    fn test_merge_outer_join() {
        let merged = merge_observations(
            parse_hourly(AIR_BODY).unwrap(),
            parse_hourly(WEATHER_BODY).unwrap(),
        );
        assert_eq!(merged.len(), 4);
        assert_eq!(merged[0].temperature, None);
        assert_eq!(merged[1].temperature, Some(24.1));
        assert_eq!(merged[1].o3, Some(63.0));
        assert_eq!(merged[3].timestamp, ts(3));
        assert_eq!(merged[3].co, None);
        assert_eq!(merged[3].humidity, Some(81.0));
    }

    #[test]
    fn test_build_urls() {
        let config = data_api::FetchConfigBuilder::new()
            .latitude(22.5726)
            .longitude(88.3639)
            .variables(&[Pollutant::Co, Pollutant::O3, Pollutant::Temperature])
            .build()
            .unwrap();
        let client = AirQualityClient::new(config);

        let air = client.air_quality_url().unwrap();
        assert!(air.starts_with(data_api::AIR_QUALITY_URL));
        assert!(air.contains("latitude=22.5726"));
        assert!(air.contains("hourly=carbon_monoxide,ozone&"));
        assert!(air.contains("past_days=3"));

        let weather = client.weather_url().unwrap();
        assert!(weather.starts_with(data_api::WEATHER_URL));
        assert!(weather.contains("hourly=temperature_2m&"));
    }

    #[test]
    fn test_no_weather_request_without_weather_variables() {
        let config = data_api::FetchConfigBuilder::new()
            .coordinates(Coordinates::default())
            .variables(&[Pollutant::Co])
            .build()
            .unwrap();
        let client = AirQualityClient::new(config);
        assert!(client.weather_url().is_none());
        assert!(client.air_quality_url().is_some());
    }

    #[test]
    fn test_for_location() {
        let client = AirQualityClient::default();
        let moved = client.for_location(Coordinates::new(48.85, 2.35).unwrap());
        assert_eq!(moved.config().coordinates.latitude(), 48.85);
        assert_eq!(moved.config().variables, client.config().variables);
    }
}
