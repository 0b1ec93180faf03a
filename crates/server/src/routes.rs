//! API route handlers

use std::collections::BTreeMap;

use axum::extract::{Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use data_facade::{
    latest_value, next_timestamp, raw_series, short_term_trend, BrowserLocationProvider,
    BrowserPosition, Coordinates, FallbackLocationProvider, LocationProvider,
    ManualLocationProvider, Observation, Pollutant, Trend,
};
use forecast_facade::{Forecast, ForecastError};
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::error::{forecast_status, ApiError};

#[derive(Debug, Deserialize)]
pub struct ForecastRequest {
    /// Hourly readings, oldest first; `null` marks a missing reading
    pub series: Vec<Option<f64>>,
    #[serde(default)]
    pub window_size: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    #[serde(flatten)]
    pub forecast: Forecast,
    pub model: String,
}

pub async fn forecast(
    State(state): State<AppState>,
    Json(req): Json<ForecastRequest>,
) -> Result<Json<ForecastResponse>, ApiError> {
    let pipeline = match req.window_size {
        Some(w) => state.pipeline_with_window(w)?,
        None => state.pipeline()?,
    };
    let series: Vec<f64> = req
        .series
        .iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect();
    let forecast = pipeline.predict_next_detailed(&series)?;

    Ok(Json(ForecastResponse {
        forecast,
        model: pipeline.model().name().to_string(),
    }))
}

/// Coordinates typed into the dashboard
#[derive(Debug, Default, Deserialize)]
pub struct ManualEntry {
    #[serde(default)]
    pub latitude: String,
    #[serde(default)]
    pub longitude: String,
}

/// What the dashboard knows about the user's location
#[derive(Debug, Default, Deserialize)]
pub struct LocationReport {
    /// Position shared by the browser
    #[serde(default)]
    pub browser: Option<BrowserPosition>,
    /// Why the browser did not share a position
    #[serde(default)]
    pub browser_error: Option<String>,
    #[serde(default)]
    pub manual: Option<ManualEntry>,
}

impl LocationReport {
    fn providers(self) -> FallbackLocationProvider {
        let browser = match (self.browser, self.browser_error) {
            (Some(position), _) => BrowserLocationProvider::from_report(Some(position)),
            (None, Some(reason)) => BrowserLocationProvider::denied(reason),
            (None, None) => BrowserLocationProvider::from_report(None),
        };
        let mut providers: Vec<Box<dyn LocationProvider>> = vec![Box::new(browser)];
        if let Some(entry) = self.manual {
            providers.push(Box::new(ManualLocationProvider::new(
                entry.latitude,
                entry.longitude,
            )));
        }
        FallbackLocationProvider::new(providers)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    pub value: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OzoneSummary {
    pub value: f64,
    pub timestamp: DateTime<Utc>,
    pub trend: Option<Trend>,
}

/// Result of the CO forecast, or why it could not be made
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CoForecast {
    Ready {
        value: f64,
        for_timestamp: Option<DateTime<Utc>>,
        points_used: usize,
    },
    Unavailable {
        error: String,
        message: String,
    },
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Coordinates>,
    pub rows: usize,
    pub latest: BTreeMap<String, Reading>,
    pub ozone: Option<OzoneSummary>,
    pub co_forecast: CoForecast,
}

/// Resolve the reported location, fetch its readings and summarize them
pub async fn location_report(
    State(state): State<AppState>,
    Json(report): Json<LocationReport>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let coordinates = report.providers().locate().await?;
    let source = (state.sources)(coordinates);
    let rows = source.observations().await?;
    tracing::info!(
        location = %coordinates,
        source = source.name(),
        rows = rows.len(),
        "fetched readings for reported location"
    );

    Ok(Json(summarize(&state, Some(coordinates), &rows)))
}

/// Summarize the locally stored history
pub async fn history_summary(
    State(state): State<AppState>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let rows = state.history.observations().await?;
    Ok(Json(summarize(&state, None, &rows)))
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryForecastQuery {
    #[serde(default)]
    pub window_size: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct HistoryForecastResponse {
    #[serde(flatten)]
    pub forecast: Forecast,
    pub for_timestamp: Option<DateTime<Utc>>,
}

/// One-step CO forecast over the stored history
pub async fn history_forecast(
    State(state): State<AppState>,
    Query(query): Query<HistoryForecastQuery>,
) -> Result<Json<HistoryForecastResponse>, ApiError> {
    let pipeline = match query.window_size {
        Some(w) => state.pipeline_with_window(w)?,
        None => state.pipeline()?,
    };
    let rows = state.history.observations().await?;
    let forecast = pipeline.predict_next_detailed(&raw_series(&rows, Pollutant::Co))?;

    Ok(Json(HistoryForecastResponse {
        forecast,
        for_timestamp: next_timestamp(&rows),
    }))
}

fn summarize(
    state: &AppState,
    location: Option<Coordinates>,
    rows: &[Observation],
) -> DashboardResponse {
    let latest = Pollutant::ALL
        .iter()
        .filter_map(|&p| {
            latest_value(rows, p)
                .map(|(value, timestamp)| (p.column().to_string(), Reading { value, timestamp }))
        })
        .collect();

    let ozone = latest_value(rows, Pollutant::O3).map(|(value, timestamp)| OzoneSummary {
        value,
        timestamp,
        trend: short_term_trend(rows, Pollutant::O3),
    });

    DashboardResponse {
        location,
        rows: rows.len(),
        latest,
        ozone,
        co_forecast: co_forecast(state, rows),
    }
}

fn co_forecast(state: &AppState, rows: &[Observation]) -> CoForecast {
    let outcome = state
        .pipeline()
        .and_then(|p| p.predict_next_detailed(&raw_series(rows, Pollutant::Co)));
    match outcome {
        Ok(f) => CoForecast::Ready {
            value: f.value,
            for_timestamp: next_timestamp(rows),
            points_used: f.points_used,
        },
        Err(e) => unavailable(&e),
    }
}

fn unavailable(e: &ForecastError) -> CoForecast {
    let (_, kind) = forecast_status(e);
    tracing::warn!(error = %e, "CO forecast unavailable");
    CoForecast::Unavailable {
        error: kind.to_string(),
        message: e.to_string(),
    }
}
