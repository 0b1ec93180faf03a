//! API error responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use data_facade::DataError;
use forecast_facade::ForecastError;
use serde::Serialize;

/// Body returned with every non-2xx response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Errors surfaced by the route handlers
#[derive(Debug)]
pub enum ApiError {
    Forecast(ForecastError),
    Data(DataError),
}

impl From<ForecastError> for ApiError {
    fn from(e: ForecastError) -> Self {
        ApiError::Forecast(e)
    }
}

impl From<DataError> for ApiError {
    fn from(e: DataError) -> Self {
        ApiError::Data(e)
    }
}

/// Status code and machine-readable kind for a forecast failure
pub fn forecast_status(e: &ForecastError) -> (StatusCode, &'static str) {
    match e {
        ForecastError::InsufficientData { .. } => {
            (StatusCode::UNPROCESSABLE_ENTITY, "insufficient_data")
        }
        ForecastError::DegenerateSeries { .. } => {
            (StatusCode::UNPROCESSABLE_ENTITY, "degenerate_series")
        }
        ForecastError::InvalidParameter { .. } => (StatusCode::BAD_REQUEST, "invalid_parameter"),
        ForecastError::ModelUnavailable { .. } => {
            (StatusCode::SERVICE_UNAVAILABLE, "model_unavailable")
        }
        ForecastError::Inference { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "inference_failed"),
        ForecastError::NotFitted => (StatusCode::INTERNAL_SERVER_ERROR, "not_fitted"),
    }
}

fn data_status(e: &DataError) -> (StatusCode, &'static str) {
    match e {
        DataError::InvalidCoordinates(_) => (StatusCode::BAD_REQUEST, "invalid_coordinates"),
        DataError::LocationUnavailable(_) => {
            (StatusCode::UNPROCESSABLE_ENTITY, "location_unavailable")
        }
        DataError::ConfigError(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
        DataError::NoData => (StatusCode::BAD_GATEWAY, "no_data"),
        DataError::RequestFailed(_) | DataError::ApiError { .. } | DataError::ParseError(_) => {
            (StatusCode::BAD_GATEWAY, "upstream_error")
        }
        DataError::Database(_) => (StatusCode::BAD_GATEWAY, "database_error"),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let ((status, kind), message) = match &self {
            ApiError::Forecast(e) => (forecast_status(e), e.to_string()),
            ApiError::Data(e) => (data_status(e), e.to_string()),
        };
        if status.is_server_error() {
            tracing::error!(%status, kind, %message, "request failed");
        } else {
            tracing::debug!(%status, kind, %message, "request rejected");
        }
        (
            status,
            Json(ErrorResponse {
                error: kind.to_string(),
                message,
            }),
        )
            .into_response()
    }
}
