//! Application state, router and health probes

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use data_facade::{Coordinates, SeriesSource};
use forecast_facade::{ForecastConfig, ForecastPipeline, ModelLoader, ModelStore, Result};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::routes;

/// Builds the observation source for a resolved location
pub type SourceFactory = Arc<dyn Fn(Coordinates) -> Arc<dyn SeriesSource> + Send + Sync>;

/// Model cache shared by every request
pub type SharedStore = Arc<ModelStore<Box<dyn ModelLoader>>>;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub models: SharedStore,
    pub config: ForecastConfig,
    /// Locally stored history
    pub history: Arc<dyn SeriesSource>,
    pub sources: SourceFactory,
}

impl AppState {
    /// Pipeline over the cached model; loads it if a previous attempt failed
    pub fn pipeline(&self) -> Result<ForecastPipeline> {
        ForecastPipeline::from_store(self.config.clone(), self.models.as_ref())
    }

    pub fn pipeline_with_window(&self, window_size: usize) -> Result<ForecastPipeline> {
        let mut config = self.config.clone();
        config.window_size = window_size;
        ForecastPipeline::from_store(config, self.models.as_ref())
    }
}

/// Liveness probe - is the server running?
async fn liveness() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness probe - can forecasts be served?
async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    let model = match state.models.get() {
        Ok(model) => serde_json::json!({
            "name": "model",
            "status": "healthy",
            "model": model.name(),
            "path": state.models.path().display().to_string(),
        }),
        Err(e) => serde_json::json!({
            "name": "model",
            "status": "unhealthy",
            "path": state.models.path().display().to_string(),
            "message": e.to_string(),
        }),
    };
    let ready = state.models.is_loaded();
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (
        status,
        Json(serde_json::json!({
            "status": if ready { "ready" } else { "not_ready" },
            "version": env!("CARGO_PKG_VERSION"),
            "window_size": state.config.window_size,
            "checks": [
                { "name": "server", "status": "healthy" },
                model,
            ],
        })),
    )
}

/// Build the router with middleware
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health endpoints (Kubernetes-compatible)
        .route("/health/live", get(liveness))
        .route("/health/ready", get(readiness))
        .route("/health", get(liveness))
        // API endpoints
        .route("/api/v1/forecast", post(routes::forecast))
        .route("/api/v1/location/report", post(routes::location_report))
        .route("/api/v1/history/summary", get(routes::history_summary))
        .route("/api/v1/history/forecast", get(routes::history_forecast))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
