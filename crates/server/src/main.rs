//! # ghg-server
//!
//! REST API for the air-quality dashboard: location-based readings, the
//! stored hourly history and one-step CO forecasts.

use std::process::ExitCode;
use std::sync::Arc;

use data_facade::{AirQualityClient, Coordinates, SeriesSource, SqliteStore};
use forecast_facade::{JsonModelLoader, ModelLoader, ModelStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod app;
mod error;
mod routes;
mod settings;

use app::{build_router, AppState, SourceFactory};
use settings::Settings;

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutdown requested");
}

async fn run(settings: Settings) -> Result<(), String> {
    let loader: Box<dyn ModelLoader> = Box::new(JsonModelLoader);
    let models = Arc::new(ModelStore::with_loader(
        settings.forecast.model_path.clone(),
        loader,
    ));
    // Load at startup; forecasts answer 503 until a later attempt succeeds
    if let Err(e) = models.get() {
        tracing::warn!(error = %e, "forecast model not loaded at startup");
    }

    let history = SqliteStore::open(&settings.database)
        .await
        .map_err(|e| format!("cannot open '{}': {}", settings.database.display(), e))?;

    let client = AirQualityClient::default();
    let sources: SourceFactory = Arc::new(move |coordinates: Coordinates| {
        Arc::new(client.for_location(coordinates)) as Arc<dyn SeriesSource>
    });

    let state = AppState {
        models: Arc::clone(&models),
        config: settings.forecast.clone(),
        history: Arc::new(history),
        sources,
    };
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(settings.addr)
        .await
        .map_err(|e| format!("cannot bind {}: {}", settings.addr, e))?;
    tracing::info!(
        "ghg-server v{} listening on {}",
        env!("CARGO_PKG_VERSION"),
        settings.addr
    );

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| e.to_string());

    models.release();
    served
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file (optional - won't fail if missing)
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ghg_server=info,tower_http=info".into()),
        )
        .init();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
