//! Server settings read from the environment

use std::net::SocketAddr;
use std::path::PathBuf;

use forecast_facade::{apply_overrides, load_config, ForecastConfig, ForecastError};

pub const ENV_HOST: &str = "HOST";
pub const ENV_PORT: &str = "PORT";
pub const ENV_DATABASE: &str = "GHG_DATABASE";
pub const ENV_CONFIG: &str = "GHG_CONFIG";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

/// Everything the server needs to start
#[derive(Debug, Clone)]
pub struct Settings {
    pub addr: SocketAddr,
    pub database: PathBuf,
    pub forecast: ForecastConfig,
}

impl Settings {
    /// Read settings from the process environment
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`.
    ///
    /// `GHG_CONFIG` names an optional TOML file; the `GHG_*` forecast
    /// variables are applied on top of it.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup(ENV_HOST).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup(ENV_PORT) {
            Some(p) => p
                .parse::<u16>()
                .map_err(|_| format!("{} must be a valid port number, got '{}'", ENV_PORT, p))?,
            None => DEFAULT_PORT,
        };
        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .map_err(|_| format!("invalid {}:{} configuration '{}:{}'", ENV_HOST, ENV_PORT, host, port))?;

        let database = lookup(ENV_DATABASE)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(data_facade::DEFAULT_DATABASE));

        let base = match lookup(ENV_CONFIG) {
            Some(path) => load_config(&path).map_err(|e| config_error(&path, e))?,
            None => ForecastConfig::default(),
        };
        let forecast = apply_overrides(base, &lookup).map_err(|e| e.to_string())?;

        Ok(Self {
            addr,
            database,
            forecast,
        })
    }
}

fn config_error(path: &str, e: ForecastError) -> String {
    format!("failed to load forecast config '{}': {}", path, e)
}
