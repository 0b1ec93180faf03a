//! Configuration file and environment loading.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use forecast_core::ForecastConfig;
use forecast_spi::{ForecastError, Result};

/// Environment variable overriding the model path
pub const ENV_MODEL_PATH: &str = "GHG_MODEL_PATH";
/// Environment variable overriding the window size
pub const ENV_WINDOW_SIZE: &str = "GHG_WINDOW_SIZE";
/// Environment variable overriding the minimum history
pub const ENV_MIN_HISTORY: &str = "GHG_MIN_HISTORY";

/// Parse a TOML document; missing keys keep their defaults.
///
/// Both a bare document and one nested under a `[forecast]` table are
/// accepted.
pub fn from_toml_str(text: &str) -> Result<ForecastConfig> {
    let value: toml::Table = text.parse().map_err(|e: toml::de::Error| invalid("config", e))?;
    let section = match value.get("forecast") {
        Some(section) => section.clone(),
        None => toml::Value::Table(value),
    };
    let config = section
        .try_into::<ForecastConfig>()
        .map_err(|e| invalid("config", e))?;

    config.validate()?;
    Ok(config)
}

/// Read a configuration file.
pub fn load_config(path: impl AsRef<Path>) -> Result<ForecastConfig> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| {
        invalid("config", format!("cannot read '{}': {}", path.display(), e))
    })?;
    let config = from_toml_str(&text)?;
    tracing::info!(path = %path.display(), "loaded forecast config");
    Ok(config)
}

/// Apply `GHG_*` environment overrides to `config`.
pub fn apply_env_overrides(config: ForecastConfig) -> Result<ForecastConfig> {
    apply_overrides(config, |key| env::var(key).ok())
}

/// Apply overrides looked up through `lookup`.
pub fn apply_overrides<F>(mut config: ForecastConfig, lookup: F) -> Result<ForecastConfig>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = lookup(ENV_MODEL_PATH) {
        config.model_path = PathBuf::from(path);
    }
    if let Some(raw) = lookup(ENV_WINDOW_SIZE) {
        config.window_size = parse_count(ENV_WINDOW_SIZE, &raw)?;
    }
    if let Some(raw) = lookup(ENV_MIN_HISTORY) {
        config.min_history = parse_count(ENV_MIN_HISTORY, &raw)?;
    }
    config.validate()?;
    Ok(config)
}

fn parse_count(name: &str, raw: &str) -> Result<usize> {
    raw.trim()
        .parse()
        .map_err(|_| invalid(name, format!("expected a non-negative integer, got '{}'", raw)))
}

fn invalid(name: &str, reason: impl ToString) -> ForecastError {
    ForecastError::InvalidParameter {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_from_toml_str_full() {
        let config = from_toml_str(
            r#"
            model_path = "weights/co.json"
            window_size = 12
            min_history = 20
            "#,
        )
        .unwrap();
        assert_eq!(config.model_path, PathBuf::from("weights/co.json"));
        assert_eq!(config.window_size, 12);
        assert_eq!(config.min_history, 20);
    }

    #[test]
    fn test_from_toml_str_section_and_defaults() {
        let config = from_toml_str("[forecast]\nwindow_size = 48\n").unwrap();
        assert_eq!(config.window_size, 48);
        assert_eq!(config.min_history, 30);
        assert_eq!(config.model_path, PathBuf::from("models/co_lstm.json"));
    }

    #[test]
    fn test_from_toml_str_invalid() {
        assert!(from_toml_str("window_size = \"wide\"").is_err());
        assert!(from_toml_str("window_size = 0").is_err());
        assert!(from_toml_str("not toml at all [").is_err());
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ghg.toml");
        fs::write(&path, "window_size = 6\nmin_history = 10\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.window_size, 6);
        assert_eq!(config.required_points(), 10);

        assert!(load_config(dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_MODEL_PATH, "/tmp/model.json"),
            (ENV_WINDOW_SIZE, " 36 "),
        ]
        .into_iter()
        .collect();

        let config =
            apply_overrides(ForecastConfig::default(), |k| vars.get(k).map(|v| v.to_string()))
                .unwrap();
        assert_eq!(config.model_path, PathBuf::from("/tmp/model.json"));
        assert_eq!(config.window_size, 36);
        assert_eq!(config.min_history, 30);
    }

    #[test]
    fn test_bad_override_rejected() {
        let result = apply_overrides(ForecastConfig::default(), |k| {
            (k == ENV_MIN_HISTORY).then(|| "lots".to_string())
        });
        assert!(matches!(
            result,
            Err(ForecastError::InvalidParameter { ref name, .. }) if name == ENV_MIN_HISTORY
        ));
    }
}
