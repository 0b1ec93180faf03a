//! # ghg-cli
//!
//! Command-line interface for fetching hourly air-quality readings and
//! forecasting the next CO value.

use clap::{Args, Parser, Subcommand};
use data_facade::{
    latest_value, next_timestamp, raw_series, short_term_trend, AirQualityClient, Coordinates,
    FetchConfigBuilder, ManualLocationProvider, Observation, Pollutant, SeriesSource,
    SqliteStore, DEFAULT_DATABASE, DEFAULT_PAST_DAYS,
};
use forecast_facade::{
    apply_env_overrides, load_config, ForecastConfig, ForecastConfigBuilder, ForecastPipeline,
};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type CliResult<T> = std::result::Result<T, String>;

#[derive(Parser)]
#[command(name = "ghg")]
#[command(about = "Air-quality readings and CO forecasting CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Forecast settings shared by every command that predicts
#[derive(Args, Debug, Default)]
struct ForecastArgs {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Model weight file (overrides the configuration)
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Trailing window length
    #[arg(short, long)]
    window: Option<usize>,

    /// Minimum number of usable readings
    #[arg(long)]
    min_history: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict the next value of a series read from a file
    Predict {
        /// Input file (CSV or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Column name or index holding the series
        #[arg(short, long, default_value = "co")]
        column: String,

        #[command(flatten)]
        forecast: ForecastArgs,

        /// Output file (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Fetch recent hourly readings for a location
    Fetch {
        /// Latitude in degrees (defaults to Kolkata)
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<String>,

        /// Longitude in degrees (defaults to Kolkata)
        #[arg(long, allow_hyphen_values = true)]
        lon: Option<String>,

        /// Days of history to request
        #[arg(long, default_value_t = DEFAULT_PAST_DAYS)]
        past_days: u32,

        /// Append the readings to this SQLite database
        #[arg(long)]
        save: Option<PathBuf>,

        #[command(flatten)]
        forecast: ForecastArgs,
    },

    /// Summarize the stored history and forecast the next CO value
    History {
        /// SQLite database
        #[arg(long, default_value = DEFAULT_DATABASE)]
        db: PathBuf,

        #[command(flatten)]
        forecast: ForecastArgs,
    },
}

/// Resolve the forecast configuration: file, then environment, then flags
fn resolve_config(args: &ForecastArgs) -> CliResult<ForecastConfig> {
    let base = match &args.config {
        Some(path) => load_config(path).map_err(|e| e.to_string())?,
        None => ForecastConfig::default(),
    };
    let base = apply_env_overrides(base).map_err(|e| e.to_string())?;

    let mut builder = ForecastConfigBuilder::from_config(base);
    if let Some(model) = &args.model {
        builder = builder.model_path(model);
    }
    if let Some(window) = args.window {
        builder = builder.window_size(window);
    }
    if let Some(min_history) = args.min_history {
        builder = builder.min_history(min_history);
    }
    builder.build().map_err(|e| e.to_string())
}

fn parse_cell(text: &str) -> f64 {
    text.trim().parse::<f64>().unwrap_or(f64::NAN)
}

/// Load a series from a CSV file; blank or non-numeric cells stay missing
fn load_csv_series(path: &Path, column: &str) -> CliResult<Vec<f64>> {
    let file = File::open(path).map_err(|e| format!("Failed to open file: {}", e))?;
    let mut reader = csv::Reader::from_reader(BufReader::new(file));

    let headers = reader
        .headers()
        .map_err(|e| format!("Failed to read headers: {}", e))?
        .clone();

    let col_idx = match headers.iter().position(|h| h.trim() == column) {
        Some(idx) => idx,
        None => column
            .parse::<usize>()
            .ok()
            .filter(|&idx| idx < headers.len())
            .ok_or_else(|| format!("Column '{}' not found", column))?,
    };

    let mut data = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| format!("Failed to read record: {}", e))?;
        data.push(record.get(col_idx).map(parse_cell).unwrap_or(f64::NAN));
    }

    if data.is_empty() {
        return Err("No rows found in the input".to_string());
    }
    Ok(data)
}

fn json_number(value: &serde_json::Value) -> f64 {
    match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        serde_json::Value::String(s) => parse_cell(s),
        _ => f64::NAN,
    }
}

/// Load a series from JSON.
///
/// Accepts an array of numbers (`null` for missing), an array of objects
/// keyed by `column`, or an object with a `series`, `values` or `data` array.
fn load_json_series(path: &Path, column: &str) -> CliResult<Vec<f64>> {
    let file = File::open(path).map_err(|e| format!("Failed to open file: {}", e))?;
    let json: serde_json::Value = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| format!("Failed to parse JSON: {}", e))?;
    series_from_json(&json, column)
}

fn series_from_json(json: &serde_json::Value, column: &str) -> CliResult<Vec<f64>> {
    let array = match json {
        serde_json::Value::Array(arr) => Some(arr),
        serde_json::Value::Object(obj) => ["series", "values", "data", column]
            .iter()
            .find_map(|key| obj.get(*key).and_then(|v| v.as_array())),
        _ => None,
    }
    .ok_or_else(|| "Could not find a series in the JSON input".to_string())?;

    if array.iter().all(|v| !v.is_object()) {
        return Ok(array.iter().map(json_number).collect());
    }
    let data: Vec<f64> = array
        .iter()
        .map(|row| row.get(column).map(json_number).unwrap_or(f64::NAN))
        .collect();
    if data.iter().all(|v| v.is_nan()) {
        return Err(format!("Column '{}' not found in JSON rows", column));
    }
    Ok(data)
}

/// Load data from file (auto-detect format)
fn load_series(path: &Path, column: &str) -> CliResult<Vec<f64>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "csv" => load_csv_series(path, column),
        "json" => load_json_series(path, column),
        _ => load_csv_series(path, column).or_else(|_| load_json_series(path, column)),
    }
}

fn write_json(json: &serde_json::Value, output: Option<&PathBuf>) -> CliResult<()> {
    let text =
        serde_json::to_string_pretty(json).map_err(|e| format!("Failed to write JSON: {}", e))?;
    match output {
        Some(path) => {
            std::fs::write(path, text).map_err(|e| format!("Failed to create output: {}", e))?;
            println!("Results written to {:?}", path);
        }
        None => println!("{}", text),
    }
    Ok(())
}

/// Run predict command
fn run_predict(
    input: PathBuf,
    column: String,
    args: ForecastArgs,
    output: Option<PathBuf>,
) -> CliResult<()> {
    let config = resolve_config(&args)?;
    let series = load_series(&input, &column)?;
    tracing::info!(points = series.len(), input = %input.display(), "loaded series");

    let pipeline = ForecastPipeline::from_config(config).map_err(|e| e.to_string())?;
    let forecast = pipeline
        .predict_next_detailed(&series)
        .map_err(|e| e.to_string())?;

    write_json(
        &serde_json::json!({
            "model": pipeline.model().name(),
            "column": column,
            "forecast": forecast,
        }),
        output.as_ref(),
    )
}

/// Resolve coordinates typed on the command line
fn resolve_location(lat: Option<String>, lon: Option<String>) -> CliResult<Coordinates> {
    match (lat, lon) {
        (None, None) => Ok(Coordinates::default()),
        (lat, lon) => ManualLocationProvider::new(lat.unwrap_or_default(), lon.unwrap_or_default())
            .parse()
            .map_err(|e| e.to_string()),
    }
}

/// Readings summary printed by `fetch` and `history`
fn summary(rows: &[Observation], pipeline: Option<&ForecastPipeline>) -> serde_json::Value {
    let latest: serde_json::Map<String, serde_json::Value> = Pollutant::ALL
        .iter()
        .filter_map(|&p| {
            latest_value(rows, p).map(|(value, timestamp)| {
                (
                    p.column().to_string(),
                    serde_json::json!({ "value": value, "timestamp": timestamp }),
                )
            })
        })
        .collect();

    let co_forecast = match pipeline {
        Some(pipeline) => match pipeline.predict_next_detailed(&raw_series(rows, Pollutant::Co)) {
            Ok(f) => serde_json::json!({
                "value": f.value,
                "for_timestamp": next_timestamp(rows),
                "points_used": f.points_used,
            }),
            Err(e) => serde_json::json!({ "error": e.to_string() }),
        },
        None => serde_json::Value::Null,
    };

    serde_json::json!({
        "rows": rows.len(),
        "latest": latest,
        "ozone_trend": short_term_trend(rows, Pollutant::O3),
        "co_forecast": co_forecast,
    })
}

/// Forecast pipeline when a model can be loaded; readings are still shown otherwise
fn optional_pipeline(args: &ForecastArgs) -> CliResult<Option<ForecastPipeline>> {
    let config = resolve_config(args)?;
    match ForecastPipeline::from_config(config) {
        Ok(pipeline) => Ok(Some(pipeline)),
        Err(e) => {
            tracing::warn!(error = %e, "forecast skipped");
            Ok(None)
        }
    }
}

/// Run fetch command
async fn run_fetch(
    lat: Option<String>,
    lon: Option<String>,
    past_days: u32,
    save: Option<PathBuf>,
    args: ForecastArgs,
) -> CliResult<()> {
    let coordinates = resolve_location(lat, lon)?;
    let config = FetchConfigBuilder::new()
        .coordinates(coordinates)
        .past_days(past_days)
        .build()
        .map_err(|e| e.to_string())?;

    let client = AirQualityClient::new(config);
    let rows = client.observations().await.map_err(|e| e.to_string())?;

    if let Some(path) = save {
        let store = SqliteStore::open(&path).await.map_err(|e| e.to_string())?;
        let inserted = store.append(&rows).await.map_err(|e| e.to_string())?;
        println!("Saved {} rows to {:?}", inserted, path);
    }

    let pipeline = optional_pipeline(&args)?;
    let mut json = summary(&rows, pipeline.as_ref());
    json["location"] = serde_json::json!(coordinates);
    write_json(&json, None)
}

/// Run history command
async fn run_history(db: PathBuf, args: ForecastArgs) -> CliResult<()> {
    if !db.exists() {
        return Err(format!("Database {:?} does not exist", db));
    }
    let store = SqliteStore::open(&db).await.map_err(|e| e.to_string())?;
    let rows = store.observations().await.map_err(|e| e.to_string())?;
    let pipeline = optional_pipeline(&args)?;
    write_json(&summary(&rows, pipeline.as_ref()), None)
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ghg_cli=info,forecast_core=warn,data_core=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Predict {
            input,
            column,
            forecast,
            output,
        } => run_predict(input, column, forecast, output),

        Commands::Fetch {
            lat,
            lon,
            past_days,
            save,
            forecast,
        } => run_fetch(lat, lon, past_days, save, forecast).await,

        Commands::History { db, forecast } => run_history(db, forecast).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
