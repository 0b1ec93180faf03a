//! Unit tests for the data facade

use chrono::{DateTime, TimeZone, Utc};
use data_facade::{
    latest_value, next_timestamp, parse_hourly, pollutant_series, short_term_trend, Coordinates,
    DataError, FetchConfigBuilder, Observation, Pollutant, Trend,
};

fn ts(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 11, 3, hour, 0, 0).unwrap()
}

// ============================================================================
// Pollutant Tests
// ============================================================================

#[test]
fn test_pollutant_names() {
    assert_eq!(Pollutant::Co.column(), "co");
    assert_eq!(Pollutant::Co.api_variable(), "carbon_monoxide");
    assert_eq!(Pollutant::Pm25.column(), "pm2_5");
    assert_eq!(Pollutant::O3.to_string(), "O₃");
}

#[test]
fn test_pollutant_parse_error() {
    assert!(matches!(
        "methane".parse::<Pollutant>(),
        Err(DataError::ParseError(_))
    ));
}

// ============================================================================
// Observation Utility Tests
// ============================================================================

#[test]
fn test_series_helpers() {
    let rows: Vec<Observation> = (0..6)
        .map(|h| {
            let obs = Observation::new(ts(h)).with(Pollutant::O3, 50.0 - h as f64);
            if h % 2 == 0 {
                obs.with(Pollutant::Co, (20 + h) as f64 / 100.0)
            } else {
                obs
            }
        })
        .collect();

    assert_eq!(pollutant_series(&rows, Pollutant::Co).len(), 3);
    assert_eq!(latest_value(&rows, Pollutant::Co), Some((0.24, ts(4))));
    assert_eq!(short_term_trend(&rows, Pollutant::O3), Some(Trend::Down));
    assert_eq!(next_timestamp(&rows), Some(ts(6)));
}

// ============================================================================
// Configuration Tests
// ============================================================================

#[test]
fn test_fetch_config_from_coordinates() {
    let c = Coordinates::new(-33.87, 151.21).unwrap();
    let config = FetchConfigBuilder::new().coordinates(c).past_days(5).build().unwrap();
    assert_eq!(config.coordinates, c);
    assert_eq!(config.past_days, 5);
}

#[test]
fn test_coordinates_validation() {
    assert!(Coordinates::new(45.0, 200.0).is_err());
}

// ============================================================================
// Parsing Tests
// ============================================================================

#[test]
fn test_parse_hourly_nulls_are_missing() {
    let rows = parse_hourly(
        r#"{"hourly": {"time": ["2024-11-03T00:00", "2024-11-03T01:00"],
            "carbon_monoxide": [null, 250.0]}}"#,
    )
    .unwrap();
    assert_eq!(rows[0].co, None);
    assert_eq!(rows[1].co, Some(250.0));
}
