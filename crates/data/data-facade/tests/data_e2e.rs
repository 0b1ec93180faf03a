//! End-to-end tests for the data crate
//!
//! Parses recorded API responses, persists them to a database file and
//! reads them back the way the dashboard does.

use data_facade::{
    latest_value, merge_observations, parse_hourly, pollutant_series, short_term_trend,
    AirQualityClient, Coordinates, FetchConfigBuilder, Pollutant, SqliteStore, Trend,
};

fn air_quality_body(hours: usize) -> String {
    let times: Vec<String> = (0..hours)
        .map(|h| format!("\"2024-11-{:02}T{:02}:00\"", 1 + h / 24, h % 24))
        .collect();
    let co: Vec<String> = (0..hours)
        .map(|h| {
            if h % 10 == 9 {
                "null".to_string()
            } else {
                format!("{:.1}", 280.0 + (h % 24) as f64 * 5.0)
            }
        })
        .collect();
    let o3: Vec<String> = (0..hours).map(|h| format!("{:.1}", 30.0 + h as f64)).collect();
    format!(
        r#"{{"hourly": {{"time": [{}], "carbon_monoxide": [{}], "ozone": [{}]}}}}"#,
        times.join(","),
        co.join(","),
        o3.join(",")
    )
}

fn weather_body(hours: usize) -> String {
    let times: Vec<String> = (0..hours)
        .map(|h| format!("\"2024-11-{:02}T{:02}:00\"", 1 + h / 24, h % 24))
        .collect();
    let temps: Vec<String> = (0..hours).map(|h| format!("{:.1}", 20.0 + (h % 24) as f64 * 0.3)).collect();
    format!(
        r#"{{"hourly": {{"time": [{}], "temperature_2m": [{}]}}}}"#,
        times.join(","),
        temps.join(",")
    )
}

#[tokio::test]
async fn e2e_fetch_response_to_database() {
    let rows = merge_observations(
        parse_hourly(&air_quality_body(72)).unwrap(),
        parse_hourly(&weather_body(72)).unwrap(),
    );
    assert_eq!(rows.len(), 72);

    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::open(dir.path().join("ghg_database.db")).await.unwrap();
    assert_eq!(store.append(&rows).await.unwrap(), 72);

    let loaded = store.load_all().await.unwrap();
    assert_eq!(loaded, rows);

    let co = pollutant_series(&loaded, Pollutant::Co);
    assert_eq!(co.len(), 72 - 7);
    assert_eq!(short_term_trend(&loaded, Pollutant::O3), Some(Trend::Up));

    let (o3, at) = latest_value(&loaded, Pollutant::O3).unwrap();
    assert_eq!(o3, 101.0);
    assert_eq!(at, loaded[71].timestamp);
}

#[test]
fn e2e_client_urls_for_manual_location() {
    let config = FetchConfigBuilder::new()
        .coordinates(Coordinates::new(28.6139, 77.209).unwrap())
        .variables(&[Pollutant::Co, Pollutant::O3, Pollutant::WindSpeed])
        .past_days(2)
        .build()
        .unwrap();
    let client = AirQualityClient::new(config);

    let air = client.air_quality_url().unwrap();
    assert!(air.contains("latitude=28.6139&longitude=77.209"));
    assert!(air.contains("hourly=carbon_monoxide,ozone"));
    assert!(air.contains("past_days=2"));
    assert!(client.weather_url().unwrap().contains("hourly=wind_speed_10m"));
}
