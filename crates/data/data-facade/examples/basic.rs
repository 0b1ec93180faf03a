//! Basic example: fetch hourly readings and store them
//!
//! Run with: cargo run --example basic -p data-facade -- 22.5726 88.3639

use data_facade::{
    latest_value, short_term_trend, AirQualityClient, FetchConfig, LocationProvider,
    ManualLocationProvider, Pollutant, SqliteStore, DEFAULT_DATABASE,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let lat = args.next().unwrap_or_else(|| "22.5726".to_string());
    let lon = args.next().unwrap_or_else(|| "88.3639".to_string());

    let coordinates = ManualLocationProvider::new(lat, lon).locate().await?;
    println!("Fetching hourly data for {}", coordinates);

    let rows = AirQualityClient::new(FetchConfig::new(coordinates)).fetch().await?;
    println!("Got {} rows", rows.len());

    if let Some((o3, at)) = latest_value(&rows, Pollutant::O3) {
        println!("Latest O₃: {:.3} at {}", o3, at);
    }
    if let Some(trend) = short_term_trend(&rows, Pollutant::O3) {
        println!("Recent short-term trend: {}", trend);
    }

    let store = SqliteStore::open(DEFAULT_DATABASE).await?;
    let saved = store.append(&rows).await?;
    println!("Saved {} rows to {}", saved, DEFAULT_DATABASE);

    Ok(())
}
