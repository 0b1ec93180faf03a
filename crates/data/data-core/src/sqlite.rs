//! SQLite observation store
//!
//! Reads and appends rows of the `ghg_data` table. Tables written by other
//! tools may carry only a subset of the pollutant columns; absent columns
//! read as missing.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use data_spi::{DataError, Observation, Pollutant, Result, SeriesSource};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Column, Row, TypeInfo, ValueRef};

use crate::timestamp::{format_timestamp, from_unix_seconds, parse_timestamp};

/// Table holding the hourly history.
pub const TABLE: &str = "ghg_data";

fn db_error(e: sqlx::Error) -> DataError {
    DataError::Database(e.to_string())
}

/// Observation store backed by a SQLite database
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if needed) the database file at `path`
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(db_error)?;
        tracing::debug!(path = %path.as_ref().display(), "opened observation store");
        Ok(Self { pool })
    }

    /// Open a private in-memory database
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(db_error)?;
        Ok(Self { pool })
    }

    /// Wrap an existing pool
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create the table with every known column when it does not exist
    pub async fn ensure_table(&self) -> Result<()> {
        let columns: Vec<String> = Pollutant::ALL
            .iter()
            .map(|p| format!("{} REAL", p.column()))
            .collect();
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (timestamp TEXT NOT NULL UNIQUE, {})",
            TABLE,
            columns.join(", ")
        );
        sqlx::query(&sql)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(())
    }

    /// Every stored row, oldest first
    pub async fn load_all(&self) -> Result<Vec<Observation>> {
        let sql = format!("SELECT * FROM {} ORDER BY timestamp ASC", TABLE);
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        let observations = rows.iter().map(row_to_observation).collect::<Result<Vec<_>>>()?;
        tracing::debug!(rows = observations.len(), "loaded stored observations");
        Ok(observations)
    }

    /// Write rows, creating the table first if needed.
    ///
    /// A row whose timestamp is already stored updates that hour in place;
    /// readings missing from the new row keep their stored value. Returns
    /// the number of rows inserted or updated.
    pub async fn append(&self, observations: &[Observation]) -> Result<u64> {
        self.ensure_table().await?;

        let columns: Vec<&str> = Pollutant::ALL.iter().map(|p| p.column()).collect();
        let assignments: Vec<String> = columns
            .iter()
            .map(|c| format!("{c} = COALESCE(?, {c})"))
            .collect();
        let update = format!(
            "UPDATE {} SET {} WHERE timestamp = ?",
            TABLE,
            assignments.join(", ")
        );
        let placeholders = vec!["?"; columns.len() + 1].join(", ");
        let insert = format!(
            "INSERT INTO {} (timestamp, {}) VALUES ({})",
            TABLE,
            columns.join(", "),
            placeholders
        );

        let mut tx = self.pool.begin().await.map_err(db_error)?;
        let mut inserted = 0;
        let mut updated = 0;
        for obs in observations {
            let stamp = format_timestamp(&obs.timestamp);

            let mut query = sqlx::query(&update);
            for p in Pollutant::ALL {
                query = query.bind(obs.get(p));
            }
            let changed = query
                .bind(stamp.as_str())
                .execute(&mut *tx)
                .await
                .map_err(db_error)?
                .rows_affected();
            if changed > 0 {
                updated += 1;
                continue;
            }

            let mut query = sqlx::query(&insert).bind(stamp.as_str());
            for p in Pollutant::ALL {
                query = query.bind(obs.get(p));
            }
            inserted += query
                .execute(&mut *tx)
                .await
                .map_err(db_error)?
                .rows_affected();
        }
        tx.commit().await.map_err(db_error)?;

        tracing::info!(inserted, updated, "stored observations");
        Ok(inserted + updated)
    }
}

#[async_trait]
impl SeriesSource for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn observations(&self) -> Result<Vec<Observation>> {
        self.load_all().await
    }
}

fn row_to_observation(row: &SqliteRow) -> Result<Observation> {
    let mut observation = Observation::new(read_timestamp(row)?);
    for column in row.columns() {
        if let Ok(pollutant) = column.name().parse::<Pollutant>() {
            observation.set(pollutant, read_number(row, column.ordinal())?);
        }
    }
    Ok(observation)
}

fn read_timestamp(row: &SqliteRow) -> Result<DateTime<Utc>> {
    let raw = row.try_get_raw("timestamp").map_err(db_error)?;
    if raw.is_null() {
        return Err(DataError::ParseError("row without timestamp".to_string()));
    }
    let type_name = raw.type_info().name().to_string();
    match type_name.as_str() {
        "INTEGER" => from_unix_seconds(row.try_get::<i64, _>("timestamp").map_err(db_error)?),
        _ => parse_timestamp(&row.try_get::<String, _>("timestamp").map_err(db_error)?),
    }
}

fn read_number(row: &SqliteRow, idx: usize) -> Result<Option<f64>> {
    let raw = row.try_get_raw(idx).map_err(db_error)?;
    if raw.is_null() {
        return Ok(None);
    }
    let type_name = raw.type_info().name().to_string();
    let value = match type_name.as_str() {
        "REAL" => row.try_get::<f64, _>(idx).map_err(db_error)?,
        "INTEGER" => row.try_get::<i64, _>(idx).map_err(db_error)? as f64,
        "TEXT" => {
            let text: String = row.try_get(idx).map_err(db_error)?;
            match text.trim().parse::<f64>() {
                Ok(v) => v,
                Err(_) => return Ok(None),
            }
        }
        _ => return Ok(None),
    };
    Ok(value.is_finite().then_some(value))
}
