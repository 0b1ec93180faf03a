//! Utility functions for working with observation rows.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{Observation, Pollutant};

/// Direction of the most recent samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Trend::Up => "up",
            Trend::Down => "down",
            Trend::Stable => "stable",
        };
        write!(f, "{}", s)
    }
}

/// Number of samples the short-term trend looks at.
pub const TREND_SAMPLES: usize = 3;

/// One reading per distinct timestamp, oldest first.
///
/// When several rows share a timestamp the last present reading wins.
fn readings(
    observations: &[Observation],
    pollutant: Pollutant,
) -> Vec<(DateTime<Utc>, Option<f64>)> {
    let mut by_time: BTreeMap<DateTime<Utc>, Option<f64>> = BTreeMap::new();
    for o in observations {
        match o.get(pollutant).filter(|v| v.is_finite()) {
            Some(v) => {
                by_time.insert(o.timestamp, Some(v));
            }
            None => {
                by_time.entry(o.timestamp).or_insert(None);
            }
        }
    }
    by_time.into_iter().collect()
}

fn present(observations: &[Observation], pollutant: Pollutant) -> Vec<(DateTime<Utc>, f64)> {
    readings(observations, pollutant)
        .into_iter()
        .filter_map(|(t, v)| v.map(|v| (t, v)))
        .collect()
}

/// Chronological series of one variable with missing readings dropped.
pub fn pollutant_series(observations: &[Observation], pollutant: Pollutant) -> Vec<f64> {
    present(observations, pollutant)
        .into_iter()
        .map(|(_, v)| v)
        .collect()
}

/// Chronological series of one variable keeping missing readings as `NaN`.
pub fn raw_series(observations: &[Observation], pollutant: Pollutant) -> Vec<f64> {
    readings(observations, pollutant)
        .into_iter()
        .map(|(_, v)| v.unwrap_or(f64::NAN))
        .collect()
}

/// Latest non-missing reading and when it was taken.
pub fn latest_value(
    observations: &[Observation],
    pollutant: Pollutant,
) -> Option<(f64, DateTime<Utc>)> {
    present(observations, pollutant)
        .last()
        .map(|&(t, v)| (v, t))
}

/// Compare the newest of the last three readings with the oldest of them.
///
/// Returns `None` when fewer than three readings are present.
pub fn short_term_trend(observations: &[Observation], pollutant: Pollutant) -> Option<Trend> {
    let points = present(observations, pollutant);
    if points.len() < TREND_SAMPLES {
        return None;
    }
    let recent = &points[points.len() - TREND_SAMPLES..];
    let first = recent[0].1;
    let last = recent[TREND_SAMPLES - 1].1;
    Some(if last > first {
        Trend::Up
    } else if last < first {
        Trend::Down
    } else {
        Trend::Stable
    })
}

/// Timestamp a one-step forecast refers to: the last timestamp plus the
/// last observed step (one hour when only one row exists).
pub fn next_timestamp(observations: &[Observation]) -> Option<DateTime<Utc>> {
    let mut stamps: Vec<_> = observations.iter().map(|o| o.timestamp).collect();
    stamps.sort();
    stamps.dedup();
    let last = *stamps.last()?;
    let step = match stamps.len() {
        0 | 1 => Duration::hours(1),
        n => last - stamps[n - 2],
    };
    Some(last + step)
}
