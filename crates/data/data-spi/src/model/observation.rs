//! Hourly observation rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Pollutant;

/// One timestamped row of pollutant and weather readings.
///
/// Any reading may be missing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Observation {
    pub timestamp: DateTime<Utc>,
    pub co: Option<f64>,
    pub no2: Option<f64>,
    pub o3: Option<f64>,
    pub pm10: Option<f64>,
    pub pm2_5: Option<f64>,
    pub so2: Option<f64>,
    #[serde(rename = "temp")]
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
}

impl Observation {
    /// Create an observation with every reading missing.
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            ..Self::default()
        }
    }

    /// Set one reading, builder style.
    pub fn with(mut self, pollutant: Pollutant, value: f64) -> Self {
        self.set(pollutant, Some(value));
        self
    }

    pub fn get(&self, pollutant: Pollutant) -> Option<f64> {
        match pollutant {
            Pollutant::Co => self.co,
            Pollutant::No2 => self.no2,
            Pollutant::O3 => self.o3,
            Pollutant::Pm10 => self.pm10,
            Pollutant::Pm25 => self.pm2_5,
            Pollutant::So2 => self.so2,
            Pollutant::Temperature => self.temperature,
            Pollutant::Humidity => self.humidity,
            Pollutant::WindSpeed => self.wind_speed,
        }
    }

    pub fn set(&mut self, pollutant: Pollutant, value: Option<f64>) {
        let slot = match pollutant {
            Pollutant::Co => &mut self.co,
            Pollutant::No2 => &mut self.no2,
            Pollutant::O3 => &mut self.o3,
            Pollutant::Pm10 => &mut self.pm10,
            Pollutant::Pm25 => &mut self.pm2_5,
            Pollutant::So2 => &mut self.so2,
            Pollutant::Temperature => &mut self.temperature,
            Pollutant::Humidity => &mut self.humidity,
            Pollutant::WindSpeed => &mut self.wind_speed,
        };
        *slot = value;
    }

    /// Fill readings missing here from `other`.
    pub fn merge(&mut self, other: &Observation) {
        for p in Pollutant::ALL {
            if self.get(p).is_none() {
                self.set(p, other.get(p));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 11, 3, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_new_observation_is_empty() {
        let obs = Observation::new(ts(0));
        for p in Pollutant::ALL {
            assert_eq!(obs.get(p), None);
        }
    }

    #[test]
    fn test_get_set() {
        let mut obs = Observation::new(ts(1)).with(Pollutant::Co, 0.41);
        obs.set(Pollutant::Temperature, Some(27.5));
        assert_eq!(obs.get(Pollutant::Co), Some(0.41));
        assert_eq!(obs.temperature, Some(27.5));
        obs.set(Pollutant::Co, None);
        assert_eq!(obs.co, None);
    }

    #[test]
    fn test_merge_keeps_existing() {
        let mut air = Observation::new(ts(2))
            .with(Pollutant::Co, 0.3)
            .with(Pollutant::O3, 61.0);
        let weather = Observation::new(ts(2))
            .with(Pollutant::Temperature, 29.1)
            .with(Pollutant::Co, 9.9);
        air.merge(&weather);
        assert_eq!(air.co, Some(0.3));
        assert_eq!(air.temperature, Some(29.1));
        assert_eq!(air.o3, Some(61.0));
    }
}
