//! Measured quantities.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// A pollutant or meteorological variable reported per hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pollutant {
    /// Carbon monoxide
    Co,
    /// Nitrogen dioxide
    No2,
    /// Ozone
    O3,
    /// Particulate matter below 10 µm
    Pm10,
    /// Particulate matter below 2.5 µm
    #[serde(rename = "pm2_5")]
    Pm25,
    /// Sulphur dioxide
    So2,
    /// Air temperature at 2 m
    #[serde(rename = "temp")]
    Temperature,
    /// Relative humidity at 2 m
    Humidity,
    /// Wind speed at 10 m
    WindSpeed,
}

impl Pollutant {
    /// Every variable, in table column order.
    pub const ALL: [Pollutant; 9] = [
        Pollutant::Co,
        Pollutant::No2,
        Pollutant::O3,
        Pollutant::Pm10,
        Pollutant::Pm25,
        Pollutant::So2,
        Pollutant::Temperature,
        Pollutant::Humidity,
        Pollutant::WindSpeed,
    ];

    /// Column name in the `ghg_data` table.
    pub fn column(&self) -> &'static str {
        match self {
            Pollutant::Co => "co",
            Pollutant::No2 => "no2",
            Pollutant::O3 => "o3",
            Pollutant::Pm10 => "pm10",
            Pollutant::Pm25 => "pm2_5",
            Pollutant::So2 => "so2",
            Pollutant::Temperature => "temp",
            Pollutant::Humidity => "humidity",
            Pollutant::WindSpeed => "wind_speed",
        }
    }

    /// Hourly variable name used by the Open-Meteo APIs.
    pub fn api_variable(&self) -> &'static str {
        match self {
            Pollutant::Co => "carbon_monoxide",
            Pollutant::No2 => "nitrogen_dioxide",
            Pollutant::O3 => "ozone",
            Pollutant::Pm10 => "pm10",
            Pollutant::Pm25 => "pm2_5",
            Pollutant::So2 => "sulphur_dioxide",
            Pollutant::Temperature => "temperature_2m",
            Pollutant::Humidity => "relative_humidity_2m",
            Pollutant::WindSpeed => "wind_speed_10m",
        }
    }

    /// Whether the variable is served by the weather forecast endpoint
    /// rather than the air-quality endpoint.
    pub fn is_meteorological(&self) -> bool {
        matches!(
            self,
            Pollutant::Temperature | Pollutant::Humidity | Pollutant::WindSpeed
        )
    }

    /// Look a variable up by its API name.
    pub fn from_api_variable(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.api_variable() == name)
    }
}

impl std::fmt::Display for Pollutant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Pollutant::Co => "CO",
            Pollutant::No2 => "NO₂",
            Pollutant::O3 => "O₃",
            Pollutant::Pm10 => "PM10",
            Pollutant::Pm25 => "PM2.5",
            Pollutant::So2 => "SO₂",
            Pollutant::Temperature => "Temperature",
            Pollutant::Humidity => "Humidity",
            Pollutant::WindSpeed => "Wind speed",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Pollutant {
    type Err = DataError;

    /// Accepts either the column name or the API variable name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.column() == key || p.api_variable() == key)
            .ok_or_else(|| DataError::ParseError(format!("unknown pollutant: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_names() {
        let columns: Vec<_> = Pollutant::ALL.iter().map(|p| p.column()).collect();
        assert_eq!(
            columns,
            vec!["co", "no2", "o3", "pm10", "pm2_5", "so2", "temp", "humidity", "wind_speed"]
        );
    }

    #[test]
    fn test_api_variables() {
        assert_eq!(Pollutant::Co.api_variable(), "carbon_monoxide");
        assert_eq!(Pollutant::So2.api_variable(), "sulphur_dioxide");
        assert_eq!(Pollutant::Humidity.api_variable(), "relative_humidity_2m");
        assert_eq!(
            Pollutant::from_api_variable("ozone"),
            Some(Pollutant::O3)
        );
        assert_eq!(Pollutant::from_api_variable("methane"), None);
    }

    #[test]
    fn test_meteorological_split() {
        let met: Vec<_> = Pollutant::ALL
            .iter()
            .filter(|p| p.is_meteorological())
            .collect();
        assert_eq!(met.len(), 3);
        assert!(!Pollutant::Co.is_meteorological());
    }

    #[test]
    fn test_from_str() {
        assert_eq!("co".parse::<Pollutant>().unwrap(), Pollutant::Co);
        assert_eq!(" PM2_5 ".parse::<Pollutant>().unwrap(), Pollutant::Pm25);
        assert_eq!("wind_speed_10m".parse::<Pollutant>().unwrap(), Pollutant::WindSpeed);
        assert!("ch4".parse::<Pollutant>().is_err());
    }
}
