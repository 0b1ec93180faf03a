//! Geographic coordinates.

use serde::{Deserialize, Serialize};

use crate::error::{DataError, Result};

/// Default latitude (Kolkata).
pub const DEFAULT_LATITUDE: f64 = 22.5726;
/// Default longitude (Kolkata).
pub const DEFAULT_LONGITUDE: f64 = 88.3639;

/// A validated latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || latitude.abs() > 90.0 {
            return Err(DataError::InvalidCoordinates(format!(
                "latitude {} outside [-90, 90]",
                latitude
            )));
        }
        if !longitude.is_finite() || longitude.abs() > 180.0 {
            return Err(DataError::InvalidCoordinates(format!(
                "longitude {} outside [-180, 180]",
                longitude
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl Default for Coordinates {
    fn default() -> Self {
        Self {
            latitude: DEFAULT_LATITUDE,
            longitude: DEFAULT_LONGITUDE,
        }
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_coordinates() {
        let c = Coordinates::new(22.5726, 88.3639).unwrap();
        assert_eq!(c.latitude(), 22.5726);
        assert_eq!(c.longitude(), 88.3639);
        assert_eq!(c.to_string(), "22.572600, 88.363900");
        assert_eq!(c, Coordinates::default());
    }

    #[test]
    fn test_bounds_inclusive() {
        assert!(Coordinates::new(90.0, 180.0).is_ok());
        assert!(Coordinates::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn test_out_of_range() {
        assert!(matches!(
            Coordinates::new(90.5, 0.0),
            Err(DataError::InvalidCoordinates(_))
        ));
        assert!(matches!(
            Coordinates::new(0.0, -180.1),
            Err(DataError::InvalidCoordinates(_))
        ));
        assert!(Coordinates::new(f64::NAN, 0.0).is_err());
    }
}
