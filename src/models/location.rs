//! Location model for geographic coordinates

use serde::{Deserialize, Serialize};

use crate::{ParadeWeatherError, Result};

/// Location coordinates
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Location {
    /// Latitude in decimal degrees
    #[serde(rename = "lat")]
    pub latitude: f64,
    /// Longitude in decimal degrees
    #[serde(rename = "lon")]
    pub longitude: f64,
}

impl Location {
    /// Create a new location
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Create a location, rejecting coordinates outside the valid ranges
    pub fn validated(latitude: f64, longitude: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ParadeWeatherError::validation(format!(
                "latitude {latitude} must be within [-90, 90]"
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(ParadeWeatherError::validation(format!(
                "longitude {longitude} must be within [-180, 180]"
            )));
        }
        Ok(Self::new(latitude, longitude))
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_format_coordinates() {
        let location = Location::new(-34.905, -56.191);
        assert_eq!(location.format_coordinates(), "-34.9050, -56.1910");
    }

    #[rstest]
    #[case(90.0, 180.0)]
    #[case(-90.0, -180.0)]
    #[case(0.0, 0.0)]
    fn test_validated_accepts_bounds(#[case] lat: f64, #[case] lon: f64) {
        assert!(Location::validated(lat, lon).is_ok());
    }

    #[rstest]
    #[case(90.1, 0.0)]
    #[case(-91.0, 0.0)]
    #[case(0.0, 180.5)]
    #[case(f64::NAN, 0.0)]
    fn test_validated_rejects_out_of_range(#[case] lat: f64, #[case] lon: f64) {
        let err = Location::validated(lat, lon).unwrap_err();
        assert!(matches!(err, ParadeWeatherError::Validation { .. }));
    }

    #[test]
    fn test_serializes_as_lat_lon() {
        let value = serde_json::to_value(Location::new(1.5, 2.5)).unwrap();
        assert_eq!(value, serde_json::json!({"lat": 1.5, "lon": 2.5}));
    }
}
