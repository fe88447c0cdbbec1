//! Thermal comfort indices derived from raw atmospheric variables
//!
//! All functions are pure and total. Humidity at or below zero is floored
//! before any logarithm is taken.
//!
//! # References
//! - Rothfusz, L.P. (1990). "The Heat Index Equation". NWS Technical Attachment SR 90-23
//! - Environment Canada wind chill index (2001)
//! - Alduchov & Eskridge (1996), Magnus coefficients for dew point
//! - Masterton & Richardson (1979), Humidex

use serde::{Deserialize, Serialize};

use crate::models::RawDailyObservation;

/// Lower bound applied to relative humidity before taking its logarithm
const MIN_RELATIVE_HUMIDITY: f64 = 1e-6;

/// Magnus coefficients
const MAGNUS_A: f64 = 17.62;
const MAGNUS_B: f64 = 243.12;

/// Wind chill is undefined below this wind speed (km/h)
const WIND_CHILL_MIN_KMH: f64 = 4.8;
/// Wind chill is undefined above this temperature (°C)
const WIND_CHILL_MAX_TEMPERATURE: f64 = 10.0;

/// Heat index in Celsius using the Rothfusz regression.
///
/// The regression is applied unconditionally. It is only calibrated for hot,
/// humid air (above roughly 27°C and 40% humidity); in mild conditions it
/// drifts from the apparent temperature and is not corrected here.
///
/// # Arguments
/// * `t_celsius` - Air temperature (°C)
/// * `relative_humidity` - Relative humidity (%)
#[must_use]
pub fn heat_index(t_celsius: f64, relative_humidity: f64) -> f64 {
    let t = t_celsius * 9.0 / 5.0 + 32.0;
    let r = relative_humidity;

    let hi_f = -42.379 + 2.049_015_23 * t + 10.143_331_27 * r
        - 0.224_755_41 * t * r
        - 6.837_83e-3 * t * t
        - 5.481_717e-2 * r * r
        + 1.228_74e-3 * t * t * r
        + 8.528_2e-4 * t * r * r
        - 1.99e-6 * t * t * r * r;

    (hi_f - 32.0) * 5.0 / 9.0
}

/// Wind chill in Celsius (Environment Canada formula, wind in km/h).
///
/// Returns the air temperature unchanged when the wind is below 4.8 km/h or
/// the temperature is above 10°C.
#[must_use]
pub fn wind_chill(t_celsius: f64, wind_speed_ms: f64) -> f64 {
    let v_kmh = wind_speed_ms * 3.6;
    if v_kmh < WIND_CHILL_MIN_KMH || t_celsius > WIND_CHILL_MAX_TEMPERATURE {
        return t_celsius;
    }

    let v16 = v_kmh.powf(0.16);
    13.12 + 0.6215 * t_celsius - 11.37 * v16 + 0.3965 * t_celsius * v16
}

/// Dew point in Celsius (Magnus formula)
#[must_use]
pub fn dew_point(t_celsius: f64, relative_humidity: f64) -> f64 {
    let rh = relative_humidity.max(MIN_RELATIVE_HUMIDITY);
    let gamma = (MAGNUS_A * t_celsius / (MAGNUS_B + t_celsius)) + (rh / 100.0).ln();
    (MAGNUS_B * gamma) / (MAGNUS_A - gamma)
}

/// Humidex in Celsius, computed from the dew point
#[must_use]
pub fn humidex(t_celsius: f64, relative_humidity: f64) -> f64 {
    let td = dew_point(t_celsius, relative_humidity);
    let vapor_pressure = 6.11 * (5417.753 * (1.0 / 273.16 - 1.0 / (273.15 + td))).exp();
    t_celsius + 0.5555 * (vapor_pressure - 10.0)
}

/// Comfort indices for one observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedIndices {
    /// Heat index from the daily maximum (°C)
    pub heat_index: f64,
    /// Wind chill from the daily minimum (°C)
    pub wind_chill: f64,
    /// Dew point from the daily mean (°C)
    pub dew_point: f64,
    /// Humidex from the daily maximum (°C)
    pub humidex: f64,
}

impl DerivedIndices {
    #[must_use]
    pub fn from_observation(observation: &RawDailyObservation) -> Self {
        let rh = observation.relative_humidity;
        Self {
            heat_index: heat_index(observation.tmax, rh),
            wind_chill: wind_chill(observation.tmin, observation.wind_speed),
            dew_point: dew_point(observation.tavg, rh),
            humidex: humidex(observation.tmax, rh),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_heat_index_hot_humid_day() {
        let hi = heat_index(30.0, 70.0);
        assert_relative_eq!(hi, 35.04, epsilon = 0.05);
        assert!(hi > 32.0);
    }

    #[rstest]
    #[case(5.0, 1.0)] // 3.6 km/h, too calm
    #[case(12.0, 8.0)] // too warm
    #[case(10.5, 20.0)]
    #[case(-3.0, 1.3)] // 4.68 km/h
    fn test_wind_chill_passthrough(#[case] t: f64, #[case] v: f64) {
        assert_eq!(wind_chill(t, v), t);
    }

    #[test]
    fn test_wind_chill_applies_formula() {
        // 10 m/s = 36 km/h
        let wc = wind_chill(0.0, 10.0);
        let expected = 13.12 - 11.37 * 36.0_f64.powf(0.16);
        assert_relative_eq!(wc, expected, epsilon = 1e-12);
        assert!(wc < 0.0);

        // boundary temperature still uses the formula
        assert!(wind_chill(10.0, 5.0) < 10.0);
    }

    #[test]
    fn test_dew_point_saturated_air_equals_temperature() {
        assert_relative_eq!(dew_point(20.0, 100.0), 20.0, epsilon = 1e-9);
        assert!(dew_point(20.0, 50.0) < 20.0);
    }

    #[rstest]
    #[case(0.0)]
    #[case(-5.0)]
    #[case(1e-9)]
    #[case(0.5)]
    #[case(100.0)]
    fn test_dew_point_and_humidex_are_finite(#[case] rh: f64) {
        for t in [-40.0, -10.0, 0.0, 15.0, 35.0, 50.0] {
            assert!(dew_point(t, rh).is_finite(), "dew point t={t} rh={rh}");
            assert!(humidex(t, rh).is_finite(), "humidex t={t} rh={rh}");
        }
    }

    #[test]
    fn test_humidex_exceeds_temperature_in_humid_heat() {
        let hx = humidex(30.0, 70.0);
        assert!(hx > 30.0);
        assert_relative_eq!(hx, 41.0, epsilon = 1.0);
    }

    #[test]
    fn test_derived_indices_use_expected_temperatures() {
        let observation = RawDailyObservation {
            latitude: 0.0,
            longitude: 0.0,
            date: chrono::NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            tmax: 30.0,
            tmin: 2.0,
            tavg: 16.0,
            relative_humidity: 70.0,
            wind_speed: 5.0,
            precipitation: 0.0,
            probability_of_precipitation: 10.0,
            lead_time_hours: 72,
            forecast_spread: 0.25,
        };

        let indices = DerivedIndices::from_observation(&observation);
        assert_eq!(indices.heat_index, heat_index(30.0, 70.0));
        assert_eq!(indices.wind_chill, wind_chill(2.0, 5.0));
        assert_eq!(indices.dew_point, dew_point(16.0, 70.0));
        assert_eq!(indices.humidex, humidex(30.0, 70.0));
    }
}
