//! Climatological percentile baseline
//!
//! A closed-form seasonal cycle stands in for a climate-reanalysis lookup.
//! It produces p10/p50/p90 bands for heat index, wind chill, wind speed and
//! daily precipitation from latitude, longitude and day of year. A gridded
//! dataset can replace it by implementing [`ClimatologySource`]; the output
//! shape does not change.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::models::round_to;

/// Day of year at which the Northern-hemisphere seasonal cycle peaks
const NORTHERN_SUMMER_PEAK_DOY: u32 = 200;
/// Half-year shift applied for the Southern hemisphere
const HEMISPHERE_SHIFT_DAYS: u32 = 182;
const DAYS_PER_YEAR: f64 = 365.0;

/// Minimum climatological wind speed (m/s)
const MIN_WIND_MS: f64 = 0.5;

/// p10/p50/p90 reference values for one variable
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentileBand {
    pub p10: f64,
    pub p50: f64,
    pub p90: f64,
}

impl PercentileBand {
    fn rounded(p10: f64, p50: f64, p90: f64) -> Self {
        Self {
            p10: round_to(p10, 1),
            p50: round_to(p50, 1),
            p90: round_to(p90, 1),
        }
    }
}

/// Percentile bands for every variable family used by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct ClimatologyPercentiles {
    /// Heat index (°C)
    pub heat_index: PercentileBand,
    /// Wind chill (°C)
    pub wind_chill: PercentileBand,
    /// Wind speed (m/s)
    pub wind: PercentileBand,
    /// Daily precipitation (mm)
    pub precipitation: PercentileBand,
}

/// A source of climatological baselines for a place and time of year.
///
/// Implementations must be deterministic: identical inputs yield identical
/// output.
pub trait ClimatologySource: Send + Sync {
    fn percentiles(&self, latitude: f64, longitude: f64, day_of_year: u32)
    -> ClimatologyPercentiles;
}

/// Seasonal-cycle phase offset in days for the hemisphere of `latitude`
#[must_use]
pub fn seasonal_offset(latitude: f64) -> u32 {
    if latitude < 0.0 {
        (NORTHERN_SUMMER_PEAK_DOY + HEMISPHERE_SHIFT_DAYS) % 365
    } else {
        NORTHERN_SUMMER_PEAK_DOY
    }
}

/// Annual mean temperature (°C); cools linearly toward the poles
#[must_use]
pub fn annual_mean_temperature(latitude: f64) -> f64 {
    18.0 - 0.12 * latitude.abs()
}

/// Seasonal temperature amplitude (°C), never below 6
#[must_use]
pub fn seasonal_amplitude(latitude: f64) -> f64 {
    (12.0 - 0.08 * latitude.abs()).max(6.0)
}

/// Seasonal signal `(sin θ, cos θ)` with `θ = 2π(doy - offset)/365`
#[must_use]
pub fn seasonal_signal(latitude: f64, day_of_year: u32) -> (f64, f64) {
    let offset = f64::from(seasonal_offset(latitude));
    let theta = 2.0 * PI * ((f64::from(day_of_year) - offset) / DAYS_PER_YEAR);
    theta.sin_cos()
}

/// Closed-form seasonal climatology
#[derive(Debug, Clone, Copy, Default)]
pub struct SeasonalClimatology;

impl ClimatologySource for SeasonalClimatology {
    fn percentiles(
        &self,
        latitude: f64,
        longitude: f64,
        day_of_year: u32,
    ) -> ClimatologyPercentiles {
        let abs_lat = latitude.abs();
        let (s, c) = seasonal_signal(latitude, day_of_year);

        let t50 = annual_mean_temperature(latitude) + seasonal_amplitude(latitude) * s;

        let heat_index = PercentileBand::rounded(t50 - 4.0, t50, t50 + 4.0);

        let wc_p50 = t50 - 2.0;
        let wind_chill = PercentileBand::rounded(wc_p50 - 6.0, wc_p50, wc_p50 + 6.0);

        // Windier at mid latitudes, gently modulated by season
        let mean_wind = 4.0 + 0.03 * abs_lat;
        let amp_wind = 1.0 + 0.01 * abs_lat;
        let wind_p50 = (mean_wind + 0.5 * c * amp_wind).max(MIN_WIND_MS);
        let wind = PercentileBand::rounded(
            (wind_p50 - 2.0).max(MIN_WIND_MS),
            wind_p50,
            wind_p50 + 3.0,
        );

        // Wetter in the warm half of the cycle; longitude adds a fixed coastal term in [0.3, 0.5]
        let wet_season = s.max(0.0);
        let coastiness = 0.3 + 0.2 * (0.5 + 0.5 * longitude.to_radians().sin());
        let prcp_p50 = 1.0 + 6.0 * wet_season * coastiness;
        let prcp_p90 = prcp_p50 + 6.0 * (0.6 + 0.4 * wet_season);
        let precipitation =
            PercentileBand::rounded((prcp_p50 - 1.5).max(0.0), prcp_p50, prcp_p90);

        ClimatologyPercentiles {
            heat_index,
            wind_chill,
            wind,
            precipitation,
        }
    }
}
