//! Raw daily observation model

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::Location;

/// Daily meteorological inputs for one location and date.
///
/// Produced by an acquisition provider and never mutated afterwards.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RawDailyObservation {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Calendar date the observation describes
    pub date: NaiveDate,
    /// Daily maximum temperature in Celsius
    pub tmax: f64,
    /// Daily minimum temperature in Celsius
    pub tmin: f64,
    /// Daily mean temperature in Celsius
    pub tavg: f64,
    /// Relative humidity percentage (0-100)
    pub relative_humidity: f64,
    /// Wind speed in m/s
    pub wind_speed: f64,
    /// Daily precipitation total in mm
    pub precipitation: f64,
    /// Probability of precipitation percentage (0-100)
    pub probability_of_precipitation: f64,
    /// Hours between the query and the target date
    pub lead_time_hours: u32,
    /// Spread of the forecast ensemble, used for confidence
    pub forecast_spread: f64,
}

impl RawDailyObservation {
    #[must_use]
    pub fn location(&self) -> Location {
        Location::new(self.latitude, self.longitude)
    }

    /// Ordinal day of the year (1-366)
    #[must_use]
    pub fn day_of_year(&self) -> u32 {
        self.date.ordinal()
    }
}
