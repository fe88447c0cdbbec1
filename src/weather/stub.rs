//! Synthetic observation generator
//!
//! Last resort of the observation chain. Values are plausible for a temperate
//! spring day. The generator owns a seedable RNG so test runs can be
//! reproduced.

use std::sync::Mutex;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

use super::{AcquisitionDefaults, ObservationRequest, Provider, coarse_pop_from_daily};
use crate::models::{RawDailyObservation, round_to};
use crate::{ParadeWeatherError, Result};

pub struct StubProvider {
    rng: Mutex<StdRng>,
    defaults: AcquisitionDefaults,
}

impl StubProvider {
    #[must_use]
    pub fn seeded(seed: u64, defaults: AcquisitionDefaults) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            defaults,
        }
    }

    #[must_use]
    pub fn from_entropy(defaults: AcquisitionDefaults) -> Self {
        let seed: u64 = rand::rng().random();
        tracing::debug!(seed, "seeding stub provider");
        Self::seeded(seed, defaults)
    }

    fn sample(&self, request: &ObservationRequest) -> Result<RawDailyObservation> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| ParadeWeatherError::general("stub generator lock poisoned"))?;

        let tmax: f64 = 24.0 + rng.random_range(-5.0..5.0);
        let tmin: f64 = 14.0 + rng.random_range(-5.0..5.0);
        let rh: f64 = 65.0 + rng.random_range(-20.0..20.0);
        let wind: f64 = rng.random_range(2.0..12.0_f64).max(1.0);
        let precip: f64 = if rng.random_bool(0.5) {
            rng.random_range(0.0..15.0)
        } else {
            0.0
        };

        let precipitation = round_to(precip, 1);
        Ok(RawDailyObservation {
            latitude: request.location.latitude,
            longitude: request.location.longitude,
            date: request.date,
            tmax: round_to(tmax, 1),
            tmin: round_to(tmin, 1),
            tavg: round_to((tmax + tmin) / 2.0, 1),
            relative_humidity: round_to(rh, 0),
            wind_speed: round_to(wind, 1),
            precipitation,
            probability_of_precipitation: f64::from(coarse_pop_from_daily(precipitation)),
            lead_time_hours: self.defaults.lead_time_hours,
            forecast_spread: self.defaults.forecast_spread,
        })
    }
}

#[async_trait]
impl Provider for StubProvider {
    type Output = RawDailyObservation;

    fn name(&self) -> &'static str {
        "stub"
    }

    async fn fetch(&self, request: &ObservationRequest) -> Result<RawDailyObservation> {
        self.sample(request)
    }
}
