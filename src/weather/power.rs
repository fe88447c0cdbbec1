//! NASA POWER daily point client
//!
//! Fetches daily maximum/minimum temperature, relative humidity, wind speed
//! and corrected precipitation for one point and one day.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{AcquisitionDefaults, ObservationRequest, Provider, coarse_pop_from_daily};
use crate::models::{RawDailyObservation, round_to};
use crate::{ParadeWeatherError, Result};

const PARAMETERS: &str = "T2M_MAX,T2M_MIN,RH2M,WS10M,PRECTOTCORR";
/// POWER marks missing data with this value
const FILL_VALUE: f64 = -999.0;

#[derive(Debug, Deserialize)]
struct PowerResponse {
    properties: PowerProperties,
}

#[derive(Debug, Deserialize)]
struct PowerProperties {
    /// Parameter name -> (YYYYMMDD -> value)
    parameter: HashMap<String, HashMap<String, f64>>,
}

impl PowerResponse {
    fn daily_value(&self, parameter: &str, day_key: &str) -> Result<f64> {
        let value = self
            .properties
            .parameter
            .get(parameter)
            .and_then(|days| days.get(day_key))
            .copied()
            .ok_or_else(|| {
                ParadeWeatherError::api(format!("POWER response has no {parameter} for {day_key}"))
            })?;

        if value <= FILL_VALUE {
            return Err(ParadeWeatherError::api(format!(
                "POWER reports {parameter} as missing for {day_key}"
            )));
        }
        Ok(value)
    }
}

/// Client for the POWER `temporal/daily/point` endpoint
pub struct PowerClient {
    client: ClientWithMiddleware,
    base_url: String,
    defaults: AcquisitionDefaults,
}

impl PowerClient {
    #[must_use]
    pub fn new(client: ClientWithMiddleware, base_url: String, defaults: AcquisitionDefaults) -> Self {
        Self {
            client,
            base_url,
            defaults,
        }
    }

    fn daily_url(&self, request: &ObservationRequest, day_key: &str) -> String {
        format!(
            "{}/temporal/daily/point?latitude={}&longitude={}&start={day_key}&end={day_key}&community=RE&parameters={PARAMETERS}&format=JSON",
            self.base_url.trim_end_matches('/'),
            request.location.latitude,
            request.location.longitude,
        )
    }

    fn to_observation(
        &self,
        response: &PowerResponse,
        request: &ObservationRequest,
        day_key: &str,
    ) -> Result<RawDailyObservation> {
        let tmax = response.daily_value("T2M_MAX", day_key)?;
        let tmin = response.daily_value("T2M_MIN", day_key)?;
        let rh = response.daily_value("RH2M", day_key)?;
        let wind = response.daily_value("WS10M", day_key)?;
        let precip = response.daily_value("PRECTOTCORR", day_key)?;

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
impl Provider for PowerClient {
    type Output = RawDailyObservation;

    fn name(&self) -> &'static str {
        "nasa-power"
    }

    #[instrument(name = "power_fetch", skip(self), fields(lat = request.location.latitude, lon = request.location.longitude))]
    async fn fetch(&self, request: &ObservationRequest) -> Result<RawDailyObservation> {
        let day_key = request.date.format("%Y%m%d").to_string();
        let url = self.daily_url(request, &day_key);
        debug!(%url, "requesting POWER daily point");

        let response = self.client.get(&url).send().await?.error_for_status()?;
        let body: PowerResponse = response.json().await?;

        self.to_observation(&body, request, &day_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Location;
    use chrono::NaiveDate;

    fn request() -> ObservationRequest {
        ObservationRequest {
            location: Location::new(-34.905, -56.191),
            date: NaiveDate::from_ymd_opt(2025, 10, 5).unwrap(),
        }
    }

    fn client() -> PowerClient {
        let http = super::super::http_client(std::time::Duration::from_secs(5), 0).unwrap();
        PowerClient::new(
            http,
            "https://power.larc.nasa.gov/api/".to_string(),
            AcquisitionDefaults::default(),
        )
    }

    fn response(precip: f64) -> PowerResponse {
        serde_json::from_value(serde_json::json!({
            "type": "Feature",
            "properties": {
                "parameter": {
                    "T2M_MAX": {"20251005": 21.37},
                    "T2M_MIN": {"20251005": 11.02},
                    "RH2M": {"20251005": 71.6},
                    "WS10M": {"20251005": 4.46},
                    "PRECTOTCORR": {"20251005": precip}
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_daily_url() {
        let url = client().daily_url(&request(), "20251005");
        assert_eq!(
            url,
            "https://power.larc.nasa.gov/api/temporal/daily/point?latitude=-34.905&longitude=-56.191&start=20251005&end=20251005&community=RE&parameters=T2M_MAX,T2M_MIN,RH2M,WS10M,PRECTOTCORR&format=JSON"
        );
    }

    #[test]
    fn test_response_to_observation() {
        let observation = client()
            .to_observation(&response(6.34), &request(), "20251005")
            .unwrap();

        assert_eq!(observation.tmax, 21.4);
        assert_eq!(observation.tmin, 11.0);
        assert_eq!(observation.tavg, 16.2);
        assert_eq!(observation.relative_humidity, 72.0);
        assert_eq!(observation.wind_speed, 4.5);
        assert_eq!(observation.precipitation, 6.3);
        assert_eq!(observation.probability_of_precipitation, 60.0);
        assert_eq!(observation.lead_time_hours, 72);
        assert_eq!(observation.forecast_spread, 0.25);
    }

    #[test]
    fn test_fill_value_is_a_failure() {
        let err = client()
            .to_observation(&response(-999.0), &request(), "20251005")
            .unwrap_err();
        assert!(err.to_string().contains("PRECTOTCORR"));
    }

    #[test]
    fn test_missing_day_is_a_failure() {
        let err = client()
            .to_observation(&response(0.0), &request(), "20251006")
            .unwrap_err();
        assert!(matches!(err, ParadeWeatherError::Api { .. }));
    }
}
