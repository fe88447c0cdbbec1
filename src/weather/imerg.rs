//! GPM IMERG daily precipitation
//!
//! Queries a point-subsetting endpoint in front of the IMERG Final Run
//! daily product (`GPM_3IMERGDF`). Access requires an Earthdata bearer
//! token. The endpoint answers with the daily total and, optionally, a PoP.

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{ObservationRequest, PrecipitationEstimate, Provider, estimate_pop_from_daily};
use crate::models::round_to;
use crate::{ParadeWeatherError, Result};

#[derive(Debug, Deserialize)]
struct ImergResponse {
    precip_mm: f64,
    pop_percent: Option<u8>,
}

impl ImergResponse {
    fn into_estimate(self) -> Result<PrecipitationEstimate> {
        if !self.precip_mm.is_finite() || self.precip_mm < 0.0 {
            return Err(ParadeWeatherError::api(format!(
                "IMERG returned an invalid precipitation total: {}",
                self.precip_mm
            )));
        }
        let precip_mm = round_to(self.precip_mm, 1);
        Ok(PrecipitationEstimate {
            precip_mm,
            pop_percent: self
                .pop_percent
                .unwrap_or_else(|| estimate_pop_from_daily(precip_mm))
                .min(100),
        })
    }
}

pub struct ImergClient {
    client: ClientWithMiddleware,
    endpoint: String,
    token: String,
}

impl ImergClient {
    #[must_use]
    pub fn new(client: ClientWithMiddleware, endpoint: String, token: String) -> Self {
        Self {
            client,
            endpoint,
            token,
        }
    }

    fn point_url(&self, request: &ObservationRequest) -> String {
        format!(
            "{}?lat={}&lon={}&date={}",
            self.endpoint,
            request.location.latitude,
            request.location.longitude,
            request.date.format("%Y-%m-%d"),
        )
    }
}

#[async_trait]
impl Provider for ImergClient {
    type Output = PrecipitationEstimate;

    fn name(&self) -> &'static str {
        "imerg-v07"
    }

    #[instrument(name = "imerg_fetch", skip(self), fields(lat = request.location.latitude, lon = request.location.longitude))]
    async fn fetch(&self, request: &ObservationRequest) -> Result<PrecipitationEstimate> {
        let url = self.point_url(request);
        debug!(%url, "requesting IMERG daily precipitation");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?;
        let body: ImergResponse = response.json().await?;

        body.into_estimate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Location;
    use chrono::NaiveDate;
    use rstest::rstest;

    #[test]
    fn test_point_url() {
        let http = super::super::http_client(std::time::Duration::from_secs(5), 0).unwrap();
        let client = ImergClient::new(
            http,
            "https://subset.example.org/imerg/daily".to_string(),
            "token".to_string(),
        );
        let request = ObservationRequest {
            location: Location::new(-34.9, -56.2),
            date: NaiveDate::from_ymd_opt(2025, 10, 5).unwrap(),
        };
        assert_eq!(
            client.point_url(&request),
            "https://subset.example.org/imerg/daily?lat=-34.9&lon=-56.2&date=2025-10-05"
        );
    }

    #[rstest]
    #[case(7.24, None, 7.2, 70)]
    #[case(0.0, None, 0.0, 10)]
    #[case(1.0, Some(45), 1.0, 45)]
    #[case(20.0, Some(150), 20.0, 100)]
    fn test_estimate_from_response(
        #[case] precip_mm: f64,
        #[case] pop_percent: Option<u8>,
        #[case] expected_mm: f64,
        #[case] expected_pop: u8,
    ) {
        let estimate = ImergResponse {
            precip_mm,
            pop_percent,
        }
        .into_estimate()
        .unwrap();
        assert_eq!(estimate.precip_mm, expected_mm);
        assert_eq!(estimate.pop_percent, expected_pop);
    }

    #[test]
    fn test_negative_precipitation_rejected() {
        let err = ImergResponse {
            precip_mm: -1.0,
            pop_percent: None,
        }
        .into_estimate()
        .unwrap_err();
        assert!(matches!(err, ParadeWeatherError::Api { .. }));
    }
}
