use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    response::Json,
    routing::{get, post},
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::{
    ParadeWeatherError, Result,
    explain::{Confidence, Driver},
    indices::DerivedIndices,
    models::{CategoryProbabilities, Location, RiskCategory},
    pipeline::RiskEstimator,
    weather::{ObservationRequest, ObservationService, Provenance},
};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub estimator: RiskEstimator,
    pub observations: Arc<ObservationService>,
    /// Timezone label echoed in every answer
    pub timezone: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub ts: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    pub lat: f64,
    pub lon: f64,
    /// `YYYY-MM-DD` or an RFC 3339 timestamp
    pub date_iso: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryWhen {
    pub date_iso: String,
    pub lead_hours: u32,
    pub tz: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    pub location: Location,
    pub when: QueryWhen,
    pub probabilities: CategoryProbabilities,
    pub top_risks: Vec<RiskCategory>,
    pub drivers: Vec<Driver>,
    pub confidence: Confidence,
    pub suggestions: Vec<String>,
    pub indices: DerivedIndices,
    pub sources: Provenance,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/query", post(query))
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        ts: Utc::now().to_rfc3339(),
    })
}

#[instrument(skip(state), fields(lat = request.lat, lon = request.lon, date = %request.date_iso))]
async fn query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>> {
    let location = Location::validated(request.lat, request.lon)?;
    let date = parse_event_date(&request.date_iso)?;

    let acquired = state
        .observations
        .acquire(&ObservationRequest { location, date })
        .await?;
    let assessment = state.estimator.assess(&acquired.observation);

    info!(
        location = %location.format_coordinates(),
        top_risks = ?assessment.explanation.top_risks,
        confidence = ?assessment.explanation.confidence,
        "query answered"
    );

    Ok(Json(QueryResponse {
        location,
        when: QueryWhen {
            date_iso: request.date_iso,
            lead_hours: acquired.observation.lead_time_hours,
            tz: state.timezone.clone(),
        },
        probabilities: assessment.fused,
        top_risks: assessment.explanation.top_risks,
        drivers: assessment.explanation.drivers,
        confidence: assessment.explanation.confidence,
        suggestions: assessment.suggestions,
        indices: assessment.indices,
        sources: acquired.provenance,
    }))
}

/// Event date from a calendar date or a timestamp (its own calendar date)
pub fn parse_event_date(date_iso: &str) -> Result<NaiveDate> {
    let trimmed = date_iso.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(trimmed).map(|dt| dt.date_naive()))
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S").map(|dt| dt.date()))
        .map_err(|_| {
            ParadeWeatherError::validation(format!(
                "date_iso '{date_iso}' is not a YYYY-MM-DD date or RFC 3339 timestamp"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("2025-10-05")]
    #[case("2025-10-05T14:30:00Z")]
    #[case("2025-10-05T23:30:00-03:00")]
    #[case("2025-10-05T09:00:00")]
    fn test_parse_event_date(#[case] input: &str) {
        assert_eq!(
            parse_event_date(input).unwrap(),
            NaiveDate::from_ymd_opt(2025, 10, 5).unwrap()
        );
    }

    #[rstest]
    #[case("")]
    #[case("05/10/2025")]
    #[case("2025-13-01")]
    fn test_parse_event_date_rejects(#[case] input: &str) {
        let err = parse_event_date(input).unwrap_err();
        assert!(matches!(err, ParadeWeatherError::Validation { .. }));
    }
}
