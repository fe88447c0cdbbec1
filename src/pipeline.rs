//! Probability synthesis pipeline
//!
//! Runs indices, climatology, classification, fusion and explanation for a
//! single observation. Every stage is synchronous and side-effect free.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::climatology::{ClimatologyPercentiles, ClimatologySource, SeasonalClimatology};
use crate::explain::{self, RiskExplanation};
use crate::indices::DerivedIndices;
use crate::models::{CategoryProbabilities, RawDailyObservation};
use crate::{classifier, fusion};

/// Everything the pipeline derives from one observation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub indices: DerivedIndices,
    pub climatology: ClimatologyPercentiles,
    /// Pre-fusion step probabilities
    pub raw: CategoryProbabilities,
    /// Calibrated probabilities
    pub fused: CategoryProbabilities,
    pub explanation: RiskExplanation,
    pub suggestions: Vec<String>,
}

/// Risk estimator over a pluggable climatology baseline
#[derive(Clone)]
pub struct RiskEstimator {
    climatology: Arc<dyn ClimatologySource>,
}

impl Default for RiskEstimator {
    fn default() -> Self {
        Self::new(Arc::new(SeasonalClimatology))
    }
}

impl RiskEstimator {
    #[must_use]
    pub fn new(climatology: Arc<dyn ClimatologySource>) -> Self {
        Self { climatology }
    }

    #[instrument(skip_all, fields(lat = observation.latitude, lon = observation.longitude, date = %observation.date))]
    pub fn assess(&self, observation: &RawDailyObservation) -> RiskAssessment {
        let indices = DerivedIndices::from_observation(observation);
        let climatology = self.climatology.percentiles(
            observation.latitude,
            observation.longitude,
            observation.day_of_year(),
        );
        debug!(?indices, ?climatology, "derived indices and baseline");

        let raw = classifier::classify(observation, &indices, &climatology);
        let fused = fusion::fuse(&raw, observation.lead_time_hours);
        let explanation = RiskExplanation::build(observation, &indices, &fused);
        let suggestions = explain::suggestions(&fused);

        RiskAssessment {
            indices,
            climatology,
            raw,
            fused,
            explanation,
            suggestions,
        }
    }
}
