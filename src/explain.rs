//! Risk ranking, drivers and confidence

use serde::{Deserialize, Serialize};

use crate::indices::DerivedIndices;
use crate::models::{CategoryProbabilities, RawDailyObservation, RiskCategory};

/// Fused probability above which a category counts as a notable risk
pub const NOTABLE_RISK_THRESHOLD: f64 = 0.3;
/// Maximum number of ranked risks reported
pub const MAX_TOP_RISKS: usize = 2;

const HIGH_CONFIDENCE_SPREAD: f64 = 0.15;
const MEDIUM_CONFIDENCE_SPREAD: f64 = 0.35;

/// Qualitative confidence in the estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

/// A human-readable raw quantity tied to the fused probability it drives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub label: String,
    pub value: f64,
    pub unit: String,
    pub contribution: f64,
}

impl Driver {
    fn new(label: &str, value: f64, unit: &str, contribution: f64) -> Self {
        Self {
            label: label.to_string(),
            value,
            unit: unit.to_string(),
            contribution,
        }
    }
}

/// Ranked risks, drivers and confidence for one assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskExplanation {
    pub top_risks: Vec<RiskCategory>,
    pub drivers: Vec<Driver>,
    pub confidence: Confidence,
}

impl RiskExplanation {
    #[must_use]
    pub fn build(
        observation: &RawDailyObservation,
        indices: &DerivedIndices,
        fused: &CategoryProbabilities,
    ) -> Self {
        Self {
            top_risks: top_risks(fused),
            drivers: drivers(observation, indices, fused),
            confidence: confidence_from_spread(observation.forecast_spread),
        }
    }
}

/// Categories above the notable threshold, most likely first.
///
/// Ties keep canonical category order. At most two are returned.
#[must_use]
pub fn top_risks(fused: &CategoryProbabilities) -> Vec<RiskCategory> {
    let mut notable: Vec<(RiskCategory, f64)> = fused
        .iter()
        .filter(|(_, p)| *p > NOTABLE_RISK_THRESHOLD)
        .collect();
    // stable sort keeps canonical order among equal probabilities
    notable.sort_by(|a, b| b.1.total_cmp(&a.1));
    notable
        .into_iter()
        .take(MAX_TOP_RISKS)
        .map(|(category, _)| category)
        .collect()
}

/// Map a forecast spread to a confidence label
#[must_use]
pub fn confidence_from_spread(spread: f64) -> Confidence {
    if spread < HIGH_CONFIDENCE_SPREAD {
        Confidence::High
    } else if spread < MEDIUM_CONFIDENCE_SPREAD {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

/// The four reported drivers, in fixed order
#[must_use]
pub fn drivers(
    observation: &RawDailyObservation,
    indices: &DerivedIndices,
    fused: &CategoryProbabilities,
) -> Vec<Driver> {
    vec![
        Driver::new(
            "Tmax",
            observation.tmax,
            "°C",
            fused.get(RiskCategory::VeryHot),
        ),
        Driver::new(
            "Wind",
            observation.wind_speed,
            "m/s",
            fused.get(RiskCategory::VeryWindy),
        ),
        Driver::new(
            "PoP",
            observation.probability_of_precipitation,
            "%",
            fused.get(RiskCategory::VeryWet),
        ),
        Driver::new(
            "Dew Point",
            indices.dew_point,
            "°C",
            fused.get(RiskCategory::VeryUncomfortable),
        ),
    ]
}

/// Advisory suggestions for wet or windy days.
///
/// These are informational only and do not feed back into any probability.
#[must_use]
pub fn suggestions(fused: &CategoryProbabilities) -> Vec<String> {
    let mut suggestions = Vec::new();
    if fused.get(RiskCategory::VeryWet) > NOTABLE_RISK_THRESHOLD {
        suggestions.push("Moving the event to 09:00–11:00 reduces the rain risk".to_string());
    }
    if fused.get(RiskCategory::VeryWindy) > NOTABLE_RISK_THRESHOLD {
        suggestions.push("Use a wind-sheltered area or relocate 1–2 km".to_string());
    }
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn fused(values: [f64; 5]) -> CategoryProbabilities {
        CategoryProbabilities::from_fn(|category| values[category as usize])
    }

    #[test]
    fn test_top_risks_sorted_and_truncated() {
        let probabilities = fused([0.56, 0.05, 0.84, 0.98, 0.3]);
        assert_eq!(
            top_risks(&probabilities),
            vec![RiskCategory::VeryWet, RiskCategory::VeryWindy]
        );
    }

    #[test]
    fn test_top_risks_ties_use_canonical_order() {
        let probabilities = fused([0.05, 0.84, 0.05, 0.84, 0.84]);
        assert_eq!(
            top_risks(&probabilities),
            vec![RiskCategory::VeryCold, RiskCategory::VeryWet]
        );
    }

    #[test]
    fn test_top_risks_threshold_is_exclusive() {
        let probabilities = fused([0.3, 0.05, 0.05, 0.05, 0.05]);
        assert!(top_risks(&probabilities).is_empty());
    }

    #[rstest]
    #[case(0.0, Confidence::High)]
    #[case(0.149, Confidence::High)]
    #[case(0.15, Confidence::Medium)]
    #[case(0.25, Confidence::Medium)]
    #[case(0.35, Confidence::Low)]
    #[case(2.0, Confidence::Low)]
    fn test_confidence_from_spread(#[case] spread: f64, #[case] expected: Confidence) {
        assert_eq!(confidence_from_spread(spread), expected);
    }

    #[test]
    fn test_confidence_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(Confidence::Medium).unwrap(),
            serde_json::json!("medium")
        );
    }

    #[rstest]
    #[case(0.84, 0.05, 1, "Moving")]
    #[case(0.05, 0.84, 1, "wind-sheltered")]
    #[case(0.84, 0.84, 2, "Moving")]
    fn test_suggestions(
        #[case] wet: f64,
        #[case] windy: f64,
        #[case] count: usize,
        #[case] first: &str,
    ) {
        let probabilities = fused([0.05, 0.05, windy, wet, 0.05]);
        let advice = suggestions(&probabilities);
        assert_eq!(advice.len(), count);
        assert!(advice[0].contains(first));
    }

    #[test]
    fn test_no_suggestions_on_quiet_day() {
        assert!(suggestions(&fused([0.05; 5])).is_empty());
    }
}
