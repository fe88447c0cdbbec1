//! Forecast/climatology fusion
//!
//! Blends raw category probabilities with a lead-time dependent weight and
//! adds a small constant so no category is ever reported as impossible.

use std::collections::BTreeSet;

use crate::models::{CategoryProbabilities, ProbabilityMap, round_to};
use crate::{ParadeWeatherError, Result};

/// Lead time (hours) over which forecast skill decays to the weight floor
const SKILL_HORIZON_HOURS: f64 = 240.0;
const MIN_FORECAST_WEIGHT: f64 = 0.3;
const MAX_FORECAST_WEIGHT: f64 = 0.9;
/// Share of the raw signal retained on the climatology side of the blend
const CLIMATOLOGY_RETENTION: f64 = 0.3;
/// Constant added to every fused probability
pub const SMOOTHING_FLOOR: f64 = 0.05;

/// Forecast weight `alpha` for a lead time, within [0.3, 0.9]
#[must_use]
pub fn blend_weight(lead_time_hours: u32) -> f64 {
    (1.0 - f64::from(lead_time_hours) / SKILL_HORIZON_HOURS)
        .clamp(MIN_FORECAST_WEIGHT, MAX_FORECAST_WEIGHT)
}

/// Fuse a single raw probability with a given forecast weight
#[must_use]
pub fn fuse_value(raw: f64, alpha: f64) -> f64 {
    let blended = alpha * raw + (1.0 - alpha) * CLIMATOLOGY_RETENTION * raw + SMOOTHING_FLOOR;
    round_to(blended.clamp(0.0, 1.0), 2)
}

/// Fuse raw category probabilities for an observation with the given lead time
#[must_use]
pub fn fuse(raw: &CategoryProbabilities, lead_time_hours: u32) -> CategoryProbabilities {
    let alpha = blend_weight(lead_time_hours);
    CategoryProbabilities::from_fn(|category| fuse_value(raw.get(category), alpha))
}

/// Weighted average of several probability maps.
///
/// Weights are normalized by their sum. A key missing from a source
/// contributes zero for that source. Sources and weights are paired in
/// order; entries beyond the shorter list are ignored. Results are rounded
/// to four decimals.
///
/// # Errors
/// Returns [`ParadeWeatherError::InvalidWeight`] when the weights sum to zero,
/// which includes an empty weight list.
pub fn combine_sources(sources: &[ProbabilityMap], weights: &[f64]) -> Result<ProbabilityMap> {
    let total_weight: f64 = weights.iter().sum();
    if total_weight == 0.0 {
        return Err(ParadeWeatherError::invalid_weight(
            "weights must not sum to zero",
        ));
    }

    let keys: BTreeSet<&String> = sources.iter().flat_map(|source| source.keys()).collect();

    let combined = keys
        .into_iter()
        .map(|key| {
            let weighted_sum: f64 = sources
                .iter()
                .zip(weights)
                .map(|(source, weight)| {
                    source.get(key).copied().unwrap_or(0.0) * (weight / total_weight)
                })
                .sum();
            (key.clone(), round_to(weighted_sum, 4))
        })
        .collect();

    Ok(combined)
}
