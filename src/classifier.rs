//! Threshold-based risk classification
//!
//! Each category compares a raw or derived value against the stricter of a
//! fixed absolute threshold and the local climatological percentile. The
//! result is a step function: every raw probability is exactly 0.0 or 1.0.
//! Smoothing happens later, in fusion.

use tracing::debug;

use crate::climatology::ClimatologyPercentiles;
use crate::indices::DerivedIndices;
use crate::models::{CategoryProbabilities, RawDailyObservation, RiskCategory};

/// Absolute heat index threshold (°C)
pub const HOT_HEAT_INDEX_C: f64 = 32.0;
/// Absolute wind chill threshold (°C)
pub const COLD_WIND_CHILL_C: f64 = 5.0;
/// Absolute wind speed threshold (m/s)
pub const WINDY_SPEED_MS: f64 = 10.0;
/// Absolute daily precipitation threshold (mm)
pub const WET_PRECIPITATION_MM: f64 = 5.0;
/// Probability of precipitation that alone marks a day as wet (%)
pub const WET_POP_PERCENT: f64 = 50.0;
/// Dew point above which air feels muggy (°C)
pub const MUGGY_DEW_POINT_C: f64 = 20.0;
/// Wind chill at or below which exposure is uncomfortable (°C)
pub const FREEZING_WIND_CHILL_C: f64 = 0.0;

/// Evaluate one category against its threshold policy
#[must_use]
pub fn is_triggered(
    category: RiskCategory,
    observation: &RawDailyObservation,
    indices: &DerivedIndices,
    climatology: &ClimatologyPercentiles,
) -> bool {
    match category {
        RiskCategory::VeryHot => {
            indices.heat_index > climatology.heat_index.p90.max(HOT_HEAT_INDEX_C)
        }
        RiskCategory::VeryCold => {
            indices.wind_chill < climatology.wind_chill.p10.min(COLD_WIND_CHILL_C)
        }
        RiskCategory::VeryWindy => {
            observation.wind_speed > climatology.wind.p90.max(WINDY_SPEED_MS)
        }
        RiskCategory::VeryWet => {
            observation.probability_of_precipitation >= WET_POP_PERCENT
                || observation.precipitation
                    >= climatology.precipitation.p90.max(WET_PRECIPITATION_MM)
        }
        RiskCategory::VeryUncomfortable => {
            indices.dew_point >= MUGGY_DEW_POINT_C
                || indices.heat_index >= HOT_HEAT_INDEX_C
                || indices.wind_chill <= FREEZING_WIND_CHILL_C
        }
    }
}

/// Raw (pre-fusion) probability for every category
#[must_use]
pub fn classify(
    observation: &RawDailyObservation,
    indices: &DerivedIndices,
    climatology: &ClimatologyPercentiles,
) -> CategoryProbabilities {
    let raw = CategoryProbabilities::from_fn(|category| {
        if is_triggered(category, observation, indices, climatology) {
            1.0
        } else {
            0.0
        }
    });
    debug!(?raw, "classified raw risk probabilities");
    raw
}
