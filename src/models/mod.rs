//! Data models for the Parade Weather service
//!
//! This module contains the domain models organized by concern:
//! - Location: Geographic coordinates and validation
//! - Observation: Raw daily meteorological inputs for one place and date
//! - Risk: Risk categories and per-category probability maps

pub mod location;
pub mod observation;
pub mod risk;

// Re-export all public types for convenient access
pub use location::Location;
pub use observation::RawDailyObservation;
pub use risk::{CategoryProbabilities, ProbabilityMap, RiskCategory};

/// Round a value to a fixed number of decimal places.
///
/// Works on the exact decimal expansion of `value`, so a float stored just
/// below a half rounds down. Exact halves go to the even digit.
#[must_use]
pub fn round_to(value: f64, decimals: usize) -> f64 {
    format!("{value:.decimals$}").parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(13.8123, 1), 13.8);
        assert_eq!(round_to(0.8449, 2), 0.84);
        assert_eq!(round_to(65.4, 0), 65.0);
        assert_eq!(round_to(-4.36, 1), -4.4);
    }

    #[test]
    fn test_round_to_uses_stored_value() {
        // 0.595 is stored as 0.59499999999999997...
        assert_eq!(round_to(0.595, 2), 0.59);
    }
}
