//! Parade Weather - adverse-weather risk estimation for outdoor events
//!
//! Turns one daily observation for a location and date into calibrated
//! probabilities for five risk categories, together with the drivers behind
//! them, a confidence label and advisory suggestions.

pub mod api;
pub mod classifier;
pub mod climatology;
pub mod config;
pub mod error;
pub mod explain;
pub mod fusion;
pub mod indices;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use climatology::{ClimatologyPercentiles, ClimatologySource, SeasonalClimatology};
pub use config::ParadeWeatherConfig;
pub use error::ParadeWeatherError;
pub use explain::{Confidence, Driver, RiskExplanation};
pub use indices::DerivedIndices;
pub use models::{CategoryProbabilities, Location, ProbabilityMap, RawDailyObservation, RiskCategory};
pub use pipeline::{RiskAssessment, RiskEstimator};
pub use weather::{ObservationRequest, ObservationService, Provider, ProviderChain};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, ParadeWeatherError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
