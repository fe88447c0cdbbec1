use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use parade_weather::api::AppState;
use parade_weather::{ObservationService, ParadeWeatherConfig, RiskEstimator, logging, web};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ParadeWeatherConfig::load().context("Failed to load configuration")?;
    logging::init_tracing(&config.logging)?;

    let observations =
        ObservationService::from_config(&config).context("Failed to set up data sources")?;
    let state = AppState {
        estimator: RiskEstimator::default(),
        observations: Arc::new(observations),
        timezone: config.defaults.timezone.clone(),
    };

    // Both chains run concurrently; the slower one bounds the request.
    let request_timeout = Duration::from_secs(config.sources.timeout_seconds * 2 + 5);
    web::run(&config.server, web::app(state, request_timeout)).await
}
