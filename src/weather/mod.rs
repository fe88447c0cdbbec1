//! Daily observation acquisition
//!
//! Providers are tried in a fixed order; each returns a value or an explicit
//! failure, and the first success wins. Observations (temperature, humidity,
//! wind, precipitation) and precipitation overrides come from two separate
//! chains that run concurrently.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::config::ParadeWeatherConfig;
use crate::models::{Location, RawDailyObservation};
use crate::{ParadeWeatherError, Result};

pub mod imerg;
pub mod power;
pub mod stub;

pub use imerg::ImergClient;
pub use power::PowerClient;
pub use stub::StubProvider;

const USER_AGENT: &str = concat!("parade-weather/", env!("CARGO_PKG_VERSION"));

/// What to fetch: one location on one date
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObservationRequest {
    pub location: Location,
    pub date: NaiveDate,
}

/// Forecast metadata providers attach when their source does not carry it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AcquisitionDefaults {
    pub lead_time_hours: u32,
    pub forecast_spread: f64,
}

impl Default for AcquisitionDefaults {
    fn default() -> Self {
        Self {
            lead_time_hours: 72,
            forecast_spread: 0.25,
        }
    }
}

/// Daily precipitation from a dedicated precipitation product
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrecipitationEstimate {
    pub precip_mm: f64,
    pub pop_percent: u8,
}

/// A fallible data source
#[async_trait]
pub trait Provider: Send + Sync {
    type Output: Send;

    /// Short identifier used in logs and provenance
    fn name(&self) -> &'static str;

    async fn fetch(&self, request: &ObservationRequest) -> Result<Self::Output>;
}

/// A value together with the provider that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct Sourced<T> {
    pub value: T,
    pub source: &'static str,
}

/// Ordered list of providers evaluated until one succeeds
pub struct ProviderChain<T> {
    providers: Vec<Arc<dyn Provider<Output = T>>>,
    timeout: Duration,
}

impl<T: Send> ProviderChain<T> {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            providers: Vec::new(),
            timeout,
        }
    }

    #[must_use]
    pub fn with(mut self, provider: Arc<dyn Provider<Output = T>>) -> Self {
        self.providers.push(provider);
        self
    }

    #[must_use]
    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Try every provider in order, each bounded by the chain timeout.
    ///
    /// # Errors
    /// [`ParadeWeatherError::NoProviderSucceeded`] listing each failure when
    /// no provider succeeds (or the chain is empty).
    pub async fn first_success(&self, request: &ObservationRequest) -> Result<Sourced<T>> {
        let mut failures = Vec::new();

        for provider in &self.providers {
            let name = provider.name();
            let outcome = match tokio::time::timeout(self.timeout, provider.fetch(request)).await
            {
                Ok(result) => result,
                Err(_) => Err(ParadeWeatherError::Timeout {
                    provider: name.to_string(),
                    seconds: self.timeout.as_secs(),
                }),
            };

            match outcome {
                Ok(value) => {
                    debug!(provider = name, "provider succeeded");
                    return Ok(Sourced {
                        value,
                        source: name,
                    });
                }
                Err(err) => {
                    warn!(provider = name, error = %err, "provider failed, trying next");
                    failures.push(format!("{name}: {err}"));
                }
            }
        }

        Err(ParadeWeatherError::NoProviderSucceeded { failures })
    }
}

/// Which provider produced each part of an observation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    pub observation: String,
    pub precipitation: String,
}

/// An observation plus its provenance
#[derive(Debug, Clone, PartialEq)]
pub struct AcquiredObservation {
    pub observation: RawDailyObservation,
    pub provenance: Provenance,
}

/// Orchestrates the observation and precipitation chains
pub struct ObservationService {
    observations: ProviderChain<RawDailyObservation>,
    precipitation: ProviderChain<PrecipitationEstimate>,
}

impl ObservationService {
    #[must_use]
    pub fn new(
        observations: ProviderChain<RawDailyObservation>,
        precipitation: ProviderChain<PrecipitationEstimate>,
    ) -> Self {
        Self {
            observations,
            precipitation,
        }
    }

    /// Build the default chains: NASA POWER then the stub for observations,
    /// IMERG for precipitation when an endpoint and token are configured.
    pub fn from_config(config: &ParadeWeatherConfig) -> Result<Self> {
        let sources = &config.sources;
        let timeout = Duration::from_secs(sources.timeout_seconds);
        let defaults = config.defaults.acquisition();

        let mut observations = ProviderChain::<RawDailyObservation>::new(timeout);
        if sources.enable_power {
            let client = http_client(timeout, sources.max_retries)?;
            observations = observations.with(Arc::new(PowerClient::new(
                client,
                sources.power_base_url.clone(),
                defaults,
            )));
        }
        let stub = match sources.stub_seed {
            Some(seed) => StubProvider::seeded(seed, defaults),
            None => StubProvider::from_entropy(defaults),
        };
        observations = observations.with(Arc::new(stub));

        let mut precipitation = ProviderChain::<PrecipitationEstimate>::new(timeout);
        if let (Some(endpoint), Some(token)) = (&sources.imerg_endpoint, &sources.earthdata_token)
        {
            let client = http_client(timeout, sources.max_retries)?;
            precipitation = precipitation.with(Arc::new(ImergClient::new(
                client,
                endpoint.clone(),
                token.clone(),
            )));
        }

        info!(
            observation_chain = ?observations.provider_names(),
            precipitation_chain = ?precipitation.provider_names(),
            "acquisition chains ready"
        );
        Ok(Self::new(observations, precipitation))
    }

    /// Acquire the observation for a request.
    ///
    /// A successful precipitation provider overrides the base observation's
    /// precipitation and PoP; otherwise the base values stand.
    #[instrument(skip(self), fields(lat = request.location.latitude, lon = request.location.longitude, date = %request.date))]
    pub async fn acquire(&self, request: &ObservationRequest) -> Result<AcquiredObservation> {
        let (base, precipitation) = futures::future::join(
            self.observations.first_success(request),
            self.precipitation.first_success(request),
        )
        .await;

        let base = base?;
        let mut observation = base.value;

        let precipitation_source = match precipitation {
            Ok(estimate) => {
                observation.precipitation = estimate.value.precip_mm;
                observation.probability_of_precipitation = f64::from(estimate.value.pop_percent);
                estimate.source
            }
            Err(err) => {
                debug!(error = %err, "keeping precipitation from the base observation");
                base.source
            }
        };

        info!(
            observation_source = base.source,
            precipitation_source, "observation acquired"
        );

        Ok(AcquiredObservation {
            observation,
            provenance: Provenance {
                observation: base.source.to_string(),
                precipitation: precipitation_source.to_string(),
            },
        })
    }
}

/// HTTP client with transient-failure retries and exponential backoff
pub fn http_client(timeout: Duration, max_retries: u32) -> Result<ClientWithMiddleware> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()?;
    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(max_retries);

    Ok(ClientBuilder::new(client)
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build())
}

/// Coarse PoP (%) from a daily precipitation total
#[must_use]
pub fn coarse_pop_from_daily(precip_mm: f64) -> u8 {
    if precip_mm > 5.0 {
        60
    } else if precip_mm > 0.0 {
        30
    } else {
        10
    }
}

/// Graded PoP (%) estimate from a daily precipitation total
#[must_use]
pub fn estimate_pop_from_daily(precip_mm: f64) -> u8 {
    match precip_mm {
        p if p <= 0.0 => 10,
        p if p <= 2.0 => 30,
        p if p <= 5.0 => 50,
        p if p <= 15.0 => 70,
        _ => 85,
    }
}
