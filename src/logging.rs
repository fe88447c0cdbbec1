//! Tracing subscriber setup

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LoggingConfig;

/// Build the filter: `RUST_LOG` when set, else the configured level, with
/// HTTP client noise held at warn.
fn env_filter(level: &str) -> EnvFilter {
    let base = std::env::var("RUST_LOG").map_or_else(|_| EnvFilter::new(level), EnvFilter::new);

    ["hyper=warn", "reqwest=warn", "reqwest_retry=warn"]
        .into_iter()
        .filter_map(|directive| directive.parse::<Directive>().ok())
        .fold(base, EnvFilter::add_directive)
}

/// Install the global subscriber in the configured format.
///
/// # Errors
/// Fails if a global subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let registry = tracing_subscriber::registry().with(env_filter(&config.level));

    match config.format.as_str() {
        "json" => registry
            .with(fmt::layer().with_target(true).json())
            .try_init()
            .context("Failed to install json tracing subscriber")?,
        _ => registry
            .with(fmt::layer().with_target(true))
            .try_init()
            .context("Failed to install tracing subscriber")?,
    }

    tracing::info!(
        version = crate::VERSION,
        level = %config.level,
        format = %config.format,
        "logging initialised"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_filter_accepts_configured_level() {
        let filter = env_filter("debug");
        let rendered = filter.to_string();
        assert!(rendered.contains("reqwest=warn"));
    }
}
