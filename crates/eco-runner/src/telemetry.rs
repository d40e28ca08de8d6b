//! Tracing setup for the headless runner.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "info,eco_world=debug";

/// Install the global subscriber. `RUST_LOG` overrides the default filter;
/// `ECO_LOG_JSON=1` switches to JSON lines.
pub fn init_telemetry() -> Result<()> {
    let json = std::env::var("ECO_LOG_JSON").map_or(false, |v| v == "1");

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(json.then(|| fmt::layer().json().with_target(true)))
        .with((!json).then(|| fmt::layer().with_target(true)))
        .try_init()?;

    info!(json, "Telemetry initialized");
    Ok(())
}

pub fn shutdown_telemetry() {
    info!("Shutting down telemetry");
}
