//! Tracing subscriber setup.
//!
//! Local and test runs log human-readable lines. Deployed environments log
//! JSON in the Stackdriver format and join the caller's W3C trace.

use crate::config::{Config, Env};
use anyhow::Context;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use std::env;
use tracing_stackdriver::CloudTraceConfiguration;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info,merchant_admin_services=debug";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Whether `config` logs plain text rather than Stackdriver JSON.
pub fn uses_plain_logs(config: &Config) -> bool {
    matches!(config.environment(), Env::Local | Env::Test)
}

pub fn init_tracing(config: &Config) -> anyhow::Result<()> {
    if uses_plain_logs(config) {
        tracing_subscriber::registry()
            .with(env_filter())
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .context("failed to install tracing subscriber")?;
        return Ok(());
    }

    let project_id = env::var("GOOGLE_CLOUD_PROJECT")
        .context("GOOGLE_CLOUD_PROJECT environment variable is required outside local/test")?;

    opentelemetry::global::set_text_map_propagator(TraceContextPropagator::new());

    let stackdriver_layer =
        tracing_stackdriver::layer().with_cloud_trace(CloudTraceConfiguration { project_id });

    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_opentelemetry::layer())
        .with(stackdriver_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(())
}
