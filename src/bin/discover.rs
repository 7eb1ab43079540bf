//! platform-discover: walk the hypermedia chain against a live platform.
//!
//! Resolves discover → applications → application for the configured
//! endpoint, initializes the application and logs what it supports.
//!
//! # Environment Variables
//!
//! - `PLATFORM_DISCOVER_URL`: absolute URL of the discovery document
//! - `PLATFORM_ENDPOINT_ID`: application endpoint identity
//! - `PLATFORM_TIMEOUT_SECS`: request timeout (default: 30)
//! - `RUST_LOG`: tracing filter (default: "info,platform_sdk=debug")
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin platform-discover
//! # or with a YAML config file:
//! cargo run --bin platform-discover -- platform.yaml
//! ```

use std::sync::Arc;

use anyhow::Context;
use platform_sdk::client_model::resolve_application;
use platform_sdk::config::PlatformConfig;
use platform_sdk::logging::LoggingContext;
use platform_sdk::resource::{Capability, PlatformResource};
use platform_sdk::transport::ReqwestClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,platform_sdk=debug".into()),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => PlatformConfig::from_file(&path)
            .with_context(|| format!("loading configuration from {}", path))?,
        None => PlatformConfig::from_env().context("loading configuration from environment")?,
    };

    let client = ReqwestClient::from_config(&config).context("building HTTP client")?;
    let context = LoggingContext::generate().with_property("tool", "platform-discover");
    tracing::info!(
        "Resolving {} from {} ({})",
        config.application_endpoint_id,
        config.discover_url,
        context
    );

    let mut application = resolve_application(
        Arc::new(client),
        config.discover_url()?,
        &config.application_endpoint_id,
        Some(&context),
    )
    .await
    .context("resolving application")?;
    application
        .refresh_and_initialize(Some(&context))
        .await
        .context("initializing application")?;

    tracing::info!("Application: {}", application.self_url());
    for capability in application.supported_capabilities() {
        tracing::info!("  supports {} (via `{}`)", capability.name(), capability.relation());
    }
    if let Some(communication) = application.communication() {
        tracing::info!("Communication: {}", communication.self_url());
    }

    Ok(())
}
