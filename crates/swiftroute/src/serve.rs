// SPDX-FileCopyrightText: 2026 Swiftroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `swiftroute serve` implementation.
//!
//! Wires the OpenAI-compatible backend client, the model router and the
//! gateway together, then serves until SIGINT/SIGTERM.

use std::sync::Arc;
use std::time::Duration;

use swiftroute_config::SwiftrouteConfig;
use swiftroute_core::SwiftrouteError;
use swiftroute_gateway::{start_server, GatewayState};
use swiftroute_openai::OpenAiClient;
use swiftroute_router::RouterSettings;
use tracing::info;

use crate::shutdown;

/// Runs the gateway until a shutdown signal arrives.
pub async fn run_serve(config: SwiftrouteConfig) -> Result<(), SwiftrouteError> {
    init_tracing(&config.server.log_level);

    let settings = Arc::new(RouterSettings::from_config(&config)?);
    let backend = Arc::new(OpenAiClient::new(Duration::from_secs(
        config.backend.connect_timeout_secs,
    ))?);

    info!(
        fast_model = %settings.fast_model,
        slow_model = %settings.slow_model,
        probe_model = %settings.probe.model,
        "swiftroute starting"
    );

    let cancel = shutdown::install_signal_handler();
    let state = GatewayState::new(backend, settings, cancel);
    start_server(&config.server, state).await?;

    info!("swiftroute stopped");
    Ok(())
}

/// Honors `RUST_LOG`; otherwise logs swiftroute crates at the configured
/// level and everything else at warn.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("swiftroute={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
