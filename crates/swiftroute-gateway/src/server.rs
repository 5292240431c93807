// SPDX-FileCopyrightText: 2026 Swiftroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    routing::{get, post},
    Router,
};
use tokio_util::sync::CancellationToken;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use swiftroute_config::model::ServerConfig;
use swiftroute_core::{BackendClient, SwiftrouteError};
use swiftroute_router::{ModelRouter, RouterSettings};

use crate::handlers;
use crate::relay::RelayEngine;

/// Shared state for axum request handlers.
///
/// Everything here is immutable or internally synchronized; no request
/// writes to it.
#[derive(Clone)]
pub struct GatewayState {
    pub router: Arc<ModelRouter>,
    pub relay: Arc<RelayEngine>,
    /// Process-wide shutdown signal; each request takes a child token.
    pub shutdown: CancellationToken,
    pub started_at: Instant,
}

impl GatewayState {
    /// Router and relay share one backend client.
    pub fn new(
        backend: Arc<dyn BackendClient>,
        settings: Arc<RouterSettings>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            router: Arc::new(ModelRouter::new(Arc::clone(&backend), settings)),
            relay: Arc::new(RelayEngine::new(backend)),
            shutdown,
            started_at: Instant::now(),
        }
    }
}

/// Builds the axum application.
///
/// - POST /v1/chat/completions
/// - GET /health
pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/v1/chat/completions", post(handlers::post_chat_completions))
        .route("/health", get(handlers::get_health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Start the gateway HTTP server.
///
/// Serves until the state's shutdown token is cancelled, then drains
/// in-flight requests. Open relays see the same cancellation through their
/// child tokens.
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), SwiftrouteError> {
    let shutdown = state.shutdown.clone();
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| SwiftrouteError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| SwiftrouteError::Internal(format!("gateway server error: {e}")))?;

    tracing::info!("Gateway server stopped");
    Ok(())
}
