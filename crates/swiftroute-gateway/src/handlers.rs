// SPDX-FileCopyrightText: 2026 Swiftroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers.
//!
//! Handles POST /v1/chat/completions and GET /health.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::Instrument;

use swiftroute_core::{ChatRequest, FieldError, SwiftrouteError};
use swiftroute_router::RoutingDecision;

use crate::error::ApiError;
use crate::server::GatewayState;
use crate::validate::validate_chat_request;

/// Resolved model name of the backend that served the request.
pub const MODEL_HEADER: &str = "x-swiftroute-model";
/// Classification reason behind the routing decision.
pub const REASON_HEADER: &str = "x-swiftroute-reason";

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// POST /v1/chat/completions
///
/// Validates the body, routes it to the fast or slow backend, and relays the
/// backend's answer: one JSON document, or an event stream when `stream` is
/// true.
pub async fn post_chat_completions(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("chat_completion", %request_id);
    handle_chat(state, headers, body).instrument(span).await
}

async fn handle_chat(
    state: GatewayState,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let request = parse_chat_request(&body)?;
    let caller_key = bearer_token(&headers);

    // Cancelled when this handler is dropped (caller gone before a response
    // existed) or, for streams, when the response body is dropped.
    let cancel = state.shutdown.child_token();
    let guard = cancel.clone().drop_guard();

    let decision = state.router.route(&request, caller_key, &cancel).await?;
    let target = state
        .router
        .settings()
        .target_for(&decision.backend, caller_key);
    let completion = request.to_completion(decision.backend.name.as_str());

    let mut response = if request.is_streaming() {
        let session = state.relay.open_stream(&target, &completion, &cancel).await?;
        let mut response = Response::new(session.into_body(guard));
        let headers = response.headers_mut();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/event-stream"));
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
        response
    } else {
        let body = state.relay.relay_buffered(&target, &completion, &cancel).await?;
        drop(guard);
        Json(body).into_response()
    };

    insert_routing_headers(response.headers_mut(), &decision);
    Ok(response)
}

/// GET /health
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}

/// Raw bytes → JSON → structural checks → typed request.
fn parse_chat_request(body: &[u8]) -> Result<ChatRequest, SwiftrouteError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| SwiftrouteError::MalformedJson(e.to_string()))?;

    let details = validate_chat_request(&value);
    if !details.is_empty() {
        return Err(SwiftrouteError::InvalidRequest { details });
    }

    serde_json::from_value(value).map_err(|e| SwiftrouteError::InvalidRequest {
        details: vec![FieldError::new("", e.to_string())],
    })
}

/// Caller credential from `Authorization: Bearer <token>`, if any.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn insert_routing_headers(headers: &mut HeaderMap, decision: &RoutingDecision) {
    if let Ok(model) = HeaderValue::from_str(&decision.backend.name) {
        headers.insert(HeaderName::from_static(MODEL_HEADER), model);
    }
    if let Ok(reason) = HeaderValue::from_str(&decision.outcome.reason.to_string()) {
        headers.insert(HeaderName::from_static(REASON_HEADER), reason);
    }
}
