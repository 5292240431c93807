// SPDX-FileCopyrightText: 2026 Swiftroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for OpenAI-compatible `/chat/completions` endpoints.
//!
//! One pooled [`reqwest::Client`] serves every backend; the endpoint and the
//! bearer credential come with each call. Requests are never retried.

use std::time::Duration;

use serde_json::Value;
use tracing::debug;
use url::Url;

use swiftroute_core::{BackendTarget, ChunkStream, CompletionRequest, SwiftrouteError};

use crate::sse;
use crate::types::ApiErrorResponse;

const COMPLETIONS_PATH: &str = "chat/completions";

/// HTTP client for OpenAI-compatible backends.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
}

impl OpenAiClient {
    /// Creates a client with the given connect timeout.
    ///
    /// No overall request timeout is set: streamed relays last as long as the
    /// backend keeps producing.
    pub fn new(connect_timeout: Duration) -> Result<Self, SwiftrouteError> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| SwiftrouteError::Backend {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self { client })
    }

    /// Sends a buffered request and returns the backend's JSON body verbatim.
    pub async fn complete_chat(
        &self,
        target: &BackendTarget,
        request: &CompletionRequest,
    ) -> Result<Value, SwiftrouteError> {
        let response = self.send(target, request).await?;
        let body = response.text().await.map_err(|e| SwiftrouteError::Backend {
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;
        serde_json::from_str(&body).map_err(|e| SwiftrouteError::Backend {
            message: format!("failed to parse backend response: {e}"),
            source: Some(Box::new(e)),
        })
    }

    /// Sends a streaming request and returns the chunk stream.
    ///
    /// The connection stays open until the returned stream is dropped.
    pub async fn stream_chat(
        &self,
        target: &BackendTarget,
        request: &CompletionRequest,
    ) -> Result<ChunkStream, SwiftrouteError> {
        let response = self.send(target, request).await?;
        Ok(sse::parse_sse_stream(response))
    }

    async fn send(
        &self,
        target: &BackendTarget,
        request: &CompletionRequest,
    ) -> Result<reqwest::Response, SwiftrouteError> {
        let url = endpoint(&target.base_url);
        let mut builder = self.client.post(&url).json(request);
        if let Some(key) = &target.api_key {
            builder = builder.bearer_auth(key);
        }
        if request.stream {
            builder = builder.header(reqwest::header::ACCEPT, "text/event-stream");
        }

        let response = builder.send().await.map_err(|e| SwiftrouteError::Backend {
            message: format!("HTTP request failed: {e}"),
            source: Some(Box::new(e)),
        })?;

        let status = response.status();
        debug!(status = %status, model = %request.model, stream = request.stream, "backend response received");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(SwiftrouteError::from_backend_status(
            status.as_u16(),
            ApiErrorResponse::message_from_body(&body),
        ))
    }
}

/// `{base}/chat/completions`, tolerating a trailing slash on the base.
pub fn endpoint(base_url: &Url) -> String {
    format!(
        "{}/{COMPLETIONS_PATH}",
        base_url.as_str().trim_end_matches('/')
    )
}
