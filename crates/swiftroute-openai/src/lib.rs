// SPDX-FileCopyrightText: 2026 Swiftroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI-compatible backend for Swiftroute.
//!
//! Implements [`BackendClient`] over HTTP: buffered completions come back as
//! raw JSON, streamed completions as SSE chunks relayed verbatim.

pub mod client;
pub mod sse;
pub mod types;

use async_trait::async_trait;
use serde_json::Value;

use swiftroute_core::{BackendClient, BackendTarget, ChunkStream, CompletionRequest, SwiftrouteError};

pub use client::OpenAiClient;

#[async_trait]
impl BackendClient for OpenAiClient {
    async fn complete(
        &self,
        target: &BackendTarget,
        request: &CompletionRequest,
    ) -> Result<Value, SwiftrouteError> {
        self.complete_chat(target, request).await
    }

    async fn stream(
        &self,
        target: &BackendTarget,
        request: &CompletionRequest,
    ) -> Result<ChunkStream, SwiftrouteError> {
        self.stream_chat(target, request).await
    }
}
