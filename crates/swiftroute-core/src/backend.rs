// SPDX-FileCopyrightText: 2026 Swiftroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend client trait for chat-completion services.

use std::pin::Pin;

use async_trait::async_trait;
use futures_core::Stream;
use serde_json::Value;

use crate::error::SwiftrouteError;
use crate::types::{BackendTarget, CompletionRequest, StreamChunk};

/// Lazily pulled sequence of backend chunks.
///
/// The underlying connection stays open for as long as the stream is alive;
/// dropping the stream releases it.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<StreamChunk, SwiftrouteError>> + Send>>;

/// A chat-completion backend reachable over HTTP.
///
/// Implementations hold no per-request state. Cancellation is the caller's
/// job: dropping the returned future or stream tears the connection down.
#[async_trait]
pub trait BackendClient: Send + Sync {
    /// Single request/response exchange. Returns the backend body unchanged.
    async fn complete(
        &self,
        target: &BackendTarget,
        request: &CompletionRequest,
    ) -> Result<Value, SwiftrouteError>;

    /// Opens a streaming completion. Resolves once the backend has accepted
    /// the request; chunks are then pulled from the returned stream.
    async fn stream(
        &self,
        target: &BackendTarget,
        request: &CompletionRequest,
    ) -> Result<ChunkStream, SwiftrouteError>;
}
