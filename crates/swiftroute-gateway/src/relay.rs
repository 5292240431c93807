// SPDX-FileCopyrightText: 2026 Swiftroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Relay engine: forwards one request to the chosen backend and hands the
//! response back, buffered or as a live event stream.
//!
//! A streaming relay runs as its own task feeding a bounded channel that
//! backs the HTTP body. The body owns a drop guard on the request's
//! cancellation token, so when the caller goes away the body is dropped, the
//! token fires, and the task drops the backend stream. The backend connection
//! is owned by exactly one value at a time and released when it drops.

use std::convert::Infallible;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::{Body, Bytes};
use futures::{Stream, StreamExt};
use serde_json::{json, Value};
use strum::Display;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, warn};

use swiftroute_core::{BackendClient, BackendTarget, ChunkStream, CompletionRequest, SwiftrouteError};

/// Channel buffer size for SSE frames sent to the caller.
const SSE_CHANNEL_SIZE: usize = 64;

type Frame = Result<Bytes, Infallible>;

/// How a streaming relay ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum RelayState {
    /// The backend finished and every chunk was delivered.
    Completed,
    /// The caller went away or the request was cancelled.
    Aborted,
    /// The backend failed mid-stream.
    Errored,
}

/// Sends requests to backends on behalf of callers.
pub struct RelayEngine {
    backend: Arc<dyn BackendClient>,
}

impl RelayEngine {
    pub fn new(backend: Arc<dyn BackendClient>) -> Self {
        Self { backend }
    }

    /// One buffered exchange. The backend body is returned unchanged.
    pub async fn relay_buffered(
        &self,
        target: &BackendTarget,
        request: &CompletionRequest,
        cancel: &CancellationToken,
    ) -> Result<Value, SwiftrouteError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(SwiftrouteError::ClientDisconnected),
            result = self.backend.complete(target, request) => result,
        }
    }

    /// Opens the backend stream. Failures here happen before anything is
    /// sent to the caller, so they surface as ordinary errors.
    pub async fn open_stream(
        &self,
        target: &BackendTarget,
        request: &CompletionRequest,
        cancel: &CancellationToken,
    ) -> Result<RelaySession, SwiftrouteError> {
        let stream = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(SwiftrouteError::ClientDisconnected),
            result = self.backend.stream(target, request) => result?,
        };

        Ok(RelaySession {
            stream,
            cancel: cancel.clone(),
            model: request.model.clone(),
        })
    }
}

/// One open backend stream bound to one caller.
pub struct RelaySession {
    stream: ChunkStream,
    cancel: CancellationToken,
    model: String,
}

impl RelaySession {
    /// Spawns the forwarding task and returns the caller's response body.
    ///
    /// `guard` must be the drop guard of the token this session was opened
    /// with; dropping the body cancels the relay.
    pub fn into_body(self, guard: DropGuard) -> Body {
        let (tx, rx) = mpsc::channel(SSE_CHANNEL_SIZE);
        tokio::spawn(self.forward(tx));
        Body::from_stream(CancelOnDrop {
            inner: ReceiverStream::new(rx),
            _guard: guard,
        })
    }

    /// Forwards chunks to `tx` in order until the backend ends, fails, or the
    /// caller goes away.
    ///
    /// A mid-stream backend failure is sent as one final error frame if the
    /// caller is still there and swallowed otherwise. The backend stream is
    /// dropped before the caller's channel is closed.
    pub async fn forward(mut self, tx: mpsc::Sender<Frame>) -> RelayState {
        let mut chunks = 0usize;

        let state = loop {
            let next = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break RelayState::Aborted,
                next = self.stream.next() => next,
            };

            match next {
                None => break RelayState::Completed,
                Some(Ok(chunk)) => {
                    if tx.is_closed() {
                        break RelayState::Aborted;
                    }
                    if !send(&self.cancel, &tx, data_frame(&chunk.0)).await {
                        break RelayState::Aborted;
                    }
                    chunks += 1;
                }
                Some(Err(e)) => {
                    if tx.is_closed() || self.cancel.is_cancelled() {
                        break RelayState::Aborted;
                    }
                    warn!(model = %self.model, error = %e, "backend stream failed mid-flight");
                    let frame = data_frame(&json!({ "error": e.public_message() }));
                    send(&self.cancel, &tx, frame).await;
                    break RelayState::Errored;
                }
            }
        };

        drop(self.stream);
        drop(tx);
        debug!(model = %self.model, state = %state, chunks, "relay finished");
        state
    }
}

/// False if the caller is gone or the request was cancelled.
async fn send(cancel: &CancellationToken, tx: &mpsc::Sender<Frame>, frame: Bytes) -> bool {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => false,
        sent = tx.send(Ok(frame)) => sent.is_ok(),
    }
}

/// `data: <json>\n\n`
fn data_frame(value: &Value) -> Bytes {
    Bytes::from(format!("data: {value}\n\n"))
}

/// Response body stream that cancels the relay when dropped.
struct CancelOnDrop<S> {
    inner: S,
    _guard: DropGuard,
}

impl<S: Stream + Unpin> Stream for CancelOnDrop<S> {
    type Item = S::Item;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
