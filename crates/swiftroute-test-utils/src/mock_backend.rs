// SPDX-FileCopyrightText: 2026 Swiftroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted backend for deterministic router and relay tests.
//!
//! `MockBackend` implements `BackendClient` with replies popped from a FIFO
//! script. Every call opens a "connection" on a shared [`ConnectionGauge`]
//! that is released when the returned future or stream is dropped, so tests
//! can assert that connections are released exactly once and never overlap.

use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, Stream, StreamExt};
use serde_json::{json, Value};
use tokio::sync::{Mutex, Notify};

use swiftroute_core::{
    BackendClient, BackendTarget, ChunkStream, CompletionRequest, StreamChunk, SwiftrouteError,
};

/// A failure the mock can inject.
#[derive(Debug, Clone)]
pub enum MockFailure {
    /// Transport failure (connection refused, reset, ...).
    Network(String),
    /// Backend answered with a non-success HTTP status.
    Status(u16, String),
}

impl MockFailure {
    fn to_error(&self) -> SwiftrouteError {
        match self {
            Self::Network(message) => SwiftrouteError::backend(
                format!("HTTP request failed: {message}"),
                std::io::Error::new(std::io::ErrorKind::ConnectionRefused, message.clone()),
            ),
            Self::Status(status, message) => {
                SwiftrouteError::from_backend_status(*status, message.clone())
            }
        }
    }
}

/// One scripted reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Buffered completion body.
    Completion(Value),
    /// Stream yielding these chunks, then ending.
    Chunks(Vec<Value>),
    /// Stream yielding these chunks, then failing mid-flight.
    ChunksThenError(Vec<Value>, MockFailure),
    /// Stream yielding these chunks, then staying open forever.
    ChunksThenHang(Vec<Value>),
    /// The call itself never resolves.
    Hang,
    /// The call fails before any data is returned.
    Fail(MockFailure),
}

/// A call observed by the mock.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub target: BackendTarget,
    pub request: CompletionRequest,
    pub streaming: bool,
}

/// Counts opened and released backend connections.
#[derive(Debug, Default)]
pub struct ConnectionGauge {
    opened: AtomicUsize,
    released: AtomicUsize,
    peak: AtomicUsize,
    notify: Notify,
}

impl ConnectionGauge {
    fn open(self: &Arc<Self>) -> ConnectionGuard {
        let opened = self.opened.fetch_add(1, Ordering::SeqCst) + 1;
        let current = opened - self.released.load(Ordering::SeqCst);
        self.peak.fetch_max(current, Ordering::SeqCst);
        ConnectionGuard {
            gauge: Arc::clone(self),
        }
    }

    /// Connections opened so far.
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    /// Connections released so far.
    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    /// Connections currently open.
    pub fn open_now(&self) -> usize {
        self.opened() - self.released()
    }

    /// Highest number of simultaneously open connections seen.
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    /// Waits until no connection is open. Returns false on timeout.
    pub async fn wait_until_idle(&self, timeout: Duration) -> bool {
        tokio::time::timeout(timeout, async {
            loop {
                let notified = self.notify.notified();
                if self.open_now() == 0 {
                    return;
                }
                notified.await;
            }
        })
        .await
        .is_ok()
    }
}

/// Held for the lifetime of one mock connection.
struct ConnectionGuard {
    gauge: Arc<ConnectionGauge>,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.gauge.released.fetch_add(1, Ordering::SeqCst);
        self.gauge.notify.notify_waiters();
    }
}

/// A chunk stream that keeps its connection guard alive until dropped.
struct GuardedStream {
    inner: ChunkStream,
    _guard: ConnectionGuard,
}

impl Stream for GuardedStream {
    type Item = Result<StreamChunk, SwiftrouteError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().inner.as_mut().poll_next(cx)
    }
}

/// Backend double with a scripted FIFO of replies.
///
/// When the script is empty, streams yield a single "mock response" chunk
/// and buffered calls return a matching completion body.
#[derive(Default)]
pub struct MockBackend {
    script: Mutex<VecDeque<MockReply>>,
    calls: Mutex<Vec<RecordedCall>>,
    gauge: Arc<ConnectionGauge>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock pre-loaded with the given replies.
    pub fn with_replies(replies: Vec<MockReply>) -> Self {
        Self {
            script: Mutex::new(VecDeque::from(replies)),
            ..Self::default()
        }
    }

    /// Append a reply to the script.
    pub async fn push_reply(&self, reply: MockReply) {
        self.script.lock().await.push_back(reply);
    }

    /// Every call made so far, in order.
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().await.clone()
    }

    /// Shared connection accounting.
    pub fn gauge(&self) -> Arc<ConnectionGauge> {
        Arc::clone(&self.gauge)
    }

    async fn begin(
        &self,
        target: &BackendTarget,
        request: &CompletionRequest,
        streaming: bool,
    ) -> (ConnectionGuard, Option<MockReply>) {
        self.calls.lock().await.push(RecordedCall {
            target: target.clone(),
            request: request.clone(),
            streaming,
        });
        let guard = self.gauge.open();
        let reply = self.script.lock().await.pop_front();
        (guard, reply)
    }
}

#[async_trait]
impl BackendClient for MockBackend {
    async fn complete(
        &self,
        target: &BackendTarget,
        request: &CompletionRequest,
    ) -> Result<Value, SwiftrouteError> {
        let (_guard, reply) = self.begin(target, request, false).await;
        match reply.unwrap_or_else(|| MockReply::Completion(completion_body("mock response"))) {
            MockReply::Completion(body) => Ok(body),
            MockReply::Fail(failure) => Err(failure.to_error()),
            MockReply::Hang => futures::future::pending().await,
            other => Err(SwiftrouteError::Internal(format!(
                "mock scripted a stream reply for a buffered call: {other:?}"
            ))),
        }
    }

    async fn stream(
        &self,
        target: &BackendTarget,
        request: &CompletionRequest,
    ) -> Result<ChunkStream, SwiftrouteError> {
        let (guard, reply) = self.begin(target, request, true).await;
        let inner: ChunkStream =
            match reply.unwrap_or_else(|| MockReply::Chunks(vec![text_chunk("mock response")])) {
                MockReply::Chunks(chunks) => Box::pin(ok_chunks(chunks)),
                MockReply::Completion(body) => Box::pin(ok_chunks(vec![body])),
                MockReply::ChunksThenError(chunks, failure) => Box::pin(
                    ok_chunks(chunks).chain(stream::once(async move { Err(failure.to_error()) })),
                ),
                MockReply::ChunksThenHang(chunks) => {
                    Box::pin(ok_chunks(chunks).chain(stream::pending()))
                }
                MockReply::Fail(failure) => return Err(failure.to_error()),
                MockReply::Hang => return futures::future::pending().await,
            };
        Ok(Box::pin(GuardedStream {
            inner,
            _guard: guard,
        }))
    }
}

fn ok_chunks(
    chunks: Vec<Value>,
) -> impl Stream<Item = Result<StreamChunk, SwiftrouteError>> + Send + 'static {
    stream::iter(chunks.into_iter().map(|c| Ok(StreamChunk(c))))
}

/// An OpenAI-style streaming chunk carrying one text fragment.
pub fn text_chunk(text: &str) -> Value {
    json!({
        "id": "chatcmpl-mock",
        "object": "chat.completion.chunk",
        "choices": [{"index": 0, "delta": {"content": text}, "finish_reason": null}]
    })
}

/// An OpenAI-style chunk announcing the assistant role with no text.
pub fn role_chunk() -> Value {
    json!({
        "id": "chatcmpl-mock",
        "object": "chat.completion.chunk",
        "choices": [{"index": 0, "delta": {"role": "assistant", "content": ""}, "finish_reason": null}]
    })
}

/// An OpenAI-style buffered completion body.
pub fn completion_body(text: &str) -> Value {
    json!({
        "id": "chatcmpl-mock",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": text},
            "finish_reason": "stop"
        }]
    })
}
