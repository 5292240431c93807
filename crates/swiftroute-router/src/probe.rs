// SPDX-FileCopyrightText: 2026 Swiftroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model-assisted complexity probe.
//!
//! Asks a reference backend whether the conversation needs the slow backend.
//! Only the first non-empty text fragment of the reply is read; the stream is
//! dropped right after, which releases the probe connection. Every failure
//! resolves to the fast backend.

use std::sync::Arc;

use futures::StreamExt;
use serde_json::Map;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use swiftroute_core::{
    BackendClient, BackendTarget, ClassificationOutcome, ClassificationReason, CompletionRequest,
    Message, Role, SwiftrouteError,
};

use crate::settings::ProbeSettings;

/// Reply prefix that flags a complex query.
pub const COMPLEXITY_MARKER: &str = "==";

/// System instruction injected just before the latest message.
pub const PROBE_INSTRUCTION: &str = "Before answering, decide whether the latest user message \
requires multi-step reasoning, expert domain knowledge, or in-depth analysis. If it does, \
begin your reply with exactly \"==\". If it does not, reply normally without that marker.";

/// Probe classifier bound to one reference backend.
pub struct ProbeClassifier {
    backend: Arc<dyn BackendClient>,
    settings: ProbeSettings,
}

impl ProbeClassifier {
    pub fn new(backend: Arc<dyn BackendClient>, settings: ProbeSettings) -> Self {
        Self { backend, settings }
    }

    /// Classify `messages` by probing the reference backend.
    ///
    /// Never fails. A reply with no text counts as simple; errors and
    /// cancellation resolve to the fast backend with reason `check-failed`.
    pub async fn classify(
        &self,
        messages: &[Message],
        target: BackendTarget,
        cancel: &CancellationToken,
    ) -> ClassificationOutcome {
        let request = self.probe_request(messages);

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(SwiftrouteError::ClientDisconnected),
            result = self.first_fragment(&target, &request) => result,
        };

        match result {
            Ok(Some(fragment)) if fragment.starts_with(COMPLEXITY_MARKER) => {
                debug!(model = %self.settings.model, "probe flagged query as complex");
                ClassificationOutcome::slow(ClassificationReason::ModelDetected)
            }
            Ok(_) => ClassificationOutcome::fast(ClassificationReason::ModelSimple),
            Err(SwiftrouteError::ClientDisconnected) => {
                debug!("probe abandoned, client disconnected");
                ClassificationOutcome::fast(ClassificationReason::CheckFailed)
            }
            Err(e) => {
                warn!(model = %self.settings.model, error = %e, "probe failed, routing to fast backend");
                ClassificationOutcome::fast(ClassificationReason::CheckFailed)
            }
        }
    }

    fn probe_request(&self, messages: &[Message]) -> CompletionRequest {
        CompletionRequest {
            model: self.settings.model.clone(),
            messages: probe_messages(messages),
            max_tokens: Some(self.settings.max_tokens),
            stream: true,
            extra: Map::new(),
        }
    }

    /// Reads until the first non-empty fragment. Dropping the stream on
    /// return closes the probe connection.
    async fn first_fragment(
        &self,
        target: &BackendTarget,
        request: &CompletionRequest,
    ) -> Result<Option<String>, SwiftrouteError> {
        let mut stream = self.backend.stream(target, request).await?;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            if let Some(text) = chunk.text_fragment().filter(|t| !t.is_empty()) {
                return Ok(Some(text.to_string()));
            }
        }
        Ok(None)
    }
}

/// The caller's messages with the probe instruction inserted before the last one.
pub fn probe_messages(messages: &[Message]) -> Vec<Message> {
    let mut probe = messages.to_vec();
    let at = probe.len().saturating_sub(1);
    probe.insert(at, Message::text(Role::System, PROBE_INSTRUCTION));
    probe
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use swiftroute_core::MessageContent;
    use swiftroute_test_utils::{role_chunk, text_chunk, MockBackend, MockFailure, MockReply};

    fn settings() -> ProbeSettings {
        ProbeSettings {
            model: "probe-model".into(),
            base_url: "http://probe.invalid/v1".parse().unwrap(),
            max_tokens: 10,
        }
    }

    fn target() -> BackendTarget {
        BackendTarget {
            base_url: "http://probe.invalid/v1".parse().unwrap(),
            api_key: Some("sk-probe".into()),
        }
    }

    fn conversation() -> Vec<Message> {
        vec![
            Message::text(Role::User, "earlier question"),
            Message::text(Role::Assistant, "earlier answer"),
            Message::text(Role::User, "Why is the sky blue?"),
        ]
    }

    fn probe(mock: &Arc<MockBackend>) -> ProbeClassifier {
        ProbeClassifier::new(mock.clone(), settings())
    }

    #[test]
    fn instruction_goes_before_last_message() {
        let messages = probe_messages(&conversation());
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[2].role, Role::System);
        assert!(matches!(&messages[2].content, MessageContent::Text(t) if t == PROBE_INSTRUCTION));
        assert!(matches!(&messages[3].content, MessageContent::Text(t) if t == "Why is the sky blue?"));
    }

    #[test]
    fn single_message_gets_instruction_first() {
        let messages = probe_messages(&[Message::text(Role::User, "hi")]);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].role, Role::User);
    }

    #[tokio::test]
    async fn marker_routes_slow() {
        let mock = Arc::new(MockBackend::with_replies(vec![MockReply::Chunks(vec![
            role_chunk(),
            text_chunk("== this needs thought"),
        ])]));
        let outcome = probe(&mock)
            .classify(&conversation(), target(), &CancellationToken::new())
            .await;
        assert_eq!(outcome, ClassificationOutcome::slow(ClassificationReason::ModelDetected));
    }

    #[tokio::test]
    async fn plain_reply_routes_fast() {
        let mock = Arc::new(MockBackend::with_replies(vec![MockReply::Chunks(vec![
            text_chunk("The sky is blue because"),
        ])]));
        let outcome = probe(&mock)
            .classify(&conversation(), target(), &CancellationToken::new())
            .await;
        assert_eq!(outcome, ClassificationOutcome::fast(ClassificationReason::ModelSimple));
    }

    #[tokio::test]
    async fn marker_must_be_at_start() {
        let mock = Arc::new(MockBackend::with_replies(vec![MockReply::Chunks(vec![
            text_chunk(" =="),
        ])]));
        let outcome = probe(&mock)
            .classify(&conversation(), target(), &CancellationToken::new())
            .await;
        assert_eq!(outcome.reason, ClassificationReason::ModelSimple);
    }

    #[tokio::test]
    async fn sends_probe_model_and_budget() {
        let mock = Arc::new(MockBackend::new());
        probe(&mock)
            .classify(&conversation(), target(), &CancellationToken::new())
            .await;
        let calls = mock.calls().await;
        assert_eq!(calls.len(), 1);
        assert!(calls[0].streaming);
        assert_eq!(calls[0].request.model, "probe-model");
        assert_eq!(calls[0].request.max_tokens, Some(10));
        assert_eq!(calls[0].request.messages.len(), 4);
        assert_eq!(calls[0].target.api_key.as_deref(), Some("sk-probe"));
    }

    #[tokio::test]
    async fn stream_released_after_first_fragment() {
        let mock = Arc::new(MockBackend::with_replies(vec![MockReply::ChunksThenHang(vec![
            text_chunk("short answer"),
        ])]));
        let outcome = probe(&mock)
            .classify(&conversation(), target(), &CancellationToken::new())
            .await;
        assert_eq!(outcome.reason, ClassificationReason::ModelSimple);
        let gauge = mock.gauge();
        assert_eq!(gauge.opened(), 1);
        assert_eq!(gauge.released(), 1);
    }

    #[tokio::test]
    async fn backend_failure_routes_fast() {
        let mock = Arc::new(MockBackend::with_replies(vec![MockReply::Fail(
            MockFailure::Network("connection refused".into()),
        )]));
        let outcome = probe(&mock)
            .classify(&conversation(), target(), &CancellationToken::new())
            .await;
        assert_eq!(outcome, ClassificationOutcome::fast(ClassificationReason::CheckFailed));
    }

    #[tokio::test]
    async fn mid_stream_error_routes_fast() {
        let mock = Arc::new(MockBackend::with_replies(vec![MockReply::ChunksThenError(
            vec![role_chunk()],
            MockFailure::Status(500, "boom".into()),
        )]));
        let outcome = probe(&mock)
            .classify(&conversation(), target(), &CancellationToken::new())
            .await;
        assert_eq!(outcome.reason, ClassificationReason::CheckFailed);
    }

    #[tokio::test]
    async fn reply_without_text_is_simple() {
        let mock = Arc::new(MockBackend::with_replies(vec![MockReply::Chunks(vec![
            role_chunk(),
        ])]));
        let outcome = probe(&mock)
            .classify(&conversation(), target(), &CancellationToken::new())
            .await;
        assert_eq!(outcome, ClassificationOutcome::fast(ClassificationReason::ModelSimple));
        assert_eq!(mock.gauge().released(), 1);
    }

    #[tokio::test]
    async fn cancellation_releases_probe_connection() {
        let mock = Arc::new(MockBackend::with_replies(vec![MockReply::ChunksThenHang(vec![
            role_chunk(),
        ])]));
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let outcome = probe(&mock).classify(&conversation(), target(), &cancel).await;
        assert_eq!(outcome.reason, ClassificationReason::CheckFailed);
        assert!(mock.gauge().wait_until_idle(Duration::from_secs(1)).await);
        assert_eq!(mock.gauge().released(), 1);
    }
}
