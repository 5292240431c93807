// SPDX-FileCopyrightText: 2026 Swiftroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model routing: selector resolution, then heuristics, then the probe.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use swiftroute_core::{
    BackendClient, BackendSide, ChatRequest, ClassificationOutcome, Message, ResolvedBackend,
    SwiftrouteError,
};

use crate::classifier::HeuristicClassifier;
use crate::extractor::extract_text;
use crate::probe::ProbeClassifier;
use crate::resolver::resolve_selector;
use crate::settings::RouterSettings;

/// Where one request goes, and why.
#[derive(Debug, Clone)]
pub struct RoutingDecision {
    pub outcome: ClassificationOutcome,
    /// The selected side's resolved backend.
    pub backend: ResolvedBackend,
}

impl RoutingDecision {
    pub fn side(&self) -> BackendSide {
        self.outcome.side()
    }
}

/// Classifies requests and picks the fast or slow backend.
pub struct ModelRouter {
    heuristics: HeuristicClassifier,
    probe: ProbeClassifier,
    settings: Arc<RouterSettings>,
}

impl ModelRouter {
    pub fn new(backend: Arc<dyn BackendClient>, settings: Arc<RouterSettings>) -> Self {
        Self {
            heuristics: HeuristicClassifier::new(),
            probe: ProbeClassifier::new(backend, settings.probe.clone()),
            settings,
        }
    }

    pub fn settings(&self) -> &RouterSettings {
        &self.settings
    }

    /// Classify a conversation by its latest message.
    ///
    /// Heuristics run first; the probe is only consulted when they are
    /// inconclusive. Never fails.
    pub async fn classify(
        &self,
        messages: &[Message],
        caller_key: Option<&str>,
        cancel: &CancellationToken,
    ) -> ClassificationOutcome {
        let text = messages
            .last()
            .map(|m| extract_text(&m.content))
            .unwrap_or_default();

        if let Some(outcome) = self.heuristics.classify(&text) {
            return outcome;
        }

        self.probe
            .classify(messages, self.settings.probe_target(caller_key), cancel)
            .await
    }

    /// Route a validated request.
    ///
    /// Both selectors are resolved before anything touches the network, so a
    /// bad selector on either side fails fast even if that side would not be
    /// picked.
    pub async fn route(
        &self,
        request: &ChatRequest,
        caller_key: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<RoutingDecision, SwiftrouteError> {
        let fast = resolve_selector(
            request.fast_model.as_ref(),
            &self.settings.fast_model,
            "fastModel",
        )?;
        let slow = resolve_selector(
            request.slow_model.as_ref(),
            &self.settings.slow_model,
            "slowModel",
        )?;

        let outcome = self.classify(&request.messages, caller_key, cancel).await;
        if cancel.is_cancelled() {
            return Err(SwiftrouteError::ClientDisconnected);
        }

        let backend = match outcome.side() {
            BackendSide::Fast => fast,
            BackendSide::Slow => slow,
        };

        info!(
            side = %outcome.side(),
            model = backend.name.as_str(),
            reason = %outcome.reason,
            "routed request"
        );

        Ok(RoutingDecision { outcome, backend })
    }
}
