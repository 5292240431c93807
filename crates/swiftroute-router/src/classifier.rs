// SPDX-FileCopyrightText: 2026 Swiftroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Heuristic query complexity classification.
//!
//! Two synchronous rules, checked in order. No network, no latency. When
//! neither fires the query goes to the probe.

use swiftroute_core::{ClassificationOutcome, ClassificationReason};

/// Queries longer than this many characters go to the slow backend.
pub const LENGTH_THRESHOLD: usize = 1000;

/// Terms that send a query to the slow backend (contains, case-insensitive).
pub const SLOW_KEYWORDS: &[&str] = &["legal", "medical", "analysis", "philosophy"];

/// Zero-cost heuristic classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicClassifier;

impl HeuristicClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Returns an outcome if a rule fires, `None` if the query is inconclusive.
    ///
    /// The length rule wins over the keyword rule.
    pub fn classify(&self, text: &str) -> Option<ClassificationOutcome> {
        if text.chars().count() > LENGTH_THRESHOLD {
            return Some(ClassificationOutcome::slow(ClassificationReason::Length));
        }

        let lower = text.to_lowercase();
        if SLOW_KEYWORDS.iter().any(|k| lower.contains(k)) {
            return Some(ClassificationOutcome::slow(ClassificationReason::Keywords));
        }

        None
    }
}
