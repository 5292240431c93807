// SPDX-FileCopyrightText: 2026 Swiftroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fast/slow routing for Swiftroute.
//!
//! Resolves the caller's backend selectors, classifies the latest message
//! with zero-cost heuristics, and falls back to a model-assisted probe when
//! the heuristics are inconclusive.

pub mod classifier;
pub mod extractor;
pub mod probe;
pub mod resolver;
pub mod router;
pub mod settings;

pub use classifier::{HeuristicClassifier, LENGTH_THRESHOLD, SLOW_KEYWORDS};
pub use extractor::extract_text;
pub use probe::{probe_messages, ProbeClassifier, COMPLEXITY_MARKER};
pub use resolver::resolve_selector;
pub use router::{ModelRouter, RoutingDecision};
pub use settings::{ProbeSettings, RouterSettings};
