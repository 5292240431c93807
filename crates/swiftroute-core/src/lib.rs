// SPDX-FileCopyrightText: 2026 Swiftroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Swiftroute fast/slow model router.
//!
//! This crate provides the error taxonomy, the request and selector data
//! model, and the [`BackendClient`] trait that the probe and relay stages
//! talk to.

pub mod backend;
pub mod error;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use backend::{BackendClient, ChunkStream};
pub use error::{FieldError, SwiftrouteError};
pub use types::{
    BackendConfig, BackendSelector, BackendSide, BackendTarget, ChatRequest,
    ClassificationOutcome, ClassificationReason, CompletionRequest, ContentPart, ImageUrl,
    ImageUrlPart, InputAudio, InputAudioPart, Message, MessageContent, ResolvedBackend, Role,
    StreamChunk, TextPart,
};
