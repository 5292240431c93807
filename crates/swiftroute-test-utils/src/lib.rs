// SPDX-FileCopyrightText: 2026 Swiftroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Swiftroute: a scripted [`MockBackend`] with
//! connection accounting, plus OpenAI-shaped fixture builders.

pub mod mock_backend;

pub use mock_backend::{
    completion_body, role_chunk, text_chunk, ConnectionGauge, MockBackend, MockFailure,
    MockReply, RecordedCall,
};
