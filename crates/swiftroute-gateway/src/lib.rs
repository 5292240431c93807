// SPDX-FileCopyrightText: 2026 Swiftroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Swiftroute router.
//!
//! Exposes an OpenAI-compatible `POST /v1/chat/completions` endpoint that
//! validates the request, routes it to the fast or slow backend, and relays
//! the answer back buffered or as a server-sent event stream.

pub mod error;
pub mod handlers;
pub mod relay;
pub mod server;
pub mod validate;

pub use error::{ApiError, ErrorResponse};
pub use handlers::{MODEL_HEADER, REASON_HEADER};
pub use relay::{RelayEngine, RelaySession, RelayState};
pub use server::{build_router, start_server, GatewayState};
pub use validate::validate_chat_request;
