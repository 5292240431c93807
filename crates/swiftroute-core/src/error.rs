// SPDX-FileCopyrightText: 2026 Swiftroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error taxonomy for the Swiftroute router.
//!
//! Every failure raised by classification, model resolution, or relaying is a
//! [`SwiftrouteError`]. The mapping to a caller-visible HTTP status lives in
//! [`SwiftrouteError::status_code`] so the outermost handler maps exactly once.

use serde::Serialize;
use thiserror::Error;

/// Status used when the caller closed the connection before a response was produced.
pub const CLIENT_CLOSED_REQUEST: u16 = 499;

/// A single field-level validation failure reported back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// JSON path of the offending field, e.g. `messages[0].content[1].text`.
    pub path: String,
    /// What is wrong with it.
    pub message: String,
}

impl FieldError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// The error type used across all Swiftroute crates.
#[derive(Debug, Error)]
pub enum SwiftrouteError {
    /// Request body failed schema validation.
    #[error("invalid request body")]
    InvalidRequest { details: Vec<FieldError> },

    /// Request body is not valid JSON.
    #[error("malformed JSON: {0}")]
    MalformedJson(String),

    /// A caller-supplied fast/slow model selector is invalid.
    #[error("invalid model config `{field}`: {message}")]
    InvalidModelConfig { field: String, message: String },

    /// The backend rejected the credential.
    #[error("backend authentication failed: {message}")]
    BackendAuth { message: String },

    /// The backend does not know the requested model.
    #[error("backend model not found: {message}")]
    BackendNotFound { message: String },

    /// The backend is throttling us.
    #[error("backend rate limited: {message}")]
    BackendRateLimited { message: String },

    /// Any other backend failure (transport, protocol, 5xx).
    #[error("backend error: {message}")]
    Backend {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The caller went away. Not a failure; short-circuits the relay.
    #[error("client disconnected")]
    ClientDisconnected,

    /// Configuration errors detected at startup.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SwiftrouteError {
    /// Builds a transport-level backend error.
    pub fn backend(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Backend {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Classifies a failed backend HTTP exchange by its status code.
    pub fn from_backend_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => Self::BackendAuth { message },
            404 => Self::BackendNotFound { message },
            429 => Self::BackendRateLimited { message },
            _ => Self::Backend {
                message: format!("backend returned {status}: {message}"),
                source: None,
            },
        }
    }

    /// HTTP status the caller sees for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidRequest { .. } | Self::MalformedJson(_) | Self::InvalidModelConfig { .. } => {
                400
            }
            Self::BackendAuth { .. } => 401,
            Self::BackendNotFound { .. } => 404,
            Self::BackendRateLimited { .. } => 429,
            Self::ClientDisconnected => CLIENT_CLOSED_REQUEST,
            Self::Backend { .. } | Self::Config(_) | Self::Internal(_) => 500,
        }
    }

    /// Message placed in the `error` field of the response body.
    ///
    /// Unclassified failures get a generic message so backend internals do
    /// not leak to callers; the full error is logged instead.
    pub fn public_message(&self) -> String {
        match self {
            Self::InvalidRequest { .. } => "Invalid request body".to_string(),
            Self::MalformedJson(_) => "Malformed JSON in request body".to_string(),
            Self::InvalidModelConfig { field, message } => {
                format!("Invalid model configuration for `{field}`: {message}")
            }
            Self::BackendAuth { .. } => "Backend rejected the provided credentials".to_string(),
            Self::BackendNotFound { message } => format!("Model not found: {message}"),
            Self::BackendRateLimited { .. } => "Backend rate limit exceeded".to_string(),
            Self::ClientDisconnected => String::new(),
            Self::Backend { .. } | Self::Config(_) | Self::Internal(_) => {
                "Internal server error".to_string()
            }
        }
    }

    /// Field-level details, present only for schema validation failures.
    pub fn details(&self) -> Option<&[FieldError]> {
        match self {
            Self::InvalidRequest { details } => Some(details),
            _ => None,
        }
    }
}
