// SPDX-FileCopyrightText: 2026 Swiftroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for OpenAI-compatible error bodies.
//!
//! Request and chunk bodies are relayed as raw JSON; only errors are typed.

use serde::Deserialize;

/// Error body: `{"error": {"message": ..., "type": ..., "code": ...}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

/// Error detail within an API error response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    /// Human-readable error message.
    pub message: String,
    /// Error type identifier, if the backend sends one.
    #[serde(rename = "type", default)]
    pub type_: Option<String>,
    /// Machine-readable code (string or number depending on the backend).
    #[serde(default)]
    pub code: Option<serde_json::Value>,
}

impl ApiErrorResponse {
    /// Best-effort human message from a raw error body.
    pub fn message_from_body(body: &str) -> String {
        match serde_json::from_str::<ApiErrorResponse>(body) {
            Ok(parsed) => match parsed.error.type_ {
                Some(kind) => format!("{} ({kind})", parsed.error.message),
                None => parsed.error.message,
            },
            Err(_) if body.trim().is_empty() => "empty response body".to_string(),
            Err(_) => body.trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_error_body() {
        let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error","code":"invalid_api_key"}}"#;
        assert_eq!(
            ApiErrorResponse::message_from_body(body),
            "Incorrect API key provided (invalid_request_error)"
        );
    }

    #[test]
    fn error_without_type() {
        let body = r#"{"error":{"message":"model not found"}}"#;
        assert_eq!(ApiErrorResponse::message_from_body(body), "model not found");
    }

    #[test]
    fn plain_text_body() {
        assert_eq!(ApiErrorResponse::message_from_body("Bad Gateway\n"), "Bad Gateway");
        assert_eq!(ApiErrorResponse::message_from_body(""), "empty response body");
    }
}
