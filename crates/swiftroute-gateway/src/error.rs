// SPDX-FileCopyrightText: 2026 Swiftroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP rendering of [`SwiftrouteError`].
//!
//! The only place failures become status codes and bodies.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use swiftroute_core::{FieldError, SwiftrouteError};

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// Handler error: a [`SwiftrouteError`] that knows how to render itself.
#[derive(Debug)]
pub struct ApiError(pub SwiftrouteError);

impl From<SwiftrouteError> for ApiError {
    fn from(err: SwiftrouteError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status = StatusCode::from_u16(err.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if matches!(err, SwiftrouteError::ClientDisconnected) {
            tracing::debug!("client disconnected before a response was produced");
            return status.into_response();
        }

        if status.is_server_error() {
            tracing::error!(error = %err, "request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %err, "request rejected");
        }

        let body = ErrorResponse {
            error: err.public_message(),
            details: err.details().map(<[FieldError]>::to_vec),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn render(err: SwiftrouteError) -> (StatusCode, Vec<u8>) {
        let response = ApiError(err).into_response();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn client_disconnect_has_no_body() {
        let (status, body) = render(SwiftrouteError::ClientDisconnected).await;
        assert_eq!(status.as_u16(), 499);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn validation_error_carries_details() {
        let (status, body) = render(SwiftrouteError::InvalidRequest {
            details: vec![FieldError::new("messages", "is required")],
        })
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["details"][0]["path"], "messages");
        assert_eq!(json["details"][0]["message"], "is required");
    }

    #[tokio::test]
    async fn unclassified_error_hides_internals() {
        let (status, body) = render(SwiftrouteError::Backend {
            message: "upstream said secret things".into(),
            source: None,
        })
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Internal server error");
        assert!(json.get("details").is_none());
    }

    #[tokio::test]
    async fn backend_kinds_map_to_statuses() {
        let cases = [
            (SwiftrouteError::from_backend_status(401, "x"), 401),
            (SwiftrouteError::from_backend_status(404, "x"), 404),
            (SwiftrouteError::from_backend_status(429, "x"), 429),
            (SwiftrouteError::MalformedJson("eof".into()), 400),
            (
                SwiftrouteError::InvalidModelConfig {
                    field: "slowModel.name".into(),
                    message: "empty".into(),
                },
                400,
            ),
        ];
        for (err, expected) in cases {
            let (status, _) = render(err).await;
            assert_eq!(status.as_u16(), expected);
        }
    }
}
