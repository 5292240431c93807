// SPDX-FileCopyrightText: 2026 Swiftroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SSE stream parser for OpenAI-compatible streaming completions.
//!
//! Converts a reqwest response byte stream into raw [`StreamChunk`]s using the
//! `eventsource-stream` crate for SSE protocol compliance.

use eventsource_stream::Eventsource;
use futures::stream::StreamExt;
use serde_json::Value;

use swiftroute_core::{ChunkStream, StreamChunk, SwiftrouteError};

/// End-of-stream sentinel sent by OpenAI-compatible backends.
const DONE_SENTINEL: &str = "[DONE]";

/// Parses a streaming response into a stream of chunks.
///
/// The `[DONE]` sentinel and empty keep-alive events are skipped. A chunk
/// that carries an `error` object instead of `choices` becomes an `Err`.
pub fn parse_sse_stream(response: reqwest::Response) -> ChunkStream {
    let event_stream = response.bytes_stream().eventsource();

    let mapped = event_stream.filter_map(|result| async move {
        match result {
            Ok(event) => {
                let data = event.data.trim();
                if data.is_empty() || data == DONE_SENTINEL {
                    return None;
                }
                Some(parse_chunk(data))
            }
            Err(e) => Some(Err(SwiftrouteError::Backend {
                message: format!("SSE stream error: {e}"),
                source: None,
            })),
        }
    });

    Box::pin(mapped)
}

fn parse_chunk(data: &str) -> Result<StreamChunk, SwiftrouteError> {
    let value: Value = serde_json::from_str(data)
        .map_err(|e| SwiftrouteError::backend(format!("failed to parse stream chunk: {e}"), e))?;

    if let Some(error) = value.get("error") {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        return Err(SwiftrouteError::Backend {
            message: format!("backend stream error: {message}"),
            source: None,
        });
    }

    Ok(StreamChunk(value))
}
