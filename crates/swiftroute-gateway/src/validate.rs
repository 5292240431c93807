// SPDX-FileCopyrightText: 2026 Swiftroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Structural validation of inbound chat requests.
//!
//! Runs on the raw JSON before typed deserialization so every problem is
//! reported with its path, not just the first one serde trips over. Semantic
//! checks on `fastModel`/`slowModel` contents belong to the resolver.

use serde_json::{Map, Value};
use url::Url;

use swiftroute_core::FieldError;

const ROLES: &[&str] = &["user", "assistant", "system", "function", "tool"];

/// Collects every structural problem in a chat request body.
pub fn validate_chat_request(body: &Value) -> Vec<FieldError> {
    let mut errors = Vec::new();

    let Some(body) = body.as_object() else {
        errors.push(FieldError::new("", "request body must be a JSON object"));
        return errors;
    };

    match body.get("messages") {
        None | Some(Value::Null) => errors.push(FieldError::new("messages", "is required")),
        Some(Value::Array(messages)) if messages.is_empty() => {
            errors.push(FieldError::new("messages", "must contain at least one message"));
        }
        Some(Value::Array(messages)) => {
            for (i, message) in messages.iter().enumerate() {
                check_message(&format!("messages[{i}]"), message, &mut errors);
            }
        }
        Some(_) => errors.push(FieldError::new("messages", "must be an array")),
    }

    for field in ["fastModel", "slowModel"] {
        if let Some(selector) = body.get(field) {
            check_selector(field, selector, &mut errors);
        }
    }

    if let Some(stream) = body.get("stream") {
        if !matches!(stream, Value::Bool(_) | Value::Null) {
            errors.push(FieldError::new("stream", "must be a boolean"));
        }
    }

    errors
}

fn check_message(path: &str, message: &Value, errors: &mut Vec<FieldError>) {
    let Some(message) = message.as_object() else {
        errors.push(FieldError::new(path, "must be an object"));
        return;
    };

    match message.get("role").and_then(Value::as_str) {
        Some(role) if ROLES.contains(&role) => {}
        Some(role) => errors.push(FieldError::new(
            format!("{path}.role"),
            format!("unknown role `{role}`, expected one of {}", ROLES.join(", ")),
        )),
        None => errors.push(FieldError::new(format!("{path}.role"), "is required")),
    }

    match message.get("content") {
        Some(Value::String(_)) => {}
        Some(Value::Array(parts)) if parts.is_empty() => {
            errors.push(FieldError::new(format!("{path}.content"), "must not be empty"));
        }
        Some(Value::Array(parts)) => {
            for (j, part) in parts.iter().enumerate() {
                check_part(&format!("{path}.content[{j}]"), part, errors);
            }
        }
        None | Some(Value::Null) => {
            errors.push(FieldError::new(format!("{path}.content"), "is required"));
        }
        Some(_) => errors.push(FieldError::new(
            format!("{path}.content"),
            "must be a string or an array of content parts",
        )),
    }

    if let Some(name) = message.get("name") {
        if !name.is_string() && !name.is_null() {
            errors.push(FieldError::new(format!("{path}.name"), "must be a string"));
        }
    }
}

fn check_part(path: &str, part: &Value, errors: &mut Vec<FieldError>) {
    let Some(part) = part.as_object() else {
        errors.push(FieldError::new(path, "must be an object"));
        return;
    };

    match part.get("type").and_then(Value::as_str) {
        Some("text") => {
            if !part.get("text").is_some_and(Value::is_string) {
                errors.push(FieldError::new(format!("{path}.text"), "must be a string"));
            }
        }
        Some("image_url") => {
            let url = part
                .get("image_url")
                .and_then(Value::as_object)
                .and_then(|image| image.get("url"))
                .and_then(Value::as_str);
            match url {
                Some(url) if Url::parse(url).is_ok() => {}
                Some(_) => errors.push(FieldError::new(
                    format!("{path}.image_url.url"),
                    "must be a valid absolute URL",
                )),
                None => errors.push(FieldError::new(
                    format!("{path}.image_url.url"),
                    "is required",
                )),
            }
        }
        Some("input_audio") => match part.get("input_audio").and_then(Value::as_object) {
            Some(audio) => {
                for key in ["data", "format"] {
                    if !non_empty_str(audio, key) {
                        errors.push(FieldError::new(
                            format!("{path}.input_audio.{key}"),
                            "must be a non-empty string",
                        ));
                    }
                }
            }
            None => errors.push(FieldError::new(format!("{path}.input_audio"), "is required")),
        },
        Some(other) => errors.push(FieldError::new(
            format!("{path}.type"),
            format!("unknown content part type `{other}`"),
        )),
        None => errors.push(FieldError::new(format!("{path}.type"), "is required")),
    }
}

/// Shape only: a string, or an object whose `name` is a string. Whether the
/// name is empty or the credential is usable is the resolver's call.
fn check_selector(field: &str, selector: &Value, errors: &mut Vec<FieldError>) {
    match selector {
        Value::Null | Value::String(_) => {}
        Value::Object(config) => {
            if !config.get("name").is_some_and(Value::is_string) {
                errors.push(FieldError::new(format!("{field}.name"), "must be a string"));
            }
            let base_url = config
                .get("baseURL")
                .or_else(|| config.get("baseUrl"))
                .or_else(|| config.get("base_url"));
            if base_url.is_some_and(|v| !v.is_string() && !v.is_null()) {
                errors.push(FieldError::new(format!("{field}.baseURL"), "must be a string"));
            }
        }
        _ => errors.push(FieldError::new(field, "must be a model name or a backend object")),
    }
}

fn non_empty_str(object: &Map<String, Value>, key: &str) -> bool {
    object
        .get(key)
        .and_then(Value::as_str)
        .is_some_and(|s| !s.is_empty())
}
