// SPDX-FileCopyrightText: 2026 Swiftroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request, selector, and classification types shared across the router.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumString};
use url::Url;

/// Conversation role of a message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
    Function,
    Tool,
}

/// One chat message. Immutable once parsed; forwarded to the backend as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: MessageContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Function/tool call payloads and any other fields, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Message {
    /// A plain-text message with no extra fields.
    pub fn text(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: MessageContent::Text(content.into()),
            name: None,
            extra: Map::new(),
        }
    }
}

/// Message body: a plain string or an ordered list of typed parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

/// A typed content part. The `type` tag decides which payload is present.
///
/// Fields the router does not know about are kept in `extra` so the part
/// reaches the backend exactly as the caller sent it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text(TextPart),
    ImageUrl(ImageUrlPart),
    InputAudio(InputAudioPart),
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(TextPart {
            text: text.into(),
            extra: Map::new(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPart {
    pub text: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrlPart {
    pub image_url: ImageUrl,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputAudioPart {
    pub input_audio: InputAudio,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputAudio {
    pub data: String,
    pub format: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Caller-supplied backend choice for one side (fast or slow).
///
/// Either a bare model name or a structured config. Structural validation
/// happens in the resolver, so the credential is kept as a raw JSON value.
#[derive(Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum BackendSelector {
    Name(String),
    Config(BackendConfig),
}

impl std::fmt::Debug for BackendSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name(name) => f.debug_tuple("Name").field(name).finish(),
            Self::Config(config) => f.debug_tuple("Config").field(config).finish(),
        }
    }
}

/// Structured selector: model name plus optional credential and endpoint overrides.
#[derive(Clone, PartialEq, Deserialize)]
pub struct BackendConfig {
    pub name: String,
    #[serde(default, rename = "apiKey", alias = "api_key")]
    pub api_key: Option<Value>,
    #[serde(default, rename = "baseURL", alias = "baseUrl", alias = "base_url")]
    pub base_url: Option<String>,
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("name", &self.name)
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// A validated selector: always has a non-empty name.
#[derive(Clone, PartialEq)]
pub struct ResolvedBackend {
    pub name: String,
    pub api_key: Option<String>,
    pub base_url: Option<Url>,
}

impl ResolvedBackend {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            api_key: None,
            base_url: None,
        }
    }
}

impl std::fmt::Debug for ResolvedBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedBackend")
            .field("name", &self.name)
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("base_url", &self.base_url.as_ref().map(Url::as_str))
            .finish()
    }
}

/// Which of the two backends a request is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum BackendSide {
    Fast,
    Slow,
}

/// Why the classifier picked a side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum ClassificationReason {
    Length,
    Keywords,
    ModelDetected,
    ModelSimple,
    CheckFailed,
}

/// Result of the classification pipeline, produced once per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationOutcome {
    pub use_slow_backend: bool,
    pub reason: ClassificationReason,
}

impl ClassificationOutcome {
    pub fn slow(reason: ClassificationReason) -> Self {
        Self {
            use_slow_backend: true,
            reason,
        }
    }

    pub fn fast(reason: ClassificationReason) -> Self {
        Self {
            use_slow_backend: false,
            reason,
        }
    }

    pub fn side(&self) -> BackendSide {
        if self.use_slow_backend {
            BackendSide::Slow
        } else {
            BackendSide::Fast
        }
    }
}

/// Inbound chat request, after schema validation.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
    #[serde(default, rename = "fastModel")]
    pub fast_model: Option<BackendSelector>,
    #[serde(default, rename = "slowModel")]
    pub slow_model: Option<BackendSelector>,
    #[serde(default)]
    pub stream: Option<bool>,
    /// Caller's own `model` field. Ignored: the router decides.
    #[serde(default)]
    pub model: Option<Value>,
    /// Every other parameter, passed through to the backend.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChatRequest {
    pub fn is_streaming(&self) -> bool {
        self.stream.unwrap_or(false)
    }

    /// Builds the backend request with the selector fields stripped.
    pub fn to_completion(&self, model: impl Into<String>) -> CompletionRequest {
        CompletionRequest {
            model: model.into(),
            messages: self.messages.clone(),
            max_tokens: None,
            stream: self.is_streaming(),
            extra: self.extra.clone(),
        }
    }
}

/// Outbound chat completion request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    pub stream: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One partial-completion chunk from a streaming backend, kept as raw JSON
/// so it can be relayed without modification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StreamChunk(pub Value);

impl StreamChunk {
    /// Incremental text of the first candidate that carries any.
    pub fn text_fragment(&self) -> Option<&str> {
        self.0
            .get("choices")?
            .as_array()?
            .iter()
            .find_map(|choice| choice.pointer("/delta/content").and_then(Value::as_str))
    }
}

/// Where and how to reach a backend for one call.
#[derive(Clone, PartialEq)]
pub struct BackendTarget {
    pub base_url: Url,
    pub api_key: Option<String>,
}

impl std::fmt::Debug for BackendTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendTarget")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn message_with_parts_deserializes() {
        let msg: Message = serde_json::from_value(json!({
            "role": "user",
            "content": [
                {"type": "text", "text": "what is in"},
                {"type": "image_url", "image_url": {"url": "https://example.com/cat.png"}},
                {"type": "text", "text": "this picture?"}
            ]
        }))
        .unwrap();

        assert_eq!(msg.role, Role::User);
        match msg.content {
            MessageContent::Parts(parts) => {
                assert_eq!(parts.len(), 3);
                assert!(matches!(parts[1], ContentPart::ImageUrl(_)));
            }
            MessageContent::Text(_) => panic!("expected parts"),
        }
    }

    #[test]
    fn unknown_part_fields_pass_through() {
        let raw = json!({
            "role": "user",
            "content": [
                {"type": "text", "text": "hi", "cache_control": {"type": "ephemeral"}},
                {"type": "image_url", "image_url": {"url": "https://example.com/a.png", "extra_hint": 3}},
                {"type": "input_audio", "input_audio": {"data": "UklGRg==", "format": "wav", "rate": 16000}, "label": "clip"}
            ]
        });
        let msg: Message = serde_json::from_value(raw.clone()).unwrap();
        match &msg.content {
            MessageContent::Parts(parts) => match &parts[0] {
                ContentPart::Text(part) => {
                    assert_eq!(part.text, "hi");
                    assert!(part.extra.contains_key("cache_control"));
                    assert!(!part.extra.contains_key("type"));
                }
                other => panic!("expected text part, got {other:?}"),
            },
            MessageContent::Text(_) => panic!("expected parts"),
        }
        assert_eq!(serde_json::to_value(&msg).unwrap(), raw);
    }

    #[test]
    fn tool_call_payloads_pass_through() {
        let raw = json!({
            "role": "assistant",
            "content": "",
            "tool_calls": [{"id": "call_1", "type": "function", "function": {"name": "f", "arguments": "{}"}}]
        });
        let msg: Message = serde_json::from_value(raw.clone()).unwrap();
        assert!(msg.extra.contains_key("tool_calls"));
        assert_eq!(serde_json::to_value(&msg).unwrap(), raw);
    }

    #[test]
    fn selector_accepts_name_or_config() {
        let name: BackendSelector = serde_json::from_value(json!("m1")).unwrap();
        assert_eq!(name, BackendSelector::Name("m1".into()));

        let config: BackendSelector = serde_json::from_value(json!({
            "name": "m2",
            "apiKey": "sk-test",
            "baseURL": "https://llm.internal/v1"
        }))
        .unwrap();
        match config {
            BackendSelector::Config(c) => {
                assert_eq!(c.name, "m2");
                assert_eq!(c.api_key, Some(json!("sk-test")));
                assert_eq!(c.base_url.as_deref(), Some("https://llm.internal/v1"));
            }
            BackendSelector::Name(_) => panic!("expected config"),
        }
    }

    #[test]
    fn selector_debug_redacts_credential() {
        let selector: BackendSelector =
            serde_json::from_value(json!({"name": "m", "apiKey": "sk-secret"})).unwrap();
        let debug = format!("{selector:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("[redacted]"));
    }

    #[test]
    fn completion_strips_selectors_and_keeps_passthrough() {
        let req: ChatRequest = serde_json::from_value(json!({
            "messages": [{"role": "user", "content": "hi"}],
            "fastModel": "m1",
            "slowModel": {"name": "m2"},
            "model": "caller-choice",
            "stream": true,
            "temperature": 0.2,
            "max_tokens": 256
        }))
        .unwrap();

        let body = serde_json::to_value(req.to_completion("m1")).unwrap();
        assert_eq!(body["model"], "m1");
        assert_eq!(body["stream"], true);
        assert_eq!(body["temperature"], 0.2);
        assert_eq!(body["max_tokens"], 256);
        assert!(body.get("fastModel").is_none());
        assert!(body.get("slowModel").is_none());
    }

    #[test]
    fn chunk_text_fragment() {
        let chunk = StreamChunk(json!({
            "choices": [{"index": 0, "delta": {"content": "Hello"}}]
        }));
        assert_eq!(chunk.text_fragment(), Some("Hello"));

        let role_only = StreamChunk(json!({
            "choices": [{"index": 0, "delta": {"role": "assistant"}}]
        }));
        assert_eq!(role_only.text_fragment(), None);
    }

    #[test]
    fn reason_display_is_kebab_case() {
        assert_eq!(ClassificationReason::ModelDetected.to_string(), "model-detected");
        assert_eq!(ClassificationReason::CheckFailed.to_string(), "check-failed");
        assert_eq!(ClassificationReason::Length.to_string(), "length");
    }

    #[test]
    fn outcome_side() {
        assert_eq!(
            ClassificationOutcome::slow(ClassificationReason::Keywords).side(),
            BackendSide::Slow
        );
        assert_eq!(
            ClassificationOutcome::fast(ClassificationReason::ModelSimple).side(),
            BackendSide::Fast
        );
    }
}
