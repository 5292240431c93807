// SPDX-FileCopyrightText: 2026 Swiftroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turns a caller-supplied fast/slow selector into a concrete backend.

use serde_json::Value;
use url::Url;

use swiftroute_core::{BackendSelector, ResolvedBackend, SwiftrouteError};

/// Resolve one side's selector.
///
/// An absent selector means `default_name` with no overrides. A bare string is
/// a model name. A structured selector must carry a non-empty `name`, a string
/// `apiKey` if any, and an absolute `baseURL` if any. `field` names the
/// request field (`fastModel` / `slowModel`) in the error.
pub fn resolve_selector(
    selector: Option<&BackendSelector>,
    default_name: &str,
    field: &str,
) -> Result<ResolvedBackend, SwiftrouteError> {
    let Some(selector) = selector else {
        return Ok(ResolvedBackend::named(default_name));
    };

    match selector {
        BackendSelector::Name(name) => {
            if name.trim().is_empty() {
                return Err(invalid(field, "model name must not be empty"));
            }
            Ok(ResolvedBackend::named(name.clone()))
        }
        BackendSelector::Config(config) => {
            if config.name.trim().is_empty() {
                return Err(invalid(
                    &format!("{field}.name"),
                    "model name must not be empty",
                ));
            }

            let api_key = match &config.api_key {
                None | Some(Value::Null) => None,
                Some(Value::String(key)) => Some(key.clone()),
                Some(_) => {
                    return Err(invalid(
                        &format!("{field}.apiKey"),
                        "credential must be a string",
                    ));
                }
            };

            let base_url = match &config.base_url {
                None => None,
                Some(raw) => Some(Url::parse(raw).map_err(|e| {
                    invalid(
                        &format!("{field}.baseURL"),
                        &format!("`{raw}` is not a valid absolute URL: {e}"),
                    )
                })?),
            };

            Ok(ResolvedBackend {
                name: config.name.clone(),
                api_key,
                base_url,
            })
        }
    }
}

fn invalid(field: &str, message: &str) -> SwiftrouteError {
    SwiftrouteError::InvalidModelConfig {
        field: field.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use swiftroute_core::BackendConfig;

    fn config(name: &str, api_key: Option<Value>, base_url: Option<&str>) -> BackendSelector {
        BackendSelector::Config(BackendConfig {
            name: name.into(),
            api_key,
            base_url: base_url.map(String::from),
        })
    }

    #[test]
    fn absent_selector_uses_default() {
        let resolved = resolve_selector(None, "gpt-4o-mini", "fastModel").unwrap();
        assert_eq!(resolved, ResolvedBackend::named("gpt-4o-mini"));
    }

    #[test]
    fn bare_name_has_no_overrides() {
        let selector = BackendSelector::Name("llama-3-8b".into());
        let resolved = resolve_selector(Some(&selector), "default", "fastModel").unwrap();
        assert_eq!(resolved.name, "llama-3-8b");
        assert!(resolved.api_key.is_none());
        assert!(resolved.base_url.is_none());
    }

    #[test]
    fn structured_selector_keeps_overrides() {
        let selector = config(
            "claude-3-opus",
            Some(json!("sk-slow")),
            Some("https://slow.example.com/v1"),
        );
        let resolved = resolve_selector(Some(&selector), "default", "slowModel").unwrap();
        assert_eq!(resolved.name, "claude-3-opus");
        assert_eq!(resolved.api_key.as_deref(), Some("sk-slow"));
        assert_eq!(
            resolved.base_url.unwrap().as_str(),
            "https://slow.example.com/v1"
        );
    }

    #[test]
    fn empty_name_is_rejected() {
        let selector = config("", None, None);
        match resolve_selector(Some(&selector), "default", "slowModel") {
            Err(SwiftrouteError::InvalidModelConfig { field, .. }) => {
                assert_eq!(field, "slowModel.name")
            }
            other => panic!("expected InvalidModelConfig, got {other:?}"),
        }

        let bare = BackendSelector::Name("  ".into());
        assert!(matches!(
            resolve_selector(Some(&bare), "default", "fastModel"),
            Err(SwiftrouteError::InvalidModelConfig { .. })
        ));
    }

    #[test]
    fn non_string_api_key_is_rejected() {
        let selector = config("m", Some(json!(12345)), None);
        match resolve_selector(Some(&selector), "default", "fastModel") {
            Err(SwiftrouteError::InvalidModelConfig { field, .. }) => {
                assert_eq!(field, "fastModel.apiKey")
            }
            other => panic!("expected InvalidModelConfig, got {other:?}"),
        }
    }

    #[test]
    fn relative_base_url_is_rejected() {
        let selector = config("m", None, Some("not a url"));
        let err = resolve_selector(Some(&selector), "default", "slowModel").unwrap_err();
        assert_eq!(err.status_code(), 400);
        match err {
            SwiftrouteError::InvalidModelConfig { field, message } => {
                assert_eq!(field, "slowModel.baseURL");
                assert!(message.contains("not a url"));
            }
            other => panic!("expected InvalidModelConfig, got {other:?}"),
        }
    }
}
