// SPDX-FileCopyrightText: 2026 Swiftroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use url::Url;

use crate::diagnostic::ConfigError;
use crate::model::SwiftrouteConfig;

/// Largest probe output bound we accept. The probe only ever reads one fragment.
pub const MAX_PROBE_TOKENS: u32 = 64;

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first.
pub fn validate_config(config: &SwiftrouteConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.server.host.trim().is_empty() {
        errors.push(validation("server.host must not be empty"));
    }

    check_absolute_url(&mut errors, "backend.base_url", &config.backend.base_url);
    if let Some(probe_url) = &config.probe.base_url {
        check_absolute_url(&mut errors, "probe.base_url", probe_url);
    }

    for (key, value) in [
        ("backend.fast_model", &config.backend.fast_model),
        ("backend.slow_model", &config.backend.slow_model),
        ("probe.model", &config.probe.model),
    ] {
        if value.trim().is_empty() {
            errors.push(validation(format!("{key} must not be empty")));
        }
    }

    if config.backend.api_key.as_deref().is_some_and(|k| k.trim().is_empty()) {
        errors.push(validation(
            "backend.api_key must not be empty when set (omit it instead)",
        ));
    }

    if config.probe.max_tokens == 0 || config.probe.max_tokens > MAX_PROBE_TOKENS {
        errors.push(validation(format!(
            "probe.max_tokens must be between 1 and {MAX_PROBE_TOKENS}, got {}",
            config.probe.max_tokens
        )));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_absolute_url(errors: &mut Vec<ConfigError>, key: &str, value: &str) {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(validation(format!(
            "{key} must use http or https, got scheme `{}`",
            url.scheme()
        ))),
        Err(e) => errors.push(validation(format!("{key} `{value}` is not a valid URL: {e}"))),
    }
}

fn validation(message: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        message: message.into(),
    }
}
