// SPDX-FileCopyrightText: 2026 Swiftroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-level routing defaults, parsed once from configuration.

use url::Url;

use swiftroute_config::SwiftrouteConfig;
use swiftroute_core::{BackendTarget, ResolvedBackend, SwiftrouteError};

/// Routing defaults shared by every request.
#[derive(Clone)]
pub struct RouterSettings {
    /// Fast-side model when the caller sends no `fastModel`.
    pub fast_model: String,
    /// Slow-side model when the caller sends no `slowModel`.
    pub slow_model: String,
    /// Endpoint used when a selector carries no `baseURL`.
    pub base_url: Url,
    /// Process-default credential.
    pub api_key: Option<String>,
    pub probe: ProbeSettings,
}

/// Fixed reference backend for the complexity probe.
#[derive(Debug, Clone)]
pub struct ProbeSettings {
    pub model: String,
    pub base_url: Url,
    pub max_tokens: u32,
}

impl RouterSettings {
    /// Build settings from validated configuration.
    pub fn from_config(config: &SwiftrouteConfig) -> Result<Self, SwiftrouteError> {
        let base_url = parse_url("backend.base_url", &config.backend.base_url)?;
        let probe_base_url = match &config.probe.base_url {
            Some(raw) => parse_url("probe.base_url", raw)?,
            None => base_url.clone(),
        };

        Ok(Self {
            fast_model: config.backend.fast_model.clone(),
            slow_model: config.backend.slow_model.clone(),
            base_url,
            api_key: config.backend.api_key.clone(),
            probe: ProbeSettings {
                model: config.probe.model.clone(),
                base_url: probe_base_url,
                max_tokens: config.probe.max_tokens,
            },
        })
    }

    /// Where and with which credential to relay to `backend`.
    ///
    /// Credential precedence: selector `apiKey`, then the caller's bearer
    /// token, then the process default.
    pub fn target_for(&self, backend: &ResolvedBackend, caller_key: Option<&str>) -> BackendTarget {
        BackendTarget {
            base_url: backend
                .base_url
                .clone()
                .unwrap_or_else(|| self.base_url.clone()),
            api_key: backend
                .api_key
                .clone()
                .or_else(|| caller_key.map(str::to_owned))
                .or_else(|| self.api_key.clone()),
        }
    }

    /// Where and with which credential to send the probe.
    ///
    /// The caller's bearer token wins over the process default.
    pub fn probe_target(&self, caller_key: Option<&str>) -> BackendTarget {
        BackendTarget {
            base_url: self.probe.base_url.clone(),
            api_key: caller_key
                .map(str::to_owned)
                .or_else(|| self.api_key.clone()),
        }
    }
}

impl std::fmt::Debug for RouterSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouterSettings")
            .field("fast_model", &self.fast_model)
            .field("slow_model", &self.slow_model)
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("probe", &self.probe)
            .finish()
    }
}

fn parse_url(key: &str, raw: &str) -> Result<Url, SwiftrouteError> {
    Url::parse(raw).map_err(|e| SwiftrouteError::Config(format!("{key}: `{raw}` is not a valid URL: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> RouterSettings {
        let mut config = SwiftrouteConfig::default();
        config.backend.base_url = "https://default.example.com/v1".into();
        config.backend.api_key = Some("sk-process".into());
        RouterSettings::from_config(&config).unwrap()
    }

    #[test]
    fn probe_base_url_falls_back_to_backend() {
        let s = settings();
        assert_eq!(s.probe.base_url, s.base_url);
        assert_eq!(s.probe.max_tokens, 10);
    }

    #[test]
    fn invalid_url_is_a_config_error() {
        let mut config = SwiftrouteConfig::default();
        config.probe.base_url = Some("::nope".into());
        assert!(matches!(
            RouterSettings::from_config(&config),
            Err(SwiftrouteError::Config(_))
        ));
    }

    #[test]
    fn selector_key_beats_caller_and_process_keys() {
        let s = settings();
        let backend = ResolvedBackend {
            name: "m".into(),
            api_key: Some("sk-selector".into()),
            base_url: Some("https://other.example.com/v1".parse().unwrap()),
        };
        let target = s.target_for(&backend, Some("sk-caller"));
        assert_eq!(target.api_key.as_deref(), Some("sk-selector"));
        assert_eq!(target.base_url.as_str(), "https://other.example.com/v1");
    }

    #[test]
    fn caller_key_beats_process_key() {
        let s = settings();
        let target = s.target_for(&ResolvedBackend::named("m"), Some("sk-caller"));
        assert_eq!(target.api_key.as_deref(), Some("sk-caller"));
        assert_eq!(target.base_url.as_str(), "https://default.example.com/v1");

        let target = s.target_for(&ResolvedBackend::named("m"), None);
        assert_eq!(target.api_key.as_deref(), Some("sk-process"));
    }

    #[test]
    fn debug_redacts_api_key() {
        let debug = format!("{:?}", settings());
        assert!(!debug.contains("sk-process"));
    }
}
