// SPDX-FileCopyrightText: 2026 Swiftroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a typo in a config key
//! fails startup instead of being silently ignored.

use serde::{Deserialize, Serialize};

/// Top-level Swiftroute configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SwiftrouteConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Process-level backend defaults used when the caller supplies no selector.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Complexity probe settings.
    #[serde(default)]
    pub probe: ProbeConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8787
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Default backend endpoint, credential, and per-side model names.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    /// Endpoint used when a selector carries no `baseURL`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Process-default credential. Callers may supply their own via
    /// `Authorization: Bearer` or a selector `apiKey`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model used for the fast side when the caller sends no `fastModel`.
    #[serde(default = "default_fast_model")]
    pub fast_model: String,

    /// Model used for the slow side when the caller sends no `slowModel`.
    #[serde(default = "default_slow_model")]
    pub slow_model: String,

    /// TCP/TLS connect timeout. Relays themselves are not time-limited.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            fast_model: default_fast_model(),
            slow_model: default_slow_model(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("fast_model", &self.fast_model)
            .field("slow_model", &self.slow_model)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_fast_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_slow_model() -> String {
    "gpt-4o".to_string()
}

fn default_connect_timeout_secs() -> u64 {
    10
}

/// Complexity probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProbeConfig {
    /// Reference model asked to flag complex queries.
    #[serde(default = "default_probe_model")]
    pub model: String,

    /// Probe endpoint. Falls back to `backend.base_url`.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Output bound for the probe; only the first fragment is ever read.
    #[serde(default = "default_probe_max_tokens")]
    pub max_tokens: u32,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            model: default_probe_model(),
            base_url: None,
            max_tokens: default_probe_max_tokens(),
        }
    }
}

fn default_probe_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_probe_max_tokens() -> u32 {
    10
}
