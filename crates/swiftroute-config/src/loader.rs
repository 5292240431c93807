// SPDX-FileCopyrightText: 2026 Swiftroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup order: `./swiftroute.toml` > `~/.config/swiftroute/swiftroute.toml` >
//! `/etc/swiftroute/swiftroute.toml`, with `SWIFTROUTE_` environment overrides.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::SwiftrouteConfig;

/// Config sections addressable from the environment.
const ENV_SECTIONS: &[&str] = &["server", "backend", "probe"];

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/swiftroute/swiftroute.toml";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "swiftroute.toml";

/// Path of the per-user config file, if a config dir exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("swiftroute").join(LOCAL_CONFIG_FILE))
}

/// Build the layered Figment without extracting it.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/swiftroute/swiftroute.toml`
/// 3. `~/.config/swiftroute/swiftroute.toml`
/// 4. `./swiftroute.toml`
/// 5. `SWIFTROUTE_*` environment variables
pub fn build_figment() -> Figment {
    let mut figment = Figment::new()
        .merge(Serialized::defaults(SwiftrouteConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH));
    if let Some(user) = user_config_path() {
        figment = figment.merge(Toml::file(user));
    }
    figment.merge(Toml::file(LOCAL_CONFIG_FILE)).merge(env_provider())
}

/// Load configuration from the standard hierarchy with env var overrides.
pub fn load_config() -> Result<SwiftrouteConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from one explicit file, still honoring env overrides.
pub fn load_config_from_path(path: &Path) -> Result<SwiftrouteConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SwiftrouteConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only. No files, no environment.
pub fn load_config_from_str(toml_content: &str) -> Result<SwiftrouteConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SwiftrouteConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Environment provider mapping `SWIFTROUTE_BACKEND_API_KEY` to `backend.api_key`.
///
/// Only the section prefix is turned into a dot; underscores inside key
/// names are kept, so `Env::split("_")` cannot be used here.
pub fn env_provider() -> Env {
    Env::prefixed("SWIFTROUTE_").map(|key| map_env_key(key.as_str()).into())
}

fn map_env_key(key: &str) -> String {
    // Figment hands over the key as written in the environment.
    let key = key.to_ascii_lowercase();
    for section in ENV_SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_map_section_prefix_only() {
        assert_eq!(map_env_key("backend_api_key"), "backend.api_key");
        assert_eq!(map_env_key("probe_max_tokens"), "probe.max_tokens");
        assert_eq!(map_env_key("server_log_level"), "server.log_level");
        assert_eq!(map_env_key("unrelated"), "unrelated");
    }

    #[test]
    fn env_keys_are_case_insensitive() {
        assert_eq!(map_env_key("BACKEND_API_KEY"), "backend.api_key");
        assert_eq!(map_env_key("PROBE_BASE_URL"), "probe.base_url");
        assert_eq!(map_env_key("Server_Port"), "server.port");
    }

    #[test]
    fn empty_string_uses_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
    }
}
