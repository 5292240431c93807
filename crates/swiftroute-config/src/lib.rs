// SPDX-FileCopyrightText: 2026 Swiftroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Swiftroute router.
//!
//! TOML files in the XDG hierarchy plus `SWIFTROUTE_*` environment overrides,
//! merged with Figment, strictly deserialized (`deny_unknown_fields`), then
//! semantically validated. Failures come back as miette diagnostics.
//!
//! ```no_run
//! use swiftroute_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("fast model: {}", config.backend.fast_model);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::SwiftrouteConfig;

/// Load configuration from the standard hierarchy and validate it.
pub fn load_and_validate() -> Result<SwiftrouteConfig, Vec<ConfigError>> {
    finish(loader::load_config())
}

/// Load configuration from an explicit file (plus env overrides) and validate it.
pub fn load_and_validate_path(path: &Path) -> Result<SwiftrouteConfig, Vec<ConfigError>> {
    if !path.exists() {
        return Err(vec![ConfigError::Other(format!(
            "config file `{}` does not exist",
            path.display()
        ))]);
    }
    finish(loader::load_config_from_path(path))
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<SwiftrouteConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content))
}

fn finish(
    loaded: Result<SwiftrouteConfig, figment::Error>,
) -> Result<SwiftrouteConfig, Vec<ConfigError>> {
    let config = loaded.map_err(diagnostic::figment_to_config_errors)?;
    validation::validate_config(&config)?;
    Ok(config)
}
