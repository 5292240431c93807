// SPDX-FileCopyrightText: 2026 Swiftroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Swiftroute - routes chat completions to a fast or slow model.
//!
//! This is the binary entry point for the Swiftroute gateway.

mod serve;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use swiftroute_config::{ConfigError, SwiftrouteConfig};

/// Swiftroute - routes chat completions to a fast or slow model.
#[derive(Parser, Debug)]
#[command(name = "swiftroute", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the standard locations.
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the gateway server (default).
    Serve,
    /// Validate configuration and print the effective settings.
    CheckConfig,
}

fn load_config(path: Option<&PathBuf>) -> Result<SwiftrouteConfig, Vec<ConfigError>> {
    match path {
        Some(path) => swiftroute_config::load_and_validate_path(path),
        None => swiftroute_config::load_and_validate(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(errors) => {
            swiftroute_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("swiftroute: {e}");
                std::process::exit(1);
            }
        }
        Commands::CheckConfig => {
            println!("swiftroute: config OK");
            println!("{config:#?}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::parse_from(["swiftroute"]);
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::parse_from(["swiftroute", "check-config", "--config", "/tmp/sr.toml"]);
        assert!(matches!(cli.command, Some(Commands::CheckConfig)));
        assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("/tmp/sr.toml")));
    }

    #[test]
    fn missing_config_file_is_reported() {
        let path = PathBuf::from("/definitely/not/here/swiftroute.toml");
        let errors = load_config(Some(&path)).unwrap_err();
        assert!(errors[0].to_string().contains("does not exist"));
    }
}
