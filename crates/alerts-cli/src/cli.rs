//! CLI argument parsing using clap derive

use std::path::PathBuf;
use std::time::Duration;

use alerts_api::{ApiSettings, DEFAULT_BASE_URL};
use clap::{Args, Parser, Subcommand};

use crate::error::{CliError, Result};

/// Alerts configurator - keep alert policies in sync with a configuration file
#[derive(Parser, Debug)]
#[command(name = "alerts")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Synchronize alert policies with a configuration file
    ///
    /// Channels and conditions are matched by name: matches are updated,
    /// missing ones created and the rest deleted. Renaming an entity in the
    /// file therefore deletes and recreates it.
    ///
    /// Examples:
    ///   alerts sync alerts.toml              # Apply changes
    ///   alerts sync alerts.toml --dry-run    # Preview without changing
    ///   alerts sync alerts.yaml --json       # Machine-readable report
    Sync {
        /// Configuration file (.toml, .json, .yaml or .yml)
        config: PathBuf,

        /// Preview changes without applying them
        #[arg(long)]
        dry_run: bool,

        /// Output as JSON for CI/CD integration
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        api: ApiArgs,
    },

    /// Check a configuration file without contacting the service
    Validate {
        /// Configuration file (.toml, .json, .yaml or .yml)
        config: PathBuf,
    },
}

/// Connection options of the alerting service
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ApiArgs {
    /// API key sent with every request
    #[arg(long, env = "NEW_RELIC_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of the REST API
    #[arg(long, env = "NEW_RELIC_API_URL", default_value = DEFAULT_BASE_URL)]
    pub api_url: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,
}

impl ApiArgs {
    /// Build client settings, failing if no API key was given
    pub fn settings(&self) -> Result<ApiSettings> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                CliError::user("No API key given. Pass --api-key or set NEW_RELIC_API_KEY")
            })?;

        Ok(ApiSettings::new(api_key)
            .with_base_url(self.api_url.as_str())
            .with_timeout(Duration::from_secs(self.timeout_secs)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_sync() {
        let cli = Cli::try_parse_from([
            "alerts",
            "sync",
            "alerts.toml",
            "--dry-run",
            "--api-key",
            "secret",
            "--api-url",
            "http://localhost:9000",
            "--timeout-secs",
            "5",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Sync {
                config,
                dry_run,
                json,
                api,
            }) => {
                assert_eq!(config, PathBuf::from("alerts.toml"));
                assert!(dry_run);
                assert!(!json);
                let settings = api.settings().unwrap();
                assert_eq!(settings.api_key, "secret");
                assert_eq!(settings.base_url, "http://localhost:9000");
                assert_eq!(settings.timeout, Duration::from_secs(5));
            }
            other => panic!("expected sync, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_validate_with_global_verbose() {
        let cli = Cli::try_parse_from(["alerts", "validate", "alerts.yaml", "-v"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(
            cli.command,
            Some(Commands::Validate {
                config: PathBuf::from("alerts.yaml"),
            })
        );
    }

    #[test]
    fn test_blank_api_key_rejected() {
        let args = ApiArgs {
            api_key: Some("  ".to_string()),
            api_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        };
        assert!(matches!(args.settings(), Err(CliError::User { .. })));
    }
}
