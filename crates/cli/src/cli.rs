//! CLI argument parsing.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use hookgate_core::config::DEFAULT_WEBHOOK_TIMEOUT;
use hookgate_core::{Config, ConfigError};
use tracing::warn;

fn timeout_in_range(s: &str) -> Result<Duration, String> {
    let secs: u64 = s.trim().parse().map_err(|e| format!("{e}"))?;
    if (1..=300).contains(&secs) {
        Ok(Duration::from_secs(secs))
    } else {
        Err(format!("webhook timeout must be between 1 and 300 seconds, got {secs}"))
    }
}

/// Resolve the notifier timeout; an invalid value falls back to the default.
#[must_use]
pub fn webhook_timeout(raw: Option<&str>) -> Duration {
    let Some(raw) = raw else {
        return DEFAULT_WEBHOOK_TIMEOUT;
    };
    timeout_in_range(raw).unwrap_or_else(|e| {
        warn!(%e, default = ?DEFAULT_WEBHOOK_TIMEOUT, "invalid webhook timeout, using default");
        DEFAULT_WEBHOOK_TIMEOUT
    })
}

/// Options go before the subcommand; everything after `before-command` is
/// the proposed command.
#[derive(Parser)]
#[command(name = "hookgate", about = "Lifecycle hooks for agent-driven editors")]
pub struct Cli {
    /// Project root (defaults to the current directory)
    #[arg(long, env = "HOOKGATE_ROOT")]
    pub root: Option<PathBuf>,

    /// Directory whose files must hold valid JSON (relative to the root)
    #[arg(long, env = "HOOKGATE_WORKFLOW_DIR")]
    pub workflow_dir: Option<PathBuf>,

    /// Append-only edit log (relative to the root)
    #[arg(long, env = "HOOKGATE_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Build the runtime configuration from flags and environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoRoot` if no root was given and the current
    /// directory cannot be read.
    pub fn config(&self) -> Result<Config, ConfigError> {
        let mut config = match self.root {
            Some(ref root) => Config::new(root),
            None => Config::from_cwd()?,
        };
        if let Some(ref dir) = self.workflow_dir {
            config = config.with_workflow_dir(dir);
        }
        if let Some(ref file) = self.log_file {
            config = config.with_log_file(file);
        }
        Ok(config)
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate workflow JSON and log the edit; exit 1 if the file is malformed
    AfterEdit {
        /// Edited file
        file: Option<PathBuf>,
    },
    /// Exit 1 if the proposed shell command matches a deny rule
    #[command(disable_help_flag = true)]
    BeforeCommand {
        /// Proposed command, as one or more words
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, num_args = 0..)]
        command: Vec<String>,
    },
    /// Post a run summary to the webhook
    OnFinish {
        /// JSON payload describing the finished run
        payload: Option<PathBuf>,

        /// Webhook receiving run summaries; unset disables notification
        #[arg(long, env = "SLACK_WEBHOOK_URL", hide_env_values = true)]
        webhook_url: Option<String>,

        /// Webhook delivery timeout in seconds (1–300, default 10)
        #[arg(long, env = "HOOKGATE_WEBHOOK_TIMEOUT")]
        webhook_timeout: Option<String>,
    },
}
