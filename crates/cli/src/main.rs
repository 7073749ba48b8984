//! hookgate - lifecycle hooks for agent-driven editors.

mod cli;

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use hookgate_core::{Config, DenyList, Verdict};
use hookgate_hook::{after_edit, before_command, on_finish};
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_env("HOOKGATE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    // Fail-closed: any panic exits with failure
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        default_hook(info);
        std::process::exit(1);
    }));

    let cli = cli::Cli::parse();

    match &cli.command {
        cli::Command::BeforeCommand { command } => run_before_command(command),
        cli::Command::AfterEdit { file } => {
            let Some(config) = load_config(&cli) else {
                return ExitCode::FAILURE;
            };
            run_after_edit(&config, file.as_deref())
        }
        cli::Command::OnFinish {
            payload,
            webhook_url,
            webhook_timeout,
        } => {
            let Some(config) = load_config(&cli) else {
                return ExitCode::FAILURE;
            };
            let config = config
                .with_webhook_url(webhook_url.clone())
                .with_webhook_timeout(cli::webhook_timeout(webhook_timeout.as_deref()));
            run_on_finish(&config, payload.as_deref())
        }
    }
}

fn load_config(cli: &cli::Cli) -> Option<Config> {
    match cli.config() {
        Ok(config) => {
            debug!(root = %config.root.display(), "configuration resolved");
            Some(config)
        }
        Err(e) => {
            eprintln!("hookgate: {e}");
            None
        }
    }
}

const fn exit_code(verdict: Verdict) -> ExitCode {
    match verdict {
        Verdict::Allow => ExitCode::SUCCESS,
        Verdict::Reject => ExitCode::FAILURE,
    }
}

fn run_after_edit(config: &Config, file: Option<&Path>) -> ExitCode {
    match after_edit::process(file, config) {
        Ok(verdict) => exit_code(verdict),
        Err(e) => {
            eprintln!("hookgate: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run_before_command(words: &[String]) -> ExitCode {
    let command = before_command::command_line(words);
    let check = before_command::process(&command, DenyList::builtin());

    if check.blocked {
        info!(rule = check.matched_rule.as_deref().unwrap_or("unknown"), "command blocked");
        eprintln!("{}", before_command::blocked_message(&check));
    }
    exit_code(before_command::verdict(&check))
}

fn run_on_finish(config: &Config, payload: Option<&Path>) -> ExitCode {
    match on_finish::process(payload, config) {
        Ok(on_finish::NotifyOutcome::Failed(e)) => {
            // delivery is best-effort; the run itself succeeded
            eprintln!("hookgate: {e}");
            ExitCode::SUCCESS
        }
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("hookgate: {e:#}");
            ExitCode::FAILURE
        }
    }
}
