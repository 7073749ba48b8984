//! `afterFileEdit` hook: validate workflow files, log every edit.

use std::path::Path;

use eyre::WrapErr;
use hookgate_core::{Config, EditLog, Verdict};
use tracing::{debug, instrument};

/// Result of validating a workflow file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Passed,
    Failed(String),
}

/// One edit, as recorded in the edit log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditEvent {
    pub file_path: String,
    pub is_workflow_file: bool,
    /// Present only for workflow files.
    pub validation: Option<Validation>,
}

impl EditEvent {
    /// Build the event for `file`, reading and parsing it when it is a workflow file.
    #[must_use]
    pub fn inspect(file: &Path, config: &Config) -> Self {
        let is_workflow_file = config.is_workflow_file(file);
        let validation = is_workflow_file.then(|| validate_json(&config.resolve(file)));
        let file_path = match validation {
            Some(Validation::Failed(_)) => file.display().to_string(),
            _ => config.display_path(file),
        };
        Self {
            file_path,
            is_workflow_file,
            validation,
        }
    }

    /// Log line body for this event.
    #[must_use]
    pub fn message(&self) -> String {
        match &self.validation {
            None => format!("Edited file: {}", self.file_path),
            Some(Validation::Passed) => format!("Validated JSON: {}", self.file_path),
            Some(Validation::Failed(err)) => {
                format!("JSON validation failed for {}: {err}", self.file_path)
            }
        }
    }

    #[must_use]
    pub const fn verdict(&self) -> Verdict {
        match self.validation {
            Some(Validation::Failed(_)) => Verdict::Reject,
            _ => Verdict::Allow,
        }
    }
}

fn validate_json(path: &Path) -> Validation {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => return Validation::Failed(e.to_string()),
    };
    match serde_json::from_str::<serde_json::Value>(&content) {
        Ok(_) => Validation::Passed,
        Err(e) => Validation::Failed(e.to_string()),
    }
}

/// Process an edit event. `None` means the editor passed no file: nothing to do.
///
/// # Errors
///
/// Returns an error if the edit log cannot be created or appended to.
#[instrument(skip(config), fields(workflow))]
pub fn process(file: Option<&Path>, config: &Config) -> hookgate_core::Result<Verdict> {
    let Some(file) = file else {
        debug!("no file path given, skipping");
        return Ok(Verdict::Allow);
    };

    let log = EditLog::open(&config.log_file)
        .wrap_err_with(|| format!("cannot create log directory for {}", config.log_file.display()))?;

    let event = EditEvent::inspect(file, config);
    tracing::Span::current().record("workflow", event.is_workflow_file);

    log.append(&event.message())
        .wrap_err_with(|| format!("cannot append to {}", log.path().display()))?;

    let verdict = event.verdict();
    debug!(file = %event.file_path, allowed = verdict.is_allowed(), "edit processed");
    Ok(verdict)
}
