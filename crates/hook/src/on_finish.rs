//! `stop` hook: post a run summary to a webhook.
//!
//! Delivery is one bounded request with no retry. The outcome is returned to
//! the caller, which logs it; a failed delivery never fails the agent run.

use std::path::Path;
use std::time::Duration;

use eyre::WrapErr;
use hookgate_core::Config;
use serde::Serialize;
use tracing::{debug, info, instrument};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const NO_FILES: &str = "None";

/// The finished run, as handed over by the editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunPayload {
    pub modified_files: Vec<String>,
}

impl RunPayload {
    /// Extract `modifiedFiles`. Missing or non-array values yield an empty list;
    /// non-string entries keep their JSON text.
    #[must_use]
    pub fn from_value(value: &serde_json::Value) -> Self {
        let modified_files = value
            .get("modifiedFiles")
            .and_then(serde_json::Value::as_array)
            .map(|files| {
                files
                    .iter()
                    .map(|f| f.as_str().map_or_else(|| f.to_string(), str::to_string))
                    .collect()
            })
            .unwrap_or_default();
        Self { modified_files }
    }

    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn read(path: &Path) -> hookgate_core::Result<Self> {
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("cannot read payload {}", path.display()))?;
        let value: serde_json::Value = serde_json::from_str(&content)
            .wrap_err_with(|| format!("invalid payload JSON in {}", path.display()))?;
        Ok(Self::from_value(&value))
    }

    #[must_use]
    pub fn message(&self) -> Message {
        let files = if self.modified_files.is_empty() {
            NO_FILES.to_string()
        } else {
            self.modified_files
                .iter()
                .map(|f| format!("• {f}"))
                .collect::<Vec<_>>()
                .join("\n")
        };
        Message {
            text: format!("Agent run complete.\nModified files:\n{files}"),
        }
    }
}

/// Webhook body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub text: String,
}

/// A completed delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    pub status: u16,
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("webhook did not answer within {0:?}")]
    Timeout(Duration),
    #[error("webhook returned HTTP {0}")]
    Status(u16),
    #[error("webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("cannot start HTTP runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

#[derive(Debug)]
pub enum NotifyOutcome {
    /// Payload path or webhook URL missing.
    Skipped,
    Delivered(Delivery),
    Failed(NotifyError),
}

/// POST `message` to `url`, giving up after `timeout`.
///
/// # Errors
///
/// Returns `NotifyError::Timeout` when the deadline passes, `Status` for a
/// non-2xx answer and `Transport` for connection-level failures.
#[instrument(skip(url, message))]
pub async fn send(url: &str, message: &Message, timeout: Duration) -> Result<Delivery, NotifyError> {
    let client = reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT.min(timeout))
        .build()?;

    let request = client.post(url).json(message).send();
    let response = tokio::time::timeout(timeout, request)
        .await
        .map_err(|_| NotifyError::Timeout(timeout))??;

    let status = response.status();
    debug!(%status, "webhook answered");
    if status.is_success() {
        Ok(Delivery {
            status: status.as_u16(),
        })
    } else {
        Err(NotifyError::Status(status.as_u16()))
    }
}

/// Blocking wrapper around [`send`] on a dedicated current-thread runtime.
///
/// # Errors
///
/// Same as [`send`], plus `NotifyError::Runtime` if the runtime cannot be built.
pub fn send_blocking(url: &str, message: &Message, timeout: Duration) -> Result<Delivery, NotifyError> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_io()
        .enable_time()
        .build()
        .map_err(NotifyError::Runtime)?;
    rt.block_on(send(url, message, timeout))
}

/// Process a run-finished event.
///
/// # Errors
///
/// Returns an error if the payload cannot be read or parsed. Delivery failures
/// are reported through `NotifyOutcome::Failed` instead.
#[instrument(skip(config))]
pub fn process(payload: Option<&Path>, config: &Config) -> hookgate_core::Result<NotifyOutcome> {
    let (Some(payload), Some(url)) = (payload, config.webhook_url.as_deref()) else {
        debug!("payload path or webhook URL missing, skipping");
        return Ok(NotifyOutcome::Skipped);
    };

    let run = RunPayload::read(&config.resolve(payload))?;
    let message = run.message();
    debug!(files = run.modified_files.len(), "sending run summary");

    Ok(match send_blocking(url, &message, config.webhook_timeout) {
        Ok(delivery) => {
            info!(status = delivery.status, "run summary delivered");
            NotifyOutcome::Delivered(delivery)
        }
        Err(e) => {
            debug!(%e, "run summary not delivered");
            NotifyOutcome::Failed(e)
        }
    })
}
