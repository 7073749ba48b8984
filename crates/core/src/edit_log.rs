//! Append-only Markdown log of edit events.
//!
//! One bullet per line: `- <ISO-8601 timestamp> - <message>`.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::trace;

pub struct EditLog {
    path: PathBuf,
}

impl EditLog {
    /// Open the log at `path`, creating its parent directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the parent directory cannot be created.
    pub fn open(path: &Path) -> std::io::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the log file cannot be opened or written.
    pub fn append(&self, message: &str) -> std::io::Result<()> {
        self.append_at(Utc::now(), message)
    }

    /// # Errors
    ///
    /// Returns an IO error if the log file cannot be opened or written.
    pub fn append_at(&self, at: DateTime<Utc>, message: &str) -> std::io::Result<()> {
        let entry = format_entry(at, message);
        trace!(path = %self.path.display(), %entry, "appending log entry");
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(entry.as_bytes())
    }
}

/// Render one log line, newline included.
#[must_use]
pub fn format_entry(at: DateTime<Utc>, message: &str) -> String {
    format!(
        "- {} - {message}\n",
        at.to_rfc3339_opts(SecondsFormat::Millis, true)
    )
}
