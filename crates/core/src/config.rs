//! Runtime configuration shared by every hook.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

const WORKFLOW_DIR: &str = "workflows";
const LOG_FILE: &[&str] = &["docs", "testing", "hook-log.md"];

/// Default upper bound on a single webhook delivery.
pub const DEFAULT_WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// Runtime configuration for one hook invocation.
///
/// Built once by the caller and passed by reference; nothing here is read from
/// process-wide state after construction.
#[derive(Debug, Clone)]
pub struct Config {
    /// Project root. Relative paths handed to the hooks resolve against it.
    pub root: PathBuf,
    /// Files under this directory must contain valid JSON.
    pub workflow_dir: PathBuf,
    /// Append-only Markdown log of edit events.
    pub log_file: PathBuf,
    /// Run-summary webhook; `None` disables notification.
    pub webhook_url: Option<String>,
    pub webhook_timeout: Duration,
}

impl Config {
    /// Configuration with the default layout beneath `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let workflow_dir = root.join(WORKFLOW_DIR);
        let log_file = LOG_FILE.iter().fold(root.clone(), |p, part| p.join(part));
        Self {
            root,
            workflow_dir,
            log_file,
            webhook_url: None,
            webhook_timeout: DEFAULT_WEBHOOK_TIMEOUT,
        }
    }

    /// Configuration rooted at the current working directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoRoot` if the working directory cannot be read.
    pub fn from_cwd() -> Result<Self, ConfigError> {
        std::env::current_dir()
            .map(Self::new)
            .map_err(ConfigError::NoRoot)
    }

    #[must_use]
    pub fn with_workflow_dir(mut self, dir: &Path) -> Self {
        self.workflow_dir = self.resolve(dir);
        self
    }

    #[must_use]
    pub fn with_log_file(mut self, file: &Path) -> Self {
        self.log_file = self.resolve(file);
        self
    }

    /// Set the webhook URL. Blank values leave notification disabled.
    #[must_use]
    pub fn with_webhook_url(mut self, url: Option<String>) -> Self {
        self.webhook_url = url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());
        self
    }

    #[must_use]
    pub const fn with_webhook_timeout(mut self, timeout: Duration) -> Self {
        self.webhook_timeout = timeout;
        self
    }

    /// Resolve `path` against the project root (absolute paths pass through).
    #[must_use]
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Component-wise prefix match against the workflow directory.
    #[must_use]
    pub fn is_workflow_file(&self, path: &Path) -> bool {
        self.resolve(path).starts_with(&self.workflow_dir)
    }

    /// Path relative to the root for log messages, or the resolved path if it
    /// lies outside the root.
    #[must_use]
    pub fn display_path(&self, path: &Path) -> String {
        let resolved = self.resolve(path);
        resolved
            .strip_prefix(&self.root)
            .unwrap_or(&resolved)
            .display()
            .to_string()
    }
}
