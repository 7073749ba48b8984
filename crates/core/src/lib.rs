//! Core pieces shared by the hooks: configuration, deny rules, edit log.
//! No async, no network.

pub mod config;
pub mod edit_log;
pub mod error;
pub mod rules;

pub use config::Config;
pub use edit_log::EditLog;
pub use error::{ConfigError, Result, RuleError};
pub use rules::{CommandCheck, DenyList, DenyRule};

/// Binary decision a gating hook hands back to the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    Reject,
}

impl Verdict {
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}
