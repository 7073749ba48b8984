//! Deny rules for proposed shell commands.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::RuleError;

const RISKY_PATTERNS: &[&str] = &[
    // recursive force-delete of `.` or `..`
    r"rm\s+-rf\s+\.\.?",
    // reading any .env file
    r"cat\s+.*\.env",
];

const FORBIDDEN_SUBSTRINGS: &[&str] = &["rm -rf", "cat .env", "grep", "sed", "awk"];

static BUILTIN: LazyLock<DenyList> = LazyLock::new(|| {
    let regexes = RISKY_PATTERNS.iter().map(|p| {
        DenyRule::regex(p).expect("builtin deny patterns should compile")
    });
    let substrings = FORBIDDEN_SUBSTRINGS.iter().map(|s| DenyRule::substring(*s));
    DenyList::new(regexes.chain(substrings).collect())
});

/// A single pattern whose match rejects a command.
#[derive(Debug, Clone)]
pub enum DenyRule {
    /// Case-sensitive literal substring.
    Substring(String),
    Regex(Regex),
}

impl DenyRule {
    #[must_use]
    pub fn substring(needle: impl Into<String>) -> Self {
        Self::Substring(needle.into())
    }

    /// # Errors
    ///
    /// Returns `RuleError::Regex` if `pattern` is not a valid regular expression.
    pub fn regex(pattern: &str) -> Result<Self, RuleError> {
        Regex::new(pattern)
            .map(Self::Regex)
            .map_err(|source| RuleError::Regex {
                pattern: pattern.to_string(),
                source,
            })
    }

    #[must_use]
    pub fn matches(&self, command: &str) -> bool {
        match self {
            Self::Substring(needle) => command.contains(needle.as_str()),
            Self::Regex(re) => re.is_match(command),
        }
    }
}

impl fmt::Display for DenyRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Substring(needle) => write!(f, "substring `{needle}`"),
            Self::Regex(re) => write!(f, "regex `{}`", re.as_str()),
        }
    }
}

/// Outcome of checking one command against a [`DenyList`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandCheck {
    pub command: String,
    pub blocked: bool,
    /// Description of the first rule that matched.
    pub matched_rule: Option<String>,
}

/// Ordered list of deny rules. The first match wins.
#[derive(Debug, Clone)]
pub struct DenyList {
    rules: Vec<DenyRule>,
}

impl DenyList {
    #[must_use]
    pub const fn new(rules: Vec<DenyRule>) -> Self {
        Self { rules }
    }

    /// Built-in rules: risky-shape regexes first, then forbidden substrings.
    #[must_use]
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    #[must_use]
    pub fn rules(&self) -> &[DenyRule] {
        &self.rules
    }

    #[must_use]
    pub fn first_match(&self, command: &str) -> Option<&DenyRule> {
        self.rules.iter().find(|rule| rule.matches(command))
    }

    #[must_use]
    pub fn check(&self, command: &str) -> CommandCheck {
        let matched = self.first_match(command);
        if let Some(rule) = matched {
            debug!(%rule, "deny rule matched");
        }
        CommandCheck {
            command: command.to_string(),
            blocked: matched.is_some(),
            matched_rule: matched.map(ToString::to_string),
        }
    }
}
