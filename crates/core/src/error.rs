pub type Result<T> = eyre::Result<T>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot determine project root: {0}")]
    NoRoot(#[source] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("invalid deny pattern `{pattern}`: {source}")]
    Regex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
