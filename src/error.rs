use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("clipboard unavailable: {0}")]
    Clipboard(String),

    #[error("invalid config {path}: {message}")]
    Config { path: String, message: String },

    #[error("terminal error: {0}")]
    Terminal(String),
}

/// Failure reported by a [`crate::query::QueryEvaluator`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("invalid expression `{expr}`: {reason}")]
    Syntax { expr: String, reason: String },

    #[error("no value at `{0}`")]
    NoMatch(String),
}
