//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent malformed input or lookups outside the known data.
/// These are independent of I/O and configuration concerns.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("invalid tree at '{path}': {reason}")]
    InvalidTree { path: String, reason: String },

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("invalid output range: [{start}, {end}]")]
    InvalidRange { start: f64, end: f64 },

    #[error("invalid value: {0}")]
    InvalidValue(f64),
}

impl DomainError {
    pub fn invalid_tree(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTree {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
