use thiserror::Error;

/// Errors that can occur while building a concept matcher.
///
/// Matching itself is total; only configuration can be rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConceptError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
