//! Error types for member domain validation and parsing.

use super::RequiredField;
use thiserror::Error;

/// Errors returned while constructing member domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MemberDomainError {
    /// A required form field is empty after trimming.
    #[error("required field is empty: {0}")]
    MissingField(RequiredField),

    /// The level selection is not one of the enumerated levels.
    #[error(transparent)]
    InvalidLevel(#[from] ParseLevelError),
}

/// Error returned while parsing a level from form input or persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown level: {0} (expected 100, 200, 300, 400 or Graduate)")]
pub struct ParseLevelError(pub String);
