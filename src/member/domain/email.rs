//! Normalized email address type.

use super::{MemberDomainError, RequiredField, field::required};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized email address, the unique key of a member record.
///
/// Addresses are trimmed and lowercased so that `Ama@Example.com` and
/// `ama@example.com` collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a normalized email address.
    ///
    /// Any non-blank value is accepted; no address shape is enforced.
    ///
    /// # Errors
    ///
    /// Returns [`MemberDomainError::MissingField`] when the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, MemberDomainError> {
        let trimmed = required(RequiredField::Email, value)?;
        Ok(Self(trimmed.to_lowercase()))
    }

    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
