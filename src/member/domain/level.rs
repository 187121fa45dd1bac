//! Academic level of a member.

use super::{MemberDomainError, ParseLevelError, RequiredField};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Academic level selected on the registration form.
///
/// Variants are declared in display order so the derived `Ord` sorts
/// `100` through `400` before `Graduate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Level {
    /// First-year undergraduate.
    #[serde(rename = "100")]
    L100,
    /// Second-year undergraduate.
    #[serde(rename = "200")]
    L200,
    /// Third-year undergraduate.
    #[serde(rename = "300")]
    L300,
    /// Final-year undergraduate.
    #[serde(rename = "400")]
    L400,
    /// Graduate student.
    Graduate,
}

impl Level {
    /// Every selectable level in display order.
    pub const ALL: [Self; 5] = [Self::L100, Self::L200, Self::L300, Self::L400, Self::Graduate];

    /// Returns the canonical form and storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::L100 => "100",
            Self::L200 => "200",
            Self::L300 => "300",
            Self::L400 => "400",
            Self::Graduate => "Graduate",
        }
    }

    /// Parses a form selection, treating the blank option as a missing field.
    ///
    /// # Errors
    ///
    /// Returns [`MemberDomainError::MissingField`] for a blank selection or
    /// [`MemberDomainError::InvalidLevel`] for anything else unrecognised.
    pub fn from_selection(value: &str) -> Result<Self, MemberDomainError> {
        if value.trim().is_empty() {
            return Err(MemberDomainError::MissingField(RequiredField::Level));
        }
        Ok(Self::try_from(value)?)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Level {
    type Error = ParseLevelError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "100" => Ok(Self::L100),
            "200" => Ok(Self::L200),
            "300" => Ok(Self::L300),
            "400" => Ok(Self::L400),
            "graduate" => Ok(Self::Graduate),
            _ => Err(ParseLevelError(value.to_owned())),
        }
    }
}
