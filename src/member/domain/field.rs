//! Names of the registration form fields.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A registration form field that must not be left blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequiredField {
    /// The member's full name.
    Name,
    /// The academic index number.
    IndexNumber,
    /// The contact phone number.
    Phone,
    /// The place of residence.
    Residence,
    /// The email address used as the unique key.
    Email,
    /// The course of study.
    Course,
    /// The academic level.
    Level,
}

impl RequiredField {
    /// Every required field in form order.
    pub const ALL: [Self; 7] = [
        Self::Name,
        Self::IndexNumber,
        Self::Phone,
        Self::Residence,
        Self::Email,
        Self::Course,
        Self::Level,
    ];

    /// Returns the label shown on the registration form.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Full Name",
            Self::IndexNumber => "Index Number",
            Self::Phone => "Phone Number",
            Self::Residence => "Place of Residence",
            Self::Email => "Gmail Address",
            Self::Course => "Course",
            Self::Level => "Level",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Trims a raw form value and rejects it when nothing is left.
///
/// # Errors
///
/// Returns [`super::MemberDomainError::MissingField`] naming `field` when the
/// trimmed value is empty.
pub(crate) fn required(
    field: RequiredField,
    raw: impl Into<String>,
) -> Result<String, super::MemberDomainError> {
    let value = raw.into().trim().to_owned();
    if value.is_empty() {
        return Err(super::MemberDomainError::MissingField(field));
    }
    Ok(value)
}
