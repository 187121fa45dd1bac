//! Member registration aggregate root.

use super::{
    EmailAddress, Level, MemberDomainError, RegistrationForm, RequiredField, field::required,
};
use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Textual form of registration timestamps in the roster file and table.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Validated, editable member details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDetails {
    name: String,
    student_id: Option<String>,
    index_number: String,
    phone: String,
    residence: String,
    email: EmailAddress,
    course: String,
    level: Level,
}

impl MemberDetails {
    /// Returns the member's full name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the optional student identifier.
    #[must_use]
    pub fn student_id(&self) -> Option<&str> {
        self.student_id.as_deref()
    }

    /// Returns the academic index number.
    #[must_use]
    pub fn index_number(&self) -> &str {
        &self.index_number
    }

    /// Returns the contact phone number.
    #[must_use]
    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Returns the place of residence.
    #[must_use]
    pub fn residence(&self) -> &str {
        &self.residence
    }

    /// Returns the unique email address.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the course of study.
    #[must_use]
    pub fn course(&self) -> &str {
        &self.course
    }

    /// Returns the academic level.
    #[must_use]
    pub const fn level(&self) -> Level {
        self.level
    }
}

impl TryFrom<RegistrationForm> for MemberDetails {
    type Error = MemberDomainError;

    /// Validates a submitted form.
    ///
    /// Blank required fields are reported in form order before the level
    /// value is checked.
    fn try_from(form: RegistrationForm) -> Result<Self, Self::Error> {
        let RegistrationForm {
            name: raw_name,
            student_id: raw_student_id,
            index_number: raw_index_number,
            phone: raw_phone,
            residence: raw_residence,
            email: raw_email,
            course: raw_course,
            level: raw_level,
        } = form;

        let name = required(RequiredField::Name, raw_name)?;
        let index_number = required(RequiredField::IndexNumber, raw_index_number)?;
        let phone = required(RequiredField::Phone, raw_phone)?;
        let residence = required(RequiredField::Residence, raw_residence)?;
        let email = required(RequiredField::Email, raw_email)?;
        let course = required(RequiredField::Course, raw_course)?;
        let level = Level::from_selection(&raw_level)?;
        let trimmed_id = raw_student_id.trim();
        let student_id = (!trimmed_id.is_empty()).then(|| trimmed_id.to_owned());

        Ok(Self {
            name,
            student_id,
            index_number,
            phone,
            residence,
            email: EmailAddress::new(email)?,
            course,
            level,
        })
    }
}

/// Member registration aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRecord {
    details: MemberDetails,
    registered_at: DateTime<Utc>,
}

impl MemberRecord {
    /// Creates a record stamped with the current clock time.
    ///
    /// Sub-second precision is dropped so the timestamp survives a round trip
    /// through [`TIMESTAMP_FORMAT`].
    #[must_use]
    pub fn new(details: MemberDetails, clock: &impl Clock) -> Self {
        Self {
            details,
            registered_at: clock.utc().trunc_subsecs(0),
        }
    }

    /// Reconstructs a record from persisted storage.
    #[must_use]
    pub const fn from_persisted(details: MemberDetails, registered_at: DateTime<Utc>) -> Self {
        Self {
            details,
            registered_at,
        }
    }

    /// Returns the member details.
    #[must_use]
    pub const fn details(&self) -> &MemberDetails {
        &self.details
    }

    /// Returns the unique email address.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        self.details.email()
    }

    /// Returns the registration timestamp.
    #[must_use]
    pub const fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }

    /// Returns the registration timestamp in [`TIMESTAMP_FORMAT`].
    #[must_use]
    pub fn timestamp_text(&self) -> String {
        self.registered_at.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Replaces every detail while keeping the original timestamp.
    pub fn replace_details(&mut self, details: MemberDetails) {
        self.details = details;
    }
}

/// Parses a timestamp written in [`TIMESTAMP_FORMAT`] as UTC.
///
/// # Errors
///
/// Returns [`chrono::ParseError`] when the text does not match the format.
pub fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    NaiveDateTime::parse_from_str(text.trim(), TIMESTAMP_FORMAT).map(|naive| naive.and_utc())
}
