//! CSV encoding of roster rows.

use crate::member::{
    domain::{MemberRecord, RegistrationForm},
    ports::RosterMirrorError,
};
use serde::{Deserialize, Serialize};
use std::io::Read;

/// Header row of every roster file and export, in column order.
pub const ROSTER_HEADER: [&str; 9] = [
    "Name",
    "Student ID (optional)",
    "Index Number",
    "Phone Number",
    "Residence",
    "Gmail",
    "Course",
    "Level",
    "Timestamp",
];

/// One roster line as text.
///
/// `Student ID` is accepted as an alias so files written before the column
/// was marked optional still load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterRow {
    /// Full name.
    #[serde(rename = "Name")]
    pub name: String,
    /// Student identifier, empty when not given.
    #[serde(rename = "Student ID (optional)", alias = "Student ID", default)]
    pub student_id: String,
    /// Academic index number.
    #[serde(rename = "Index Number")]
    pub index_number: String,
    /// Contact phone number.
    #[serde(rename = "Phone Number")]
    pub phone: String,
    /// Place of residence.
    #[serde(rename = "Residence")]
    pub residence: String,
    /// Email address.
    #[serde(rename = "Gmail")]
    pub email: String,
    /// Course of study.
    #[serde(rename = "Course")]
    pub course: String,
    /// Level selection.
    #[serde(rename = "Level")]
    pub level: String,
    /// Registration timestamp text, empty when unknown.
    #[serde(rename = "Timestamp", default)]
    pub timestamp: String,
}

impl RosterRow {
    /// Splits the row into form input and its timestamp text.
    #[must_use]
    pub fn into_form(self) -> (RegistrationForm, String) {
        let Self {
            name,
            student_id,
            index_number,
            phone,
            residence,
            email,
            course,
            level,
            timestamp,
        } = self;
        let form = RegistrationForm {
            name,
            student_id,
            index_number,
            phone,
            residence,
            email,
            course,
            level,
        };
        (form, timestamp)
    }
}

impl From<&MemberRecord> for RosterRow {
    fn from(record: &MemberRecord) -> Self {
        let details = record.details();
        Self {
            name: details.name().to_owned(),
            student_id: details.student_id().unwrap_or_default().to_owned(),
            index_number: details.index_number().to_owned(),
            phone: details.phone().to_owned(),
            residence: details.residence().to_owned(),
            email: details.email().as_str().to_owned(),
            course: details.course().to_owned(),
            level: details.level().as_str().to_owned(),
            timestamp: record.timestamp_text(),
        }
    }
}

/// Encodes records as CSV, header first, in the order given.
///
/// An empty slice still produces the header line.
///
/// # Errors
///
/// Returns [`RosterMirrorError::Encoding`] when a row cannot be serialized.
pub fn encode_roster(records: &[MemberRecord]) -> Result<Vec<u8>, RosterMirrorError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(ROSTER_HEADER)?;
    for record in records {
        writer.serialize(RosterRow::from(record))?;
    }
    writer
        .into_inner()
        .map_err(|err| RosterMirrorError::from(err.into_error()))
}

/// Decodes roster rows from CSV with a header line.
///
/// # Errors
///
/// Returns [`csv::Error`] when the input is not valid roster CSV.
pub fn decode_roster(input: impl Read) -> Result<Vec<RosterRow>, csv::Error> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(input)
        .deserialize()
        .collect()
}
