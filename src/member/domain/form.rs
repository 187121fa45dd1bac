//! Raw registration form input.

/// Unvalidated field values exactly as submitted on the registration form.
///
/// The level is the raw selection; an empty string is the form's unselected
/// option. Converting into [`super::MemberDetails`] performs validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    /// Full name.
    pub name: String,
    /// Student identifier; may be left blank.
    pub student_id: String,
    /// Academic index number.
    pub index_number: String,
    /// Contact phone number.
    pub phone: String,
    /// Place of residence.
    pub residence: String,
    /// Email address.
    pub email: String,
    /// Course of study.
    pub course: String,
    /// Level selection (`100`, `200`, `300`, `400`, `Graduate` or blank).
    pub level: String,
}
