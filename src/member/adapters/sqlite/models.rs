//! Diesel row models for member persistence.

use super::schema::members;
use diesel::prelude::*;

/// Query result row for member records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = members)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MemberRow {
    /// Auto-increment row identifier.
    pub id: i32,
    /// Full name.
    pub name: String,
    /// Optional student identifier.
    pub student_id: Option<String>,
    /// Academic index number.
    pub index_number: String,
    /// Contact phone number.
    pub phone: String,
    /// Place of residence.
    pub residence: String,
    /// Normalized email address.
    pub gmail: String,
    /// Course of study.
    pub course: String,
    /// Academic level.
    pub level: String,
    /// Registration timestamp text.
    pub timestamp: String,
}

/// Insert and update model for member records.
///
/// `None` in `student_id` clears the column on update.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = members)]
#[diesel(treat_none_as_null = true)]
pub struct NewMemberRow {
    /// Full name.
    pub name: String,
    /// Optional student identifier.
    pub student_id: Option<String>,
    /// Academic index number.
    pub index_number: String,
    /// Contact phone number.
    pub phone: String,
    /// Place of residence.
    pub residence: String,
    /// Normalized email address.
    pub gmail: String,
    /// Course of study.
    pub course: String,
    /// Academic level.
    pub level: String,
    /// Registration timestamp text.
    pub timestamp: String,
}
