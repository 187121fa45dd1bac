//! Diesel schema for member persistence.

diesel::table! {
    /// Registered members; `id` order is registration order.
    members (id) {
        /// Auto-increment row identifier.
        id -> Integer,
        /// Full name.
        name -> Text,
        /// Optional student identifier.
        student_id -> Nullable<Text>,
        /// Academic index number.
        index_number -> Text,
        /// Contact phone number.
        phone -> Text,
        /// Place of residence.
        residence -> Text,
        /// Normalized email address, unique.
        gmail -> Text,
        /// Course of study.
        course -> Text,
        /// Academic level.
        level -> Text,
        /// Registration time in `%Y-%m-%d %H:%M:%S` form.
        timestamp -> Text,
    }
}

/// DDL applied when a database is opened.
pub(super) const CREATE_MEMBERS_TABLE: &str = concat!(
    "CREATE TABLE IF NOT EXISTS members (",
    "id INTEGER PRIMARY KEY AUTOINCREMENT, ",
    "name TEXT NOT NULL, ",
    "student_id TEXT, ",
    "index_number TEXT NOT NULL, ",
    "phone TEXT NOT NULL, ",
    "residence TEXT NOT NULL, ",
    "gmail TEXT NOT NULL UNIQUE, ",
    "course TEXT NOT NULL, ",
    "level TEXT NOT NULL, ",
    "timestamp TEXT NOT NULL",
    ");",
);
