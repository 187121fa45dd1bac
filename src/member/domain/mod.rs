//! Domain model for member registration.
//!
//! The member domain models registration form validation, the record
//! aggregate with its registration timestamp, and the read-side roster used
//! by administrators. All infrastructure concerns are kept outside the domain
//! boundary.

mod email;
mod error;
mod field;
mod form;
mod level;
mod record;
mod roster;

pub use email::EmailAddress;
pub use error::{MemberDomainError, ParseLevelError};
pub use field::RequiredField;
pub use form::RegistrationForm;
pub use level::Level;
pub use record::{MemberDetails, MemberRecord, TIMESTAMP_FORMAT, parse_timestamp};
pub use roster::{CourseLevelGroup, LevelShare, Roster, Tally};
