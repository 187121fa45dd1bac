//! Application services for member registration and administration.

mod admin;
mod registration;
mod roster;

pub use admin::{AdminCredential, AdminError, AdminSession};
pub use registration::{
    ImportEntry, ImportSummary, RegistrationService, RegistrationServiceError,
    RegistrationServiceResult, SkippedEntry,
};
pub use roster::{RosterReport, RosterService, RosterServiceError, RosterServiceResult};
