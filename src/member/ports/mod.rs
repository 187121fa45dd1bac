//! Port contracts for member registration.
//!
//! Ports define infrastructure-agnostic interfaces used by the registration
//! and roster services.

pub mod mirror;
pub mod notifier;
pub mod repository;

pub use mirror::{RosterMirror, RosterMirrorError};
pub use notifier::{NotificationError, RegistrationNotifier};
pub use repository::{MemberRepository, MemberRepositoryError, MemberRepositoryResult};
