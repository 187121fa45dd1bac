//! In-memory adapters for member registration.

mod mirror;
mod repository;

pub use mirror::InMemoryRosterMirror;
pub use repository::InMemoryMemberRepository;
