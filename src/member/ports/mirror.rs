//! Port for the derived flat-file copy of the roster.

use crate::member::domain::MemberRecord;
use std::sync::Arc;
use thiserror::Error;

/// Writes a complete snapshot of the roster to secondary storage.
///
/// The relational store is the source of truth; a mirror is regenerated from
/// it after every mutation and never read back during normal operation.
pub trait RosterMirror: Send + Sync {
    /// Replaces the mirrored copy with `records`.
    ///
    /// # Errors
    ///
    /// Returns [`RosterMirrorError`] when the snapshot cannot be written.
    fn write_snapshot(&self, records: &[MemberRecord]) -> Result<(), RosterMirrorError>;
}

/// Errors returned while writing a roster snapshot.
#[derive(Debug, Clone, Error)]
pub enum RosterMirrorError {
    /// The snapshot could not be encoded.
    #[error("roster encoding failed: {0}")]
    Encoding(Arc<dyn std::error::Error + Send + Sync>),

    /// The snapshot could not be written.
    #[error("roster write failed: {0}")]
    Io(Arc<std::io::Error>),
}

impl From<std::io::Error> for RosterMirrorError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(Arc::new(err))
    }
}

impl From<csv::Error> for RosterMirrorError {
    fn from(err: csv::Error) -> Self {
        Self::Encoding(Arc::new(err))
    }
}
