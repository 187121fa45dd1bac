//! In-memory roster mirror that keeps the latest snapshot.

use std::sync::{Arc, RwLock};

use crate::member::{
    domain::MemberRecord,
    ports::{RosterMirror, RosterMirrorError},
};

/// Roster mirror holding the most recent snapshot in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRosterMirror {
    snapshot: Arc<RwLock<Vec<MemberRecord>>>,
}

impl InMemoryRosterMirror {
    /// Creates a mirror with an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the last written snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Vec<MemberRecord> {
        self.snapshot
            .read()
            .map(|records| records.clone())
            .unwrap_or_default()
    }
}

impl RosterMirror for InMemoryRosterMirror {
    fn write_snapshot(&self, records: &[MemberRecord]) -> Result<(), RosterMirrorError> {
        let mut snapshot = self
            .snapshot
            .write()
            .map_err(|err| std::io::Error::other(err.to_string()))?;
        records.clone_into(&mut *snapshot);
        Ok(())
    }
}
