//! In-memory member repository for tests and dry runs.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::member::{
    domain::{EmailAddress, MemberRecord},
    ports::{MemberRepository, MemberRepositoryError, MemberRepositoryResult},
};

/// Thread-safe in-memory member repository.
///
/// Records are kept in a vector so listing preserves insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMemberRepository {
    records: Arc<RwLock<Vec<MemberRecord>>>,
}

impl InMemoryMemberRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> MemberRepositoryError {
    MemberRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl MemberRepository for InMemoryMemberRepository {
    async fn insert(&self, record: &MemberRecord) -> MemberRepositoryResult<()> {
        let mut records = self.records.write().map_err(lock_error)?;
        if records.iter().any(|existing| existing.email() == record.email()) {
            return Err(MemberRepositoryError::DuplicateEmail(record.email().clone()));
        }
        records.push(record.clone());
        Ok(())
    }

    async fn replace(
        &self,
        original: &EmailAddress,
        record: &MemberRecord,
    ) -> MemberRepositoryResult<()> {
        let mut records = self.records.write().map_err(lock_error)?;

        if record.email() != original
            && records.iter().any(|existing| existing.email() == record.email())
        {
            return Err(MemberRepositoryError::DuplicateEmail(record.email().clone()));
        }

        let slot = records
            .iter_mut()
            .find(|existing| existing.email() == original)
            .ok_or_else(|| MemberRepositoryError::NotFound(original.clone()))?;
        *slot = record.clone();
        Ok(())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> MemberRepositoryResult<Option<MemberRecord>> {
        let records = self.records.read().map_err(lock_error)?;
        Ok(records.iter().find(|record| record.email() == email).cloned())
    }

    async fn list_all(&self) -> MemberRepositoryResult<Vec<MemberRecord>> {
        let records = self.records.read().map_err(lock_error)?;
        Ok(records.clone())
    }

    async fn remove_by_email(
        &self,
        email: &EmailAddress,
    ) -> MemberRepositoryResult<Option<MemberRecord>> {
        let mut records = self.records.write().map_err(lock_error)?;
        let position = records.iter().position(|record| record.email() == email);
        Ok(position.map(|index| records.remove(index)))
    }

    async fn remove_by_name(&self, name: &str) -> MemberRepositoryResult<Vec<MemberRecord>> {
        let mut records = self.records.write().map_err(lock_error)?;
        let (removed, kept): (Vec<MemberRecord>, Vec<MemberRecord>) = records
            .drain(..)
            .partition(|record| record.details().name() == name);
        *records = kept;
        Ok(removed)
    }
}
