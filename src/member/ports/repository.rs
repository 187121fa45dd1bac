//! Repository port for member record persistence.

use crate::member::domain::{EmailAddress, MemberRecord};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for member repository operations.
pub type MemberRepositoryResult<T> = Result<T, MemberRepositoryError>;

/// Member record persistence contract.
///
/// Implementations list records in registration order.
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Stores a new member record.
    ///
    /// # Errors
    ///
    /// Returns [`MemberRepositoryError::DuplicateEmail`] when the email is
    /// already registered.
    async fn insert(&self, record: &MemberRecord) -> MemberRepositoryResult<()>;

    /// Replaces the record currently keyed by `original` with `record`.
    ///
    /// The record keeps its position in registration order.
    ///
    /// # Errors
    ///
    /// Returns [`MemberRepositoryError::NotFound`] when no record has the
    /// original email, or [`MemberRepositoryError::DuplicateEmail`] when the
    /// new email belongs to another record.
    async fn replace(
        &self,
        original: &EmailAddress,
        record: &MemberRecord,
    ) -> MemberRepositoryResult<()>;

    /// Finds a member record by email.
    ///
    /// Returns `None` when no record has the given email.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> MemberRepositoryResult<Option<MemberRecord>>;

    /// Returns every record in registration order.
    async fn list_all(&self) -> MemberRepositoryResult<Vec<MemberRecord>>;

    /// Removes the record with the given email, returning it.
    ///
    /// Returns `None` when no record has the given email.
    async fn remove_by_email(
        &self,
        email: &EmailAddress,
    ) -> MemberRepositoryResult<Option<MemberRecord>>;

    /// Removes every record whose name equals `name`, returning them.
    async fn remove_by_name(&self, name: &str) -> MemberRepositoryResult<Vec<MemberRecord>>;
}

/// Errors returned by member repository implementations.
#[derive(Debug, Clone, Error)]
pub enum MemberRepositoryError {
    /// A record with the same email already exists.
    #[error("duplicate registration for email: {0}")]
    DuplicateEmail(EmailAddress),

    /// No record has the given email.
    #[error("member not found: {0}")]
    NotFound(EmailAddress),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl MemberRepositoryError {
    /// Wraps a data-quality or deserialization error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
