//! Repository decorator that keeps a roster mirror in step with storage.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

use crate::member::{
    domain::{EmailAddress, MemberRecord},
    ports::{MemberRepository, MemberRepositoryResult, RosterMirror},
};

/// Wraps a repository and rewrites the mirror after every mutation.
///
/// The wrapped repository is the source of truth. Mirror failures are logged
/// and never fail the mutation that triggered them.
#[derive(Debug)]
pub struct MirroredMemberRepository<R, M>
where
    R: MemberRepository,
    M: RosterMirror,
{
    inner: Arc<R>,
    mirror: Arc<M>,
}

impl<R, M> Clone for MirroredMemberRepository<R, M>
where
    R: MemberRepository,
    M: RosterMirror,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            mirror: Arc::clone(&self.mirror),
        }
    }
}

impl<R, M> MirroredMemberRepository<R, M>
where
    R: MemberRepository,
    M: RosterMirror,
{
    /// Creates a mirrored repository.
    #[must_use]
    pub const fn new(inner: Arc<R>, mirror: Arc<M>) -> Self {
        Self { inner, mirror }
    }

    /// Returns the wrapped source-of-truth repository.
    #[must_use]
    pub const fn inner(&self) -> &Arc<R> {
        &self.inner
    }

    /// Rewrites the mirror from the current contents of storage.
    ///
    /// # Errors
    ///
    /// Returns the repository error when storage cannot be listed. Mirror
    /// write failures are logged, not returned.
    pub async fn resync(&self) -> MemberRepositoryResult<()> {
        let records = self.inner.list_all().await?;
        if let Err(err) = self.mirror.write_snapshot(&records) {
            warn!(error = %err, "roster mirror could not be written");
        }
        Ok(())
    }

    async fn resync_after(&self, operation: &'static str) {
        if let Err(err) = self.resync().await {
            warn!(operation, error = %err, "roster mirror skipped; storage could not be listed");
        }
    }
}

#[async_trait]
impl<R, M> MemberRepository for MirroredMemberRepository<R, M>
where
    R: MemberRepository,
    M: RosterMirror,
{
    async fn insert(&self, record: &MemberRecord) -> MemberRepositoryResult<()> {
        self.inner.insert(record).await?;
        self.resync_after("insert").await;
        Ok(())
    }

    async fn replace(
        &self,
        original: &EmailAddress,
        record: &MemberRecord,
    ) -> MemberRepositoryResult<()> {
        self.inner.replace(original, record).await?;
        self.resync_after("replace").await;
        Ok(())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> MemberRepositoryResult<Option<MemberRecord>> {
        self.inner.find_by_email(email).await
    }

    async fn list_all(&self) -> MemberRepositoryResult<Vec<MemberRecord>> {
        self.inner.list_all().await
    }

    async fn remove_by_email(
        &self,
        email: &EmailAddress,
    ) -> MemberRepositoryResult<Option<MemberRecord>> {
        let removed = self.inner.remove_by_email(email).await?;
        if removed.is_some() {
            self.resync_after("remove_by_email").await;
        }
        Ok(removed)
    }

    async fn remove_by_name(&self, name: &str) -> MemberRepositoryResult<Vec<MemberRecord>> {
        let removed = self.inner.remove_by_name(name).await?;
        if !removed.is_empty() {
            self.resync_after("remove_by_name").await;
        }
        Ok(removed)
    }
}
