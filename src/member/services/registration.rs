//! Service layer for member registration intake.
//!
//! Provides [`RegistrationService`] which validates submitted forms, rejects
//! duplicate emails, stores new records and sends a best-effort confirmation.

use crate::member::{
    domain::{MemberDetails, MemberDomainError, MemberRecord, RegistrationForm},
    ports::{MemberRepository, MemberRepositoryError, RegistrationNotifier},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Service-level errors for registration operations.
#[derive(Debug, Error)]
pub enum RegistrationServiceError {
    /// Form validation failed.
    #[error(transparent)]
    Domain(#[from] MemberDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] MemberRepositoryError),
}

impl RegistrationServiceError {
    /// Returns `true` when the email was already registered.
    #[must_use]
    pub const fn is_duplicate(&self) -> bool {
        matches!(
            self,
            Self::Repository(MemberRepositoryError::DuplicateEmail(_))
        )
    }
}

/// Result type for registration service operations.
pub type RegistrationServiceResult<T> = Result<T, RegistrationServiceError>;

/// A previously recorded registration brought in from a roster file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEntry {
    /// Field values as recorded.
    pub form: RegistrationForm,
    /// Original registration time; the clock is used when absent.
    pub registered_at: Option<DateTime<Utc>>,
}

/// One row that an import did not store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    /// One-based position of the entry in the import.
    pub position: usize,
    /// Why the entry was skipped.
    pub reason: String,
}

/// Outcome of importing a batch of registrations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Number of records stored.
    pub imported: usize,
    /// Entries that failed validation or duplicated an existing email.
    pub skipped: Vec<SkippedEntry>,
}

/// Registration intake orchestration service.
pub struct RegistrationService<R, N, C>
where
    R: MemberRepository,
    N: RegistrationNotifier + ?Sized,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    notifier: Arc<N>,
    clock: Arc<C>,
}

impl<R, N, C> RegistrationService<R, N, C>
where
    R: MemberRepository,
    N: RegistrationNotifier + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a new registration service.
    #[must_use]
    pub const fn new(repository: Arc<R>, notifier: Arc<N>, clock: Arc<C>) -> Self {
        Self {
            repository,
            notifier,
            clock,
        }
    }

    /// Registers a member from a submitted form.
    ///
    /// The confirmation is attempted after the record is stored; a failed
    /// confirmation is logged and the registration still succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationServiceError::Domain`] when a required field is
    /// blank or the level is unknown, or
    /// [`RegistrationServiceError::Repository`] with
    /// [`MemberRepositoryError::DuplicateEmail`] when the email is already
    /// registered.
    pub async fn register(
        &self,
        form: RegistrationForm,
    ) -> RegistrationServiceResult<MemberRecord> {
        let details = MemberDetails::try_from(form)?;
        self.ensure_unregistered(&details).await?;

        let record = MemberRecord::new(details, &*self.clock);
        self.repository.insert(&record).await?;
        info!(email = %record.email(), "member registered");

        if let Err(err) = self.notifier.notify_registered(&record).await {
            warn!(email = %record.email(), error = %err, "confirmation could not be sent");
        }
        Ok(record)
    }

    /// Stores previously recorded registrations without notifying anyone.
    ///
    /// Entries that fail validation or repeat a registered email are skipped
    /// and reported; the rest are stored in the order given.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationServiceError::Repository`] when storage fails for
    /// a reason other than a duplicate email.
    pub async fn import(
        &self,
        entries: impl IntoIterator<Item = ImportEntry>,
    ) -> RegistrationServiceResult<ImportSummary> {
        let mut summary = ImportSummary::default();
        for (index, entry) in entries.into_iter().enumerate() {
            let position = index + 1;
            match self.import_one(entry).await {
                Ok(()) => summary.imported += 1,
                Err(err @ (RegistrationServiceError::Domain(_)
                | RegistrationServiceError::Repository(MemberRepositoryError::DuplicateEmail(_)))) => {
                    summary.skipped.push(SkippedEntry {
                        position,
                        reason: err.to_string(),
                    });
                }
                Err(err) => return Err(err),
            }
        }
        info!(
            imported = summary.imported,
            skipped = summary.skipped.len(),
            "roster import finished"
        );
        Ok(summary)
    }

    async fn import_one(&self, entry: ImportEntry) -> RegistrationServiceResult<()> {
        let ImportEntry {
            form,
            registered_at,
        } = entry;
        let details = MemberDetails::try_from(form)?;
        self.ensure_unregistered(&details).await?;
        let record = match registered_at {
            Some(timestamp) => MemberRecord::from_persisted(details, timestamp),
            None => MemberRecord::new(details, &*self.clock),
        };
        self.repository.insert(&record).await?;
        Ok(())
    }

    async fn ensure_unregistered(&self, details: &MemberDetails) -> RegistrationServiceResult<()> {
        if self
            .repository
            .find_by_email(details.email())
            .await?
            .is_some()
        {
            return Err(MemberRepositoryError::DuplicateEmail(details.email().clone()).into());
        }
        Ok(())
    }
}
