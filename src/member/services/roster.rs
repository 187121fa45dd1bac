//! Service layer for the administrator record browser.
//!
//! Every operation takes the caller's [`AdminSession`] and fails with
//! [`AdminError::NotAuthenticated`] unless it is logged in.

use super::admin::{AdminError, AdminSession};
use crate::member::{
    domain::{
        CourseLevelGroup, EmailAddress, Level, LevelShare, MemberDetails, MemberDomainError,
        MemberRecord, RegistrationForm, Roster, Tally,
    },
    ports::{MemberRepository, MemberRepositoryError},
};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Service-level errors for roster operations.
#[derive(Debug, Error)]
pub enum RosterServiceError {
    /// The session is not allowed to perform the operation.
    #[error(transparent)]
    Admin(#[from] AdminError),
    /// Input validation failed.
    #[error(transparent)]
    Domain(#[from] MemberDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] MemberRepositoryError),
    /// No record carries the given name.
    #[error("no member named '{0}'")]
    NoMemberNamed(String),
}

/// Result type for roster service operations.
pub type RosterServiceResult<T> = Result<T, RosterServiceError>;

/// Everything the administrator dashboard shows for one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterReport {
    /// Query the report was built for; empty means unfiltered.
    pub query: String,
    /// Matching records in registration order.
    pub roster: Roster,
    /// Matching records grouped by course and level.
    pub groups: Vec<CourseLevelGroup>,
    /// Matching records per course.
    pub course_counts: Vec<Tally<String>>,
    /// Matching records per level.
    pub level_counts: Vec<Tally<Level>>,
    /// Level proportions of the matching records.
    pub level_shares: Vec<LevelShare>,
}

impl RosterReport {
    /// Builds a report from an already filtered roster.
    #[must_use]
    pub fn new(query: impl Into<String>, roster: Roster) -> Self {
        Self {
            query: query.into(),
            groups: roster.groups(),
            course_counts: roster.course_counts(),
            level_counts: roster.level_counts(),
            level_shares: roster.level_shares(),
            roster,
        }
    }
}

/// Administrator record browser.
pub struct RosterService<R>
where
    R: MemberRepository,
{
    repository: Arc<R>,
}

impl<R> RosterService<R>
where
    R: MemberRepository,
{
    /// Creates a new roster service.
    #[must_use]
    pub const fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Loads the roster filtered by `query`.
    ///
    /// # Errors
    ///
    /// Returns [`RosterServiceError::Admin`] for an unauthenticated session or
    /// [`RosterServiceError::Repository`] when storage cannot be read.
    pub async fn filtered(
        &self,
        session: &AdminSession,
        query: &str,
    ) -> RosterServiceResult<Roster> {
        session.ensure_authenticated()?;
        let roster = Roster::new(self.repository.list_all().await?);
        Ok(roster.filter(query))
    }

    /// Builds the dashboard report for `query`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::filtered`].
    pub async fn browse(
        &self,
        session: &AdminSession,
        query: &str,
    ) -> RosterServiceResult<RosterReport> {
        let roster = self.filtered(session, query).await?;
        Ok(RosterReport::new(query, roster))
    }

    /// Removes the record registered under `email`.
    ///
    /// # Errors
    ///
    /// Returns [`RosterServiceError::Repository`] with
    /// [`MemberRepositoryError::NotFound`] when nothing is registered under
    /// the email.
    pub async fn remove_by_email(
        &self,
        session: &AdminSession,
        email: &str,
    ) -> RosterServiceResult<MemberRecord> {
        session.ensure_authenticated()?;
        let address = EmailAddress::new(email)?;
        let removed = self
            .repository
            .remove_by_email(&address)
            .await?
            .ok_or(MemberRepositoryError::NotFound(address))?;
        info!(email = %removed.email(), "member removed");
        Ok(removed)
    }

    /// Removes every record whose name is exactly `name`.
    ///
    /// # Errors
    ///
    /// Returns [`RosterServiceError::NoMemberNamed`] when no record matches.
    pub async fn remove_by_name(
        &self,
        session: &AdminSession,
        name: &str,
    ) -> RosterServiceResult<Vec<MemberRecord>> {
        session.ensure_authenticated()?;
        let removed = self.repository.remove_by_name(name.trim()).await?;
        if removed.is_empty() {
            return Err(RosterServiceError::NoMemberNamed(name.to_owned()));
        }
        info!(name, count = removed.len(), "members removed by name");
        Ok(removed)
    }

    /// Replaces every field of the record registered under `original_email`.
    ///
    /// The original registration timestamp is kept.
    ///
    /// # Errors
    ///
    /// Returns [`RosterServiceError::Domain`] when the form is invalid, or
    /// [`RosterServiceError::Repository`] with `NotFound` for an unknown
    /// original email or `DuplicateEmail` when the new email belongs to
    /// another record.
    pub async fn edit(
        &self,
        session: &AdminSession,
        original_email: &str,
        form: RegistrationForm,
    ) -> RosterServiceResult<MemberRecord> {
        session.ensure_authenticated()?;
        let original = EmailAddress::new(original_email)?;
        let details = MemberDetails::try_from(form)?;

        let mut record = self
            .repository
            .find_by_email(&original)
            .await?
            .ok_or_else(|| MemberRepositoryError::NotFound(original.clone()))?;

        if details.email() != &original
            && self
                .repository
                .find_by_email(details.email())
                .await?
                .is_some()
        {
            return Err(MemberRepositoryError::DuplicateEmail(details.email().clone()).into());
        }

        record.replace_details(details);
        self.repository.replace(&original, &record).await?;
        info!(original = %original, email = %record.email(), "member edited");
        Ok(record)
    }
}
