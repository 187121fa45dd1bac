//! Application state for one Rollbook process.
//!
//! [`MembershipApp`] owns the registration and roster services together with
//! the administrator session, and every operation goes through it. There is
//! no global state: the command line builds one app with [`open`] and passes
//! it to each handler.

use crate::config::RollbookConfig;
use crate::member::{
    adapters::{
        flat_file::{CsvRosterFile, RosterFileError, RosterRow, encode_roster},
        mirrored::MirroredMemberRepository,
        smtp::{ConfirmationTemplate, DisabledNotifier, SmtpNotifier},
        sqlite::SqliteMemberRepository,
    },
    domain::{MemberRecord, RegistrationForm, parse_timestamp},
    ports::{MemberRepository, MemberRepositoryError, RegistrationNotifier, RosterMirrorError},
    services::{
        AdminCredential, AdminError, AdminSession, ImportEntry, ImportSummary,
        RegistrationService, RegistrationServiceError, RosterReport, RosterService,
        RosterServiceError,
    },
};
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use mockable::{Clock, DefaultClock};
use std::io;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Errors returned by [`MembershipApp`] operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Registration or import failed.
    #[error(transparent)]
    Registration(#[from] RegistrationServiceError),
    /// An administrator operation failed.
    #[error(transparent)]
    Roster(#[from] RosterServiceError),
    /// The session is not allowed to perform the operation.
    #[error(transparent)]
    Admin(#[from] AdminError),
    /// Storage failed outside a service call.
    #[error(transparent)]
    Repository(#[from] MemberRepositoryError),
    /// The export could not be encoded.
    #[error(transparent)]
    Export(#[from] RosterMirrorError),
    /// A roster file could not be read.
    #[error(transparent)]
    RosterFile(#[from] RosterFileError),
    /// The data directory could not be created.
    #[error("failed to prepare data directory {path}: {source}")]
    DataDir {
        /// Directory that failed.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Result type for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Repository used by the installed tool: `SQLite` mirrored to the roster CSV.
pub type RollbookRepository = MirroredMemberRepository<SqliteMemberRepository, CsvRosterFile>;

/// Application wired to the installed adapters.
pub type RollbookApp = MembershipApp<RollbookRepository, dyn RegistrationNotifier, DefaultClock>;

/// Registration intake, record browser and administrator session.
pub struct MembershipApp<R, N, C>
where
    R: MemberRepository,
    N: RegistrationNotifier + ?Sized,
    C: Clock + Send + Sync,
{
    registration: RegistrationService<R, N, C>,
    roster: RosterService<R>,
    session: AdminSession,
}

impl<R, N, C> MembershipApp<R, N, C>
where
    R: MemberRepository,
    N: RegistrationNotifier + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates an app over `repository` with an unauthenticated session.
    #[must_use]
    pub fn new(
        repository: Arc<R>,
        notifier: Arc<N>,
        clock: Arc<C>,
        credential: Option<AdminCredential>,
    ) -> Self {
        Self {
            registration: RegistrationService::new(Arc::clone(&repository), notifier, clock),
            roster: RosterService::new(repository),
            session: AdminSession::new(credential),
        }
    }

    /// Registers a member and sends a best-effort confirmation.
    ///
    /// # Errors
    ///
    /// See [`RegistrationService::register`].
    pub async fn register(&self, form: RegistrationForm) -> AppResult<MemberRecord> {
        Ok(self.registration.register(form).await?)
    }

    /// Authenticates the administrator session.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::IncorrectCredential`] or
    /// [`AdminError::NotConfigured`].
    pub fn login(&mut self, attempt: &str) -> AppResult<()> {
        Ok(self.session.login(attempt)?)
    }

    /// Ends the administrator session.
    pub fn logout(&mut self) {
        self.session.logout();
    }

    /// Returns `true` while the administrator session is authenticated.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Builds the dashboard report for `query`.
    ///
    /// # Errors
    ///
    /// See [`RosterService::browse`].
    pub async fn browse(&self, query: &str) -> AppResult<RosterReport> {
        Ok(self.roster.browse(&self.session, query).await?)
    }

    /// Encodes the records matching `query` as roster CSV.
    ///
    /// An empty query exports every record.
    ///
    /// # Errors
    ///
    /// See [`RosterService::filtered`]; also fails when encoding fails.
    pub async fn export(&self, query: &str) -> AppResult<Vec<u8>> {
        let roster = self.roster.filtered(&self.session, query).await?;
        Ok(encode_roster(roster.records())?)
    }

    /// Removes the record registered under `email`.
    ///
    /// # Errors
    ///
    /// See [`RosterService::remove_by_email`].
    pub async fn remove_by_email(&self, email: &str) -> AppResult<MemberRecord> {
        Ok(self.roster.remove_by_email(&self.session, email).await?)
    }

    /// Removes every record named exactly `name`.
    ///
    /// # Errors
    ///
    /// See [`RosterService::remove_by_name`].
    pub async fn remove_by_name(&self, name: &str) -> AppResult<Vec<MemberRecord>> {
        Ok(self.roster.remove_by_name(&self.session, name).await?)
    }

    /// Replaces the record registered under `original_email`.
    ///
    /// # Errors
    ///
    /// See [`RosterService::edit`].
    pub async fn edit(
        &self,
        original_email: &str,
        form: RegistrationForm,
    ) -> AppResult<MemberRecord> {
        Ok(self.roster.edit(&self.session, original_email, form).await?)
    }

    /// Imports legacy roster rows without sending confirmations.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::NotAuthenticated`] for an unauthenticated
    /// session, or the storage error that stopped the import.
    pub async fn import_rows(&self, rows: Vec<RosterRow>) -> AppResult<ImportSummary> {
        self.session.ensure_authenticated()?;
        Ok(self.registration.import(rows.into_iter().map(import_entry)).await?)
    }

    /// Reads a legacy roster CSV at `path` and imports its rows.
    ///
    /// # Errors
    ///
    /// As [`Self::import_rows`], plus [`AppError::RosterFile`] when the file
    /// cannot be read.
    pub async fn import_file(&self, path: &Utf8Path) -> AppResult<ImportSummary> {
        self.session.ensure_authenticated()?;
        let rows = CsvRosterFile::from_path(path).read_rows()?;
        self.import_rows(rows).await
    }
}

fn import_entry(row: RosterRow) -> ImportEntry {
    let (form, timestamp) = row.into_form();
    ImportEntry {
        form,
        registered_at: parse_timestamp(&timestamp).ok(),
    }
}

/// Opens the installed app described by `config`.
///
/// Creates the data directory and database when missing. An empty database
/// next to an existing roster file is seeded from that file first, so rows
/// recorded before the database existed are kept. A roster file that cannot
/// be read, or that holds rows the seeding skipped, is renamed to a
/// timestamped `.bak` sibling. The roster file is then regenerated from the
/// database.
///
/// # Errors
///
/// Returns [`AppError`] when the data directory or the database cannot be
/// opened, or when a roster file that needs a backup cannot be renamed.
pub async fn open(config: &RollbookConfig) -> AppResult<RollbookApp> {
    Dir::create_ambient_dir_all(&config.data_dir, ambient_authority()).map_err(|source| {
        AppError::DataDir {
            path: config.data_dir.clone(),
            source,
        }
    })?;

    let database = Arc::new(SqliteMemberRepository::open(config.database_path().as_str())?);
    let roster_file = CsvRosterFile::new(&config.data_dir, &config.roster_file);
    let clock = Arc::new(DefaultClock);

    seed_from_roster_file(&database, &roster_file, &clock).await?;
    let repository = Arc::new(MirroredMemberRepository::new(
        database,
        Arc::new(roster_file),
    ));
    repository.resync().await?;

    let notifier: Arc<dyn RegistrationNotifier> = match config.smtp_relay() {
        Some(relay) => Arc::new(SmtpNotifier::new(
            relay,
            ConfirmationTemplate::new(config.organisation.as_str()),
        )),
        None => {
            info!("confirmation mail disabled; no SMTP relay configured");
            Arc::new(DisabledNotifier)
        }
    };

    Ok(MembershipApp::new(
        repository,
        notifier,
        clock,
        config.admin_credential(),
    ))
}

/// Timestamp format used in roster backup file names.
const BACKUP_STAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Seeds an empty database from the roster file.
///
/// Sets the file aside when it cannot be read or when any of its rows were
/// not seeded, so the regenerated mirror never discards them.
async fn seed_from_roster_file(
    database: &Arc<SqliteMemberRepository>,
    roster_file: &CsvRosterFile,
    clock: &Arc<DefaultClock>,
) -> AppResult<()> {
    if !database.list_all().await?.is_empty() {
        return Ok(());
    }
    let rows = match roster_file.read_rows() {
        Ok(rows) => rows,
        Err(err) => {
            warn!(error = %err, "roster file unreadable");
            return set_aside(roster_file, clock.as_ref());
        }
    };
    if rows.is_empty() {
        return Ok(());
    }

    let seeding = RegistrationService::new(
        Arc::clone(database),
        Arc::new(DisabledNotifier),
        Arc::clone(clock),
    );
    let summary = seeding.import(rows.into_iter().map(import_entry)).await?;
    info!(
        path = %roster_file.path(),
        imported = summary.imported,
        skipped = summary.skipped.len(),
        "seeded database from existing roster file"
    );
    if summary.skipped.is_empty() {
        return Ok(());
    }
    for skipped in &summary.skipped {
        warn!(row = skipped.position, reason = %skipped.reason, "roster row not seeded");
    }
    set_aside(roster_file, clock.as_ref())
}

fn set_aside(roster_file: &CsvRosterFile, clock: &impl Clock) -> AppResult<()> {
    let stamp = clock.utc().format(BACKUP_STAMP_FORMAT).to_string();
    if let Some(backup) = roster_file.set_aside(&stamp)? {
        warn!(%backup, "kept the previous roster file as a backup");
    }
    Ok(())
}
