//! `SQLite` repository implementation for member records.

use super::{
    models::{MemberRow, NewMemberRow},
    schema::{CREATE_MEMBERS_TABLE, members},
};
use crate::member::{
    domain::{EmailAddress, MemberDetails, MemberRecord, RegistrationForm, parse_timestamp},
    ports::{MemberRepository, MemberRepositoryError, MemberRepositoryResult},
};
use async_trait::async_trait;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sqlite::SqliteConnection;
use tracing::debug;

/// `SQLite` connection pool type used by member adapters.
pub type MemberSqlitePool = Pool<ConnectionManager<SqliteConnection>>;

/// `SQLite`-backed member repository, the roster's source of truth.
#[derive(Debug, Clone)]
pub struct SqliteMemberRepository {
    pool: MemberSqlitePool,
}

impl SqliteMemberRepository {
    /// Opens (creating if needed) the database at `database_url` and ensures
    /// the `members` table exists.
    ///
    /// The pool holds a single connection; the tool serves one operator.
    ///
    /// # Errors
    ///
    /// Returns [`MemberRepositoryError::Persistence`] when the pool cannot be
    /// built or the schema cannot be applied.
    pub fn open(database_url: &str) -> MemberRepositoryResult<Self> {
        let manager = ConnectionManager::<SqliteConnection>::new(database_url);
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(MemberRepositoryError::persistence)?;
        let repository = Self::new(pool);
        repository.ensure_schema()?;
        debug!(database_url, "opened member database");
        Ok(repository)
    }

    /// Creates a repository from an existing pool.
    ///
    /// Call [`Self::ensure_schema`] before use when the database may be new.
    #[must_use]
    pub const fn new(pool: MemberSqlitePool) -> Self {
        Self { pool }
    }

    /// Creates the `members` table when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`MemberRepositoryError::Persistence`] when the DDL fails.
    pub fn ensure_schema(&self) -> MemberRepositoryResult<()> {
        let mut connection = self
            .pool
            .get()
            .map_err(MemberRepositoryError::persistence)?;
        connection
            .batch_execute(CREATE_MEMBERS_TABLE)
            .map_err(MemberRepositoryError::persistence)
    }

    async fn run_blocking<F, T>(&self, f: F) -> MemberRepositoryResult<T>
    where
        F: FnOnce(&mut SqliteConnection) -> MemberRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(MemberRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(MemberRepositoryError::persistence)?
    }
}

impl From<DieselError> for MemberRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl MemberRepository for SqliteMemberRepository {
    async fn insert(&self, record: &MemberRecord) -> MemberRepositoryResult<()> {
        let email = record.email().clone();
        let new_row = to_new_row(record);

        self.run_blocking(move |connection| {
            diesel::insert_into(members::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| map_unique_violation(err, &email))?;
            Ok(())
        })
        .await
    }

    async fn replace(
        &self,
        original: &EmailAddress,
        record: &MemberRecord,
    ) -> MemberRepositoryResult<()> {
        let original_email = original.clone();
        let new_email = record.email().clone();
        let changeset = to_new_row(record);

        self.run_blocking(move |connection| {
            let updated_count = diesel::update(
                members::table.filter(members::gmail.eq(original_email.as_str())),
            )
            .set(&changeset)
            .execute(connection)
            .map_err(|err| map_unique_violation(err, &new_email))?;

            if updated_count == 0 {
                return Err(MemberRepositoryError::NotFound(original_email));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> MemberRepositoryResult<Option<MemberRecord>> {
        let email_str = email.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = members::table
                .filter(members::gmail.eq(&email_str))
                .select(MemberRow::as_select())
                .first::<MemberRow>(connection)
                .optional()
                .map_err(MemberRepositoryError::persistence)?;
            row.map(row_to_record).transpose()
        })
        .await
    }

    async fn list_all(&self) -> MemberRepositoryResult<Vec<MemberRecord>> {
        self.run_blocking(move |connection| {
            let rows = members::table
                .order(members::id.asc())
                .select(MemberRow::as_select())
                .load::<MemberRow>(connection)
                .map_err(MemberRepositoryError::persistence)?;
            rows.into_iter().map(row_to_record).collect()
        })
        .await
    }

    async fn remove_by_email(
        &self,
        email: &EmailAddress,
    ) -> MemberRepositoryResult<Option<MemberRecord>> {
        let email_str = email.as_str().to_owned();
        self.run_blocking(move |connection| {
            connection.transaction::<_, MemberRepositoryError, _>(|tx_conn| {
                let row = members::table
                    .filter(members::gmail.eq(&email_str))
                    .select(MemberRow::as_select())
                    .first::<MemberRow>(tx_conn)
                    .optional()?;
                let Some(found) = row else {
                    return Ok(None);
                };
                diesel::delete(members::table.filter(members::id.eq(found.id)))
                    .execute(tx_conn)?;
                row_to_record(found).map(Some)
            })
        })
        .await
    }

    async fn remove_by_name(&self, name: &str) -> MemberRepositoryResult<Vec<MemberRecord>> {
        let name_str = name.to_owned();
        self.run_blocking(move |connection| {
            connection.transaction::<_, MemberRepositoryError, _>(|tx_conn| {
                let rows = members::table
                    .filter(members::name.eq(&name_str))
                    .order(members::id.asc())
                    .select(MemberRow::as_select())
                    .load::<MemberRow>(tx_conn)?;
                diesel::delete(members::table.filter(members::name.eq(&name_str)))
                    .execute(tx_conn)?;
                rows.into_iter().map(row_to_record).collect()
            })
        })
        .await
    }
}

fn to_new_row(record: &MemberRecord) -> NewMemberRow {
    let details = record.details();
    NewMemberRow {
        name: details.name().to_owned(),
        student_id: details.student_id().map(str::to_owned),
        index_number: details.index_number().to_owned(),
        phone: details.phone().to_owned(),
        residence: details.residence().to_owned(),
        gmail: details.email().as_str().to_owned(),
        course: details.course().to_owned(),
        level: details.level().as_str().to_owned(),
        timestamp: record.timestamp_text(),
    }
}

fn row_to_record(row: MemberRow) -> MemberRepositoryResult<MemberRecord> {
    let MemberRow {
        id: _,
        name,
        student_id,
        index_number,
        phone,
        residence,
        gmail,
        course,
        level,
        timestamp,
    } = row;

    let form = RegistrationForm {
        name,
        student_id: student_id.unwrap_or_default(),
        index_number,
        phone,
        residence,
        email: gmail,
        course,
        level,
    };
    let details =
        MemberDetails::try_from(form).map_err(MemberRepositoryError::invalid_persisted_data)?;
    let registered_at =
        parse_timestamp(&timestamp).map_err(MemberRepositoryError::invalid_persisted_data)?;
    Ok(MemberRecord::from_persisted(details, registered_at))
}

fn map_unique_violation(err: DieselError, email: &EmailAddress) -> MemberRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            MemberRepositoryError::DuplicateEmail(email.clone())
        }
        other => MemberRepositoryError::persistence(other),
    }
}
