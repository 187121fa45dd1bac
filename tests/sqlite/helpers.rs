//! Shared test helpers for `SQLite` integration tests.

use camino::Utf8PathBuf;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use mockable::DefaultClock;
use rollbook::member::{
    adapters::{
        flat_file::CsvRosterFile, mirrored::MirroredMemberRepository,
        sqlite::SqliteMemberRepository,
    },
    domain::{MemberDetails, MemberRecord, RegistrationForm},
};
use rstest::fixture;
use std::sync::Arc;
use uuid::Uuid;

/// Boxed error type for fallible helpers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Repository stack used by the installed tool.
pub type MirroredSqlite = MirroredMemberRepository<SqliteMemberRepository, CsvRosterFile>;

/// Database file name used inside each data directory.
pub const DATABASE_FILE: &str = "members.db";

/// Roster file name used inside each data directory.
pub const ROSTER_FILE: &str = "members.csv";

/// Uniquely named directory under the system temp dir, removed on drop.
pub struct DataDir {
    base: Utf8PathBuf,
    name: String,
}

impl DataDir {
    /// Creates a fresh directory named with `prefix` and a random suffix.
    ///
    /// # Errors
    ///
    /// Returns an error if the temp dir is not UTF-8 or cannot be written.
    pub fn new(prefix: &str) -> Result<Self, BoxError> {
        let base = Utf8PathBuf::try_from(std::env::temp_dir())?;
        let name = format!("{prefix}_{}", Uuid::new_v4());
        Dir::open_ambient_dir(&base, ambient_authority())?.create_dir(&name)?;
        Ok(Self { base, name })
    }

    /// Full path of the directory.
    #[must_use]
    pub fn path(&self) -> Utf8PathBuf {
        self.base.join(&self.name)
    }

    /// Database URL for the directory's database file.
    #[must_use]
    pub fn database_url(&self) -> String {
        self.path().join(DATABASE_FILE).into_string()
    }

    /// Handle on the directory's roster file.
    #[must_use]
    pub fn roster_file(&self) -> CsvRosterFile {
        CsvRosterFile::new(self.path(), ROSTER_FILE)
    }

    /// Writes `contents` to `file_name` inside the directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_file(&self, file_name: &str, contents: &str) -> Result<(), BoxError> {
        self.open()?.write(file_name, contents)?;
        Ok(())
    }

    /// Reads `file_name` inside the directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn read_file(&self, file_name: &str) -> Result<String, BoxError> {
        Ok(self.open()?.read_to_string(file_name)?)
    }

    /// Returns `true` when `file_name` exists inside the directory.
    #[must_use]
    pub fn contains(&self, file_name: &str) -> bool {
        self.open().is_ok_and(|dir| dir.exists(file_name))
    }

    /// Names of the `.bak` files inside the directory, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be listed.
    pub fn backups(&self) -> Result<Vec<String>, BoxError> {
        let mut names = Vec::new();
        for entry in self.open()?.entries()? {
            let name = entry?.file_name()?;
            if name.ends_with(".bak") {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    fn open(&self) -> std::io::Result<Dir> {
        Dir::open_ambient_dir(self.path(), ambient_authority())
    }
}

impl Drop for DataDir {
    fn drop(&mut self) {
        if let Ok(base) = Dir::open_ambient_dir(&self.base, ambient_authority()) {
            base.remove_dir_all(&self.name).ok();
        }
    }
}

/// Provides a fresh data directory for each test.
#[fixture]
pub fn data_dir() -> DataDir {
    DataDir::new("rollbook_sqlite").expect("temp data dir should be created")
}

/// Opens the `SQLite` repository inside `dir`.
///
/// # Errors
///
/// Returns an error if the database cannot be opened.
pub fn open_sqlite(dir: &DataDir) -> Result<SqliteMemberRepository, BoxError> {
    Ok(SqliteMemberRepository::open(&dir.database_url())?)
}

/// Opens the mirrored repository stack inside `dir`.
///
/// # Errors
///
/// Returns an error if the database cannot be opened.
pub fn open_mirrored(dir: &DataDir) -> Result<MirroredSqlite, BoxError> {
    Ok(MirroredMemberRepository::new(
        Arc::new(open_sqlite(dir)?),
        Arc::new(dir.roster_file()),
    ))
}

/// Builds a complete form for `name` and `email`.
#[must_use]
pub fn form(name: &str, email: &str) -> RegistrationForm {
    RegistrationForm {
        name: name.to_owned(),
        student_id: String::new(),
        index_number: "UEB0001".to_owned(),
        phone: "0244000000".to_owned(),
        residence: "Ayeduase".to_owned(),
        email: email.to_owned(),
        course: "Nursing".to_owned(),
        level: "100".to_owned(),
    }
}

/// Builds a record for `name` and `email` stamped with the system clock.
#[must_use]
pub fn record(name: &str, email: &str) -> MemberRecord {
    let details = MemberDetails::try_from(form(name, email)).expect("valid form");
    MemberRecord::new(details, &DefaultClock)
}
