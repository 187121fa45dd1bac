//! Roster CSV file on disk.

use super::codec::{RosterRow, decode_roster, encode_roster};
use crate::member::{
    domain::MemberRecord,
    ports::{RosterMirror, RosterMirrorError},
};
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use std::io;
use thiserror::Error;
use tracing::debug;

/// Errors returned while reading a roster file.
#[derive(Debug, Error)]
pub enum RosterFileError {
    /// The file or its directory could not be opened or read.
    #[error("failed to read roster file {path}: {source}")]
    Io {
        /// Path that failed.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The file is not valid roster CSV.
    #[error("malformed roster file {path}: {source}")]
    Malformed {
        /// Path that failed.
        path: Utf8PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },
}

/// Roster stored as a CSV file inside a directory.
///
/// The directory is opened for each operation and the file is replaced
/// through a temporary sibling so readers never see a partial roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRosterFile {
    dir: Utf8PathBuf,
    file_name: Utf8PathBuf,
}

impl CsvRosterFile {
    /// Creates a roster file handle for `file_name` inside `dir`.
    #[must_use]
    pub fn new(dir: impl Into<Utf8PathBuf>, file_name: impl Into<Utf8PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            file_name: file_name.into(),
        }
    }

    /// Creates a roster file handle from a full path.
    ///
    /// A bare file name is resolved against the current directory.
    #[must_use]
    pub fn from_path(path: &Utf8Path) -> Self {
        let parent = path
            .parent()
            .filter(|parent| !parent.as_str().is_empty())
            .unwrap_or_else(|| Utf8Path::new("."));
        let file_name = path.file_name().unwrap_or(path.as_str());
        Self::new(parent, file_name)
    }

    /// Returns the full path of the roster file.
    #[must_use]
    pub fn path(&self) -> Utf8PathBuf {
        self.dir.join(&self.file_name)
    }

    /// Reads every row of the roster file.
    ///
    /// A missing file reads as an empty roster.
    ///
    /// # Errors
    ///
    /// Returns [`RosterFileError::Io`] when the file cannot be read or
    /// [`RosterFileError::Malformed`] when it is not roster CSV.
    pub fn read_rows(&self) -> Result<Vec<RosterRow>, RosterFileError> {
        let io_error = |source| RosterFileError::Io {
            path: self.path(),
            source,
        };
        let dir = Dir::open_ambient_dir(&self.dir, ambient_authority()).map_err(io_error)?;
        let file = match dir.open(&self.file_name) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(io_error(err)),
        };
        decode_roster(file).map_err(|source| RosterFileError::Malformed {
            path: self.path(),
            source,
        })
    }

    /// Renames the roster file to a `.bak` sibling tagged with `stamp`.
    ///
    /// The backup name is `<file>.<stamp>.bak`, with a counter appended when
    /// that name is taken. Returns the backup path, or `None` when there is
    /// no roster file.
    ///
    /// # Errors
    ///
    /// Returns [`RosterFileError::Io`] when the rename fails; the roster file
    /// is then still in place.
    pub fn set_aside(&self, stamp: &str) -> Result<Option<Utf8PathBuf>, RosterFileError> {
        let io_error = |source| RosterFileError::Io {
            path: self.path(),
            source,
        };
        let dir = Dir::open_ambient_dir(&self.dir, ambient_authority()).map_err(io_error)?;
        if !dir.exists(&self.file_name) {
            return Ok(None);
        }
        let mut backup = format!("{}.{stamp}.bak", self.file_name);
        let mut attempt = 1_u32;
        while dir.exists(&backup) {
            backup = format!("{}.{stamp}-{attempt}.bak", self.file_name);
            attempt += 1;
        }
        dir.rename(&self.file_name, &dir, &backup).map_err(io_error)?;
        let backup_path = self.dir.join(backup);
        debug!(path = %self.path(), backup = %backup_path, "set roster file aside");
        Ok(Some(backup_path))
    }

    fn temporary_name(&self) -> String {
        format!(".{}.tmp", self.file_name)
    }
}

impl RosterMirror for CsvRosterFile {
    fn write_snapshot(&self, records: &[MemberRecord]) -> Result<(), RosterMirrorError> {
        let bytes = encode_roster(records)?;
        let dir = Dir::open_ambient_dir(&self.dir, ambient_authority())?;
        let temporary = self.temporary_name();
        dir.write(&temporary, bytes)?;
        dir.rename(&temporary, &dir, &self.file_name)?;
        debug!(path = %self.path(), rows = records.len(), "wrote roster snapshot");
        Ok(())
    }
}
