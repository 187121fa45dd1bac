//! Rollbook configuration.
//!
//! Settings are read from a TOML file and then overridden from `ROLLBOOK_*`
//! environment variables. A missing file yields the defaults, so a fresh
//! checkout runs without any configuration; administrator access and
//! confirmation mail stay disabled until their secrets are supplied.

use crate::member::adapters::smtp::SmtpRelay;
use crate::member::services::AdminCredential;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde::Deserialize;
use std::fmt;
use std::io;
use thiserror::Error;
use tracing::debug;

/// Default configuration file name, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "rollbook.toml";

const DEFAULT_ORGANISATION: &str = "Adventist Church";
const DEFAULT_DATABASE_FILE: &str = "members.db";
const DEFAULT_ROSTER_FILE: &str = "members.csv";
const DEFAULT_SMTP_PORT: u16 = 587;

/// Errors returned while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file exists but could not be read.
    #[error("failed to read configuration {path}: {source}")]
    Read {
        /// Path that failed.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The configuration file is not valid TOML for [`RollbookConfig`].
    #[error("invalid configuration {path}: {source}")]
    Parse {
        /// Path that failed.
        path: Utf8PathBuf,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// An environment override could not be parsed.
    #[error("invalid value for {name}: {value}")]
    InvalidOverride {
        /// Environment variable name.
        name: &'static str,
        /// Rejected value.
        value: String,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RollbookConfig {
    /// Organisation named in confirmation mail.
    pub organisation: String,
    /// Directory holding the database and the roster file.
    pub data_dir: Utf8PathBuf,
    /// Database file name inside [`Self::data_dir`].
    pub database_file: Utf8PathBuf,
    /// Roster CSV file name inside [`Self::data_dir`].
    pub roster_file: Utf8PathBuf,
    /// Administrator settings.
    pub admin: AdminConfig,
    /// Outbound mail settings.
    pub smtp: SmtpConfig,
}

impl Default for RollbookConfig {
    fn default() -> Self {
        Self {
            organisation: DEFAULT_ORGANISATION.to_owned(),
            data_dir: Utf8PathBuf::from("."),
            database_file: Utf8PathBuf::from(DEFAULT_DATABASE_FILE),
            roster_file: Utf8PathBuf::from(DEFAULT_ROSTER_FILE),
            admin: AdminConfig::default(),
            smtp: SmtpConfig::default(),
        }
    }
}

/// `[admin]` section.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdminConfig {
    /// Shared administrator secret; administrator access is refused when
    /// absent.
    pub password: Option<String>,
}

impl fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminConfig")
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// `[smtp]` section.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SmtpConfig {
    /// Relay host name.
    pub host: Option<String>,
    /// Submission port.
    pub port: u16,
    /// Login user name.
    pub username: Option<String>,
    /// Login password.
    pub password: Option<String>,
    /// `From` address; defaults to the user name.
    pub sender: Option<String>,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: DEFAULT_SMTP_PORT,
            username: None,
            password: None,
            sender: None,
        }
    }
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("sender", &self.sender)
            .finish()
    }
}

impl RollbookConfig {
    /// Loads the file at `path` and applies process environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed, or an
    /// override is malformed.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path)?;
        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Loads the file at `path`; a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] or [`ConfigError::Parse`].
    pub fn from_file(path: &Utf8Path) -> Result<Self, ConfigError> {
        let read_error = |source| ConfigError::Read {
            path: path.to_owned(),
            source,
        };
        let parent = path
            .parent()
            .filter(|parent| !parent.as_str().is_empty())
            .unwrap_or_else(|| Utf8Path::new("."));
        let file_name = path.file_name().unwrap_or(path.as_str());

        let dir = match Dir::open_ambient_dir(parent, ambient_authority()) {
            Ok(dir) => dir,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => return Err(read_error(err)),
        };
        let contents = match dir.read_to_string(file_name) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(%path, "no configuration file; using defaults");
                return Ok(Self::default());
            }
            Err(err) => return Err(read_error(err)),
        };
        Self::from_toml(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns the TOML error for malformed input or unknown keys.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Applies `ROLLBOOK_*` overrides obtained from `lookup`.
    ///
    /// Empty values are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOverride`] when `ROLLBOOK_SMTP_PORT` is
    /// not a port number.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |name: &str| lookup(name).filter(|found| !found.trim().is_empty());

        if let Some(dir) = value("ROLLBOOK_DATA_DIR") {
            self.data_dir = Utf8PathBuf::from(dir);
        }
        if let Some(secret) = value("ROLLBOOK_ADMIN_PASSWORD") {
            self.admin.password = Some(secret);
        }
        if let Some(host) = value("ROLLBOOK_SMTP_HOST") {
            self.smtp.host = Some(host);
        }
        if let Some(raw_port) = value("ROLLBOOK_SMTP_PORT") {
            self.smtp.port = raw_port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidOverride {
                    name: "ROLLBOOK_SMTP_PORT",
                    value: raw_port.clone(),
                })?;
        }
        if let Some(username) = value("ROLLBOOK_SMTP_USERNAME") {
            self.smtp.username = Some(username);
        }
        if let Some(password) = value("ROLLBOOK_SMTP_PASSWORD") {
            self.smtp.password = Some(password);
        }
        if let Some(sender) = value("ROLLBOOK_SMTP_SENDER") {
            self.smtp.sender = Some(sender);
        }
        Ok(())
    }

    /// Full path of the database file.
    #[must_use]
    pub fn database_path(&self) -> Utf8PathBuf {
        self.data_dir.join(&self.database_file)
    }

    /// Full path of the roster CSV file.
    #[must_use]
    pub fn roster_path(&self) -> Utf8PathBuf {
        self.data_dir.join(&self.roster_file)
    }

    /// Administrator credential, or `None` when no secret is configured.
    #[must_use]
    pub fn admin_credential(&self) -> Option<AdminCredential> {
        self.admin
            .password
            .as_deref()
            .and_then(AdminCredential::from_secret)
    }

    /// Relay settings, or `None` unless host, credentials and a sender are
    /// all known.
    #[must_use]
    pub fn smtp_relay(&self) -> Option<SmtpRelay> {
        let smtp = &self.smtp;
        let host = smtp.host.clone()?;
        let username = smtp.username.clone()?;
        let password = smtp.password.clone()?;
        let sender = smtp.sender.clone().unwrap_or_else(|| username.clone());
        Some(SmtpRelay {
            host,
            port: smtp.port,
            username,
            password,
            sender,
        })
    }
}
