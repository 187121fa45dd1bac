//! Administrator session state.

use sha2::{Digest, Sha256};
use std::fmt;
use thiserror::Error;
use tracing::{info, warn};

/// Errors returned by administrator session checks.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum AdminError {
    /// No administrator secret has been configured.
    #[error("administrator access is not configured")]
    NotConfigured,
    /// The submitted credential does not match the configured secret.
    #[error("incorrect administrator password")]
    IncorrectCredential,
    /// The operation requires an authenticated session.
    #[error("administrator login required")]
    NotAuthenticated,
}

/// Digest of the shared administrator secret.
///
/// Only the SHA-256 digest is retained; attempts are hashed and compared
/// digest to digest.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminCredential {
    digest: [u8; 32],
}

impl AdminCredential {
    /// Creates a credential from the configured secret.
    ///
    /// Returns `None` for an empty secret.
    #[must_use]
    pub fn from_secret(secret: &str) -> Option<Self> {
        if secret.is_empty() {
            return None;
        }
        Some(Self {
            digest: digest(secret),
        })
    }

    /// Returns `true` when `attempt` is the configured secret.
    #[must_use]
    pub fn verify(&self, attempt: &str) -> bool {
        let candidate = digest(attempt);
        self.digest
            .iter()
            .zip(candidate.iter())
            .fold(0_u8, |acc, (left, right)| acc | (left ^ right))
            == 0
    }
}

impl fmt::Debug for AdminCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AdminCredential(<redacted>)")
    }
}

fn digest(value: &str) -> [u8; 32] {
    Sha256::digest(value.as_bytes()).into()
}

/// Binary administrator session: unauthenticated or authenticated.
///
/// There is no expiry; the session lasts as long as the value.
#[derive(Debug, Clone, Default)]
pub struct AdminSession {
    credential: Option<AdminCredential>,
    authenticated: bool,
}

impl AdminSession {
    /// Creates an unauthenticated session checked against `credential`.
    #[must_use]
    pub const fn new(credential: Option<AdminCredential>) -> Self {
        Self {
            credential,
            authenticated: false,
        }
    }

    /// Attempts to authenticate with `attempt`.
    ///
    /// A failed attempt leaves the session unauthenticated.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::NotConfigured`] when no secret is configured, or
    /// [`AdminError::IncorrectCredential`] when the attempt does not match.
    pub fn login(&mut self, attempt: &str) -> Result<(), AdminError> {
        let credential = self.credential.as_ref().ok_or(AdminError::NotConfigured)?;
        if !credential.verify(attempt) {
            self.authenticated = false;
            warn!("administrator login rejected");
            return Err(AdminError::IncorrectCredential);
        }
        self.authenticated = true;
        info!("administrator logged in");
        Ok(())
    }

    /// Returns the session to the unauthenticated state.
    pub fn logout(&mut self) {
        self.authenticated = false;
    }

    /// Returns `true` when the session is authenticated.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Fails unless the session is authenticated.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::NotAuthenticated`] for an unauthenticated
    /// session.
    pub const fn ensure_authenticated(&self) -> Result<(), AdminError> {
        if self.authenticated {
            Ok(())
        } else {
            Err(AdminError::NotAuthenticated)
        }
    }
}
