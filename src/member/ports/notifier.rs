//! Port for outbound registration notifications.

use crate::member::domain::MemberRecord;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Sends a confirmation to a newly registered member.
#[async_trait]
pub trait RegistrationNotifier: Send + Sync {
    /// Notifies the member described by `record`.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError`] when the message cannot be built or
    /// delivered.
    async fn notify_registered(&self, record: &MemberRecord) -> Result<(), NotificationError>;
}

/// Errors returned by notifier implementations.
#[derive(Debug, Clone, Error)]
pub enum NotificationError {
    /// The message body or envelope could not be built.
    #[error("notification could not be composed: {0}")]
    Compose(String),

    /// The relay rejected the message or could not be reached.
    #[error("notification delivery failed: {0}")]
    Delivery(Arc<dyn std::error::Error + Send + Sync>),
}

impl NotificationError {
    /// Wraps a transport error.
    pub fn delivery(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Delivery(Arc::new(err))
    }
}
