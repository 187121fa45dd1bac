//! Registration notifiers.

use super::message::{ConfirmationTemplate, render_confirmation};
use crate::member::{
    domain::MemberRecord,
    ports::{NotificationError, RegistrationNotifier},
};
use async_trait::async_trait;
use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, Message, SmtpTransport, Transport};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};

const SEND_TIMEOUT: Duration = Duration::from_secs(20);

/// Connection details for an authenticated STARTTLS relay.
#[derive(Clone, PartialEq, Eq)]
pub struct SmtpRelay {
    /// Relay host name.
    pub host: String,
    /// Submission port, usually 587.
    pub port: u16,
    /// Login user name.
    pub username: String,
    /// Login password.
    pub password: String,
    /// `From` address of confirmation mail.
    pub sender: String,
}

impl fmt::Debug for SmtpRelay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpRelay")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("sender", &self.sender)
            .finish()
    }
}

/// Sends confirmation mail through an SMTP relay.
#[derive(Debug, Clone)]
pub struct SmtpNotifier {
    relay: SmtpRelay,
    template: ConfirmationTemplate,
}

impl SmtpNotifier {
    /// Creates a notifier for `relay` using `template`.
    #[must_use]
    pub const fn new(relay: SmtpRelay, template: ConfirmationTemplate) -> Self {
        Self { relay, template }
    }

    /// Builds the confirmation message for `record` without sending it.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError::Compose`] when an address does not parse
    /// or the body does not render.
    pub fn compose(&self, record: &MemberRecord) -> Result<Message, NotificationError> {
        let from: Mailbox = self
            .relay
            .sender
            .parse()
            .map_err(|err: lettre::address::AddressError| {
                NotificationError::Compose(format!("sender address: {err}"))
            })?;
        let address: Address = record
            .email()
            .as_str()
            .parse()
            .map_err(|err: lettre::address::AddressError| {
                NotificationError::Compose(format!("recipient address: {err}"))
            })?;
        let to = Mailbox::new(Some(record.details().name().to_owned()), address);
        let body = render_confirmation(&self.template, record)?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(self.template.subject())
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|err| NotificationError::Compose(err.to_string()))
    }

    fn transport(&self) -> Result<SmtpTransport, NotificationError> {
        let credentials = Credentials::new(self.relay.username.clone(), self.relay.password.clone());
        Ok(SmtpTransport::starttls_relay(&self.relay.host)
            .map_err(NotificationError::delivery)?
            .port(self.relay.port)
            .credentials(credentials)
            .timeout(Some(SEND_TIMEOUT))
            .build())
    }
}

#[async_trait]
impl RegistrationNotifier for SmtpNotifier {
    async fn notify_registered(&self, record: &MemberRecord) -> Result<(), NotificationError> {
        let message = self.compose(record)?;
        let transport = self.transport()?;
        let recipient = record.email().clone();

        tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .map_err(NotificationError::delivery)?
            .map_err(NotificationError::delivery)?;

        info!(email = %recipient, "confirmation mail sent");
        Ok(())
    }
}

/// Notifier used when no relay is configured; it only logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledNotifier;

#[async_trait]
impl RegistrationNotifier for DisabledNotifier {
    async fn notify_registered(&self, record: &MemberRecord) -> Result<(), NotificationError> {
        debug!(email = %record.email(), "confirmation mail disabled; skipping");
        Ok(())
    }
}
