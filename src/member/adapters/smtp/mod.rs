//! Notification adapters: SMTP confirmation mail and a disabled fallback.

mod message;
mod notifier;

pub use message::{ConfirmationTemplate, render_confirmation};
pub use notifier::{DisabledNotifier, SmtpNotifier, SmtpRelay};
