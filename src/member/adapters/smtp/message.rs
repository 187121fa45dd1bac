//! Confirmation message text.

use crate::member::{domain::MemberRecord, ports::NotificationError};
use minijinja::{Environment, context};

const DEFAULT_BODY: &str = "\
Dear {{ name }},

Thank you for registering with the {{ organisation }} Membership System!

We are happy to have you as part of our community.
God richly bless you!

Date & Time of Registration: {{ registered_at }} UTC

Kind Regards,
{{ organisation }} Membership Team
";

/// Subject and body template for the confirmation mail.
///
/// The body is a `minijinja` template with `name`, `email`, `course`,
/// `level`, `organisation` and `registered_at` in scope. `registered_at` is
/// the UTC registration time without a zone suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationTemplate {
    organisation: String,
    body: String,
}

impl ConfirmationTemplate {
    /// Creates the default template for `organisation`.
    #[must_use]
    pub fn new(organisation: impl Into<String>) -> Self {
        Self {
            organisation: organisation.into(),
            body: DEFAULT_BODY.to_owned(),
        }
    }

    /// Replaces the body template.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Returns the organisation named in the mail.
    #[must_use]
    pub fn organisation(&self) -> &str {
        &self.organisation
    }

    /// Returns the subject line.
    #[must_use]
    pub fn subject(&self) -> String {
        format!("{} Registration Successful", self.organisation)
    }
}

/// Renders the confirmation body for `record`.
///
/// # Errors
///
/// Returns [`NotificationError::Compose`] when the template does not render.
pub fn render_confirmation(
    template: &ConfirmationTemplate,
    record: &MemberRecord,
) -> Result<String, NotificationError> {
    let details = record.details();
    let environment = Environment::new();
    environment
        .render_str(
            &template.body,
            context! {
                name => details.name(),
                email => details.email().as_str(),
                course => details.course(),
                level => details.level().as_str(),
                organisation => template.organisation(),
                registered_at => record.timestamp_text(),
            },
        )
        .map_err(|err| NotificationError::Compose(err.to_string()))
}
