//! Shared helpers for in-memory membership tests.

use async_trait::async_trait;
use mockable::DefaultClock;
use rollbook::app::MembershipApp;
use rollbook::member::{
    adapters::{
        memory::{InMemoryMemberRepository, InMemoryRosterMirror},
        mirrored::MirroredMemberRepository,
    },
    domain::{EmailAddress, MemberRecord, RegistrationForm},
    ports::{NotificationError, RegistrationNotifier},
    services::AdminCredential,
};
use rstest::fixture;
use std::sync::{Arc, Mutex};

/// Administrator secret configured for every test app.
pub const SECRET: &str = "open-sesame";

/// Repository stack used by the test app.
pub type MirroredMemory = MirroredMemberRepository<InMemoryMemberRepository, InMemoryRosterMirror>;

/// App type under test.
pub type TestApp = MembershipApp<MirroredMemory, RecordingNotifier, DefaultClock>;

/// Notifier that records each recipient and can be told to fail.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    fail: bool,
    sent: Mutex<Vec<EmailAddress>>,
}

impl RecordingNotifier {
    /// Creates a notifier whose deliveries always fail.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Recipients of every attempted confirmation.
    #[must_use]
    pub fn attempts(&self) -> Vec<EmailAddress> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl RegistrationNotifier for RecordingNotifier {
    async fn notify_registered(&self, record: &MemberRecord) -> Result<(), NotificationError> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(record.email().clone());
        }
        if self.fail {
            return Err(NotificationError::delivery(std::io::Error::other(
                "relay unreachable",
            )));
        }
        Ok(())
    }
}

/// Test app together with handles on its adapters.
pub struct Harness {
    /// App under test.
    pub app: TestApp,
    /// Notifier wired into the app.
    pub notifier: Arc<RecordingNotifier>,
    /// Mirror wired into the app.
    pub mirror: Arc<InMemoryRosterMirror>,
}

impl Harness {
    /// Builds an app around `recording`.
    #[must_use]
    pub fn with_notifier(recording: RecordingNotifier) -> Self {
        let notifier = Arc::new(recording);
        let mirror = Arc::new(InMemoryRosterMirror::new());
        let repository = Arc::new(MirroredMemberRepository::new(
            Arc::new(InMemoryMemberRepository::new()),
            Arc::clone(&mirror),
        ));
        let app = MembershipApp::new(
            repository,
            Arc::clone(&notifier),
            Arc::new(DefaultClock),
            AdminCredential::from_secret(SECRET),
        );
        Self {
            app,
            notifier,
            mirror,
        }
    }

    /// Logs the app in as administrator.
    pub fn login(&mut self) {
        self.app.login(SECRET).expect("administrator login");
    }
}

/// Harness with a working notifier.
#[fixture]
pub fn harness() -> Harness {
    Harness::with_notifier(RecordingNotifier::default())
}

/// Builds a complete form with the given placement.
#[must_use]
pub fn placed_form(
    name: &str,
    email: &str,
    course: &str,
    level: &str,
    residence: &str,
) -> RegistrationForm {
    RegistrationForm {
        name: name.to_owned(),
        student_id: String::new(),
        index_number: "UEB0001".to_owned(),
        phone: "0244000000".to_owned(),
        residence: residence.to_owned(),
        email: email.to_owned(),
        course: course.to_owned(),
        level: level.to_owned(),
    }
}

/// Builds a complete form for `name` and `email`.
#[must_use]
pub fn form(name: &str, email: &str) -> RegistrationForm {
    placed_form(name, email, "Nursing", "100", "Ayeduase")
}
