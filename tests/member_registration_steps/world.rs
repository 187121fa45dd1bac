//! Shared world state for member registration BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use rollbook::app::{AppError, MembershipApp};
use rollbook::member::{
    adapters::{
        memory::{InMemoryMemberRepository, InMemoryRosterMirror},
        mirrored::MirroredMemberRepository,
        smtp::DisabledNotifier,
    },
    domain::{MemberRecord, RegistrationForm},
    services::AdminCredential,
};
use rstest::fixture;

/// Administrator secret configured for the scenario app.
pub const SECRET: &str = "open-sesame";

/// App type used by the BDD world.
pub type ScenarioApp = MembershipApp<
    MirroredMemberRepository<InMemoryMemberRepository, InMemoryRosterMirror>,
    DisabledNotifier,
    DefaultClock,
>;

/// Scenario world for member registration behaviour tests.
pub struct MembershipWorld {
    /// The app under test.
    pub app: ScenarioApp,
    /// Mirror the app writes the roster to.
    pub mirror: Arc<InMemoryRosterMirror>,
    /// Result of the last registration attempt.
    pub last_registration: Option<Result<MemberRecord, AppError>>,
    /// Result of the last login attempt.
    pub last_login: Option<Result<(), AppError>>,
    /// Record as it was before the last edit.
    pub before_edit: Option<MemberRecord>,
    /// Record returned by the last edit.
    pub after_edit: Option<MemberRecord>,
}

impl MembershipWorld {
    /// Creates a world with an empty roll and a logged-out session.
    #[must_use]
    pub fn new() -> Self {
        let mirror = Arc::new(InMemoryRosterMirror::new());
        let repository = Arc::new(MirroredMemberRepository::new(
            Arc::new(InMemoryMemberRepository::new()),
            Arc::clone(&mirror),
        ));
        let app = MembershipApp::new(
            repository,
            Arc::new(DisabledNotifier),
            Arc::new(DefaultClock),
            AdminCredential::from_secret(SECRET),
        );
        Self {
            app,
            mirror,
            last_registration: None,
            last_login: None,
            before_edit: None,
            after_edit: None,
        }
    }
}

impl Default for MembershipWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> MembershipWorld {
    MembershipWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Builds a complete registration form for `name` and `email`.
pub fn build_form(name: &str, email: &str) -> RegistrationForm {
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
