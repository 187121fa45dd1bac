//! Repository contract tests against the `SQLite` `members` table.

use super::helpers::{DataDir, data_dir, form, open_sqlite, record};
use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use rollbook::member::{
    adapters::sqlite::SqliteMemberRepository,
    domain::{EmailAddress, MemberDetails},
    ports::{MemberRepository, MemberRepositoryError},
};
use rstest::rstest;

fn address(value: &str) -> EmailAddress {
    EmailAddress::new(value).expect("valid email")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn insert_and_find_round_trips_every_field(data_dir: DataDir) {
    let repository = open_sqlite(&data_dir).expect("open database");
    let original = record("Ama Mensah", "ama@example.com");

    repository.insert(&original).await.expect("insert");
    let found = repository
        .find_by_email(original.email())
        .await
        .expect("lookup");

    assert_eq!(found, Some(original));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_follows_registration_order(data_dir: DataDir) {
    let repository = open_sqlite(&data_dir).expect("open database");
    let names = ["Yaw Darko", "Ama Mensah", "Kofi Boateng"];
    for (index, name) in names.iter().enumerate() {
        repository
            .insert(&record(name, &format!("member{index}@example.com")))
            .await
            .expect("insert");
    }

    let listed: Vec<String> = repository
        .list_all()
        .await
        .expect("list")
        .iter()
        .map(|member| member.details().name().to_owned())
        .collect();

    assert_eq!(listed, names);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unique_constraint_rejects_duplicate_email(data_dir: DataDir) {
    let repository = open_sqlite(&data_dir).expect("open database");
    repository
        .insert(&record("Ama Mensah", "ama@example.com"))
        .await
        .expect("first insert");

    let duplicate = repository
        .insert(&record("Someone Else", "ama@example.com"))
        .await;

    assert!(matches!(
        duplicate,
        Err(MemberRepositoryError::DuplicateEmail(email)) if email.as_str() == "ama@example.com"
    ));
    assert_eq!(repository.list_all().await.expect("list").len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn replace_updates_fields_and_email(data_dir: DataDir) {
    let repository = open_sqlite(&data_dir).expect("open database");
    let original = record("Ama Mensah", "ama@example.com");
    repository.insert(&original).await.expect("insert");

    let mut edited = original.clone();
    edited.replace_details(
        MemberDetails::try_from(form("Ama Owusu", "ama.owusu@example.com"))
            .expect("valid form"),
    );
    repository
        .replace(original.email(), &edited)
        .await
        .expect("replace");

    assert_eq!(
        repository
            .find_by_email(&address("ama@example.com"))
            .await
            .expect("lookup"),
        None
    );
    assert_eq!(
        repository
            .find_by_email(&address("ama.owusu@example.com"))
            .await
            .expect("lookup"),
        Some(edited)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn replace_of_unknown_email_is_not_found(data_dir: DataDir) {
    let repository = open_sqlite(&data_dir).expect("open database");
    let ghost = record("Ghost", "ghost@example.com");

    let result = repository.replace(ghost.email(), &ghost).await;

    assert!(matches!(result, Err(MemberRepositoryError::NotFound(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn removals_return_what_was_deleted(data_dir: DataDir) {
    let repository = open_sqlite(&data_dir).expect("open database");
    for (name, email) in [
        ("Kwame Asante", "kwame1@example.com"),
        ("Kwame Asante", "kwame2@example.com"),
        ("Esi Owusu", "esi@example.com"),
    ] {
        repository.insert(&record(name, email)).await.expect("insert");
    }

    let by_email = repository
        .remove_by_email(&address("esi@example.com"))
        .await
        .expect("remove by email");
    let missing = repository
        .remove_by_email(&address("esi@example.com"))
        .await
        .expect("second remove");
    let by_name = repository
        .remove_by_name("Kwame Asante")
        .await
        .expect("remove by name");

    assert_eq!(
        by_email.map(|member| member.details().name().to_owned()),
        Some("Esi Owusu".to_owned())
    );
    assert_eq!(missing, None);
    assert_eq!(by_name.len(), 2);
    assert!(repository.list_all().await.expect("list").is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn records_survive_reopening_the_database(data_dir: DataDir) {
    let original = record("Ama Mensah", "ama@example.com");
    {
        let repository = open_sqlite(&data_dir).expect("open database");
        repository.insert(&original).await.expect("insert");
    }

    let reopened = open_sqlite(&data_dir).expect("reopen database");

    assert_eq!(reopened.list_all().await.expect("list"), vec![original]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unparseable_row_is_reported_as_invalid_persisted_data(data_dir: DataDir) {
    let repository = open_sqlite(&data_dir).expect("open database");
    let manager = ConnectionManager::<SqliteConnection>::new(data_dir.database_url());
    let pool = Pool::builder().max_size(1).build(manager).expect("pool");
    pool.get()
        .expect("connection")
        .batch_execute(
            "INSERT INTO members \
             (name, student_id, index_number, phone, residence, gmail, course, level, timestamp) \
             VALUES ('Ama', NULL, 'UEB1', '024', 'Kotei', 'ama@example.com', 'Law', '500', \
             '2024-01-01 00:00:00');",
        )
        .expect("raw insert");

    let result = repository.list_all().await;

    assert!(matches!(
        result,
        Err(MemberRepositoryError::InvalidPersistedData(_))
    ));
}

#[rstest]
fn schema_setup_is_idempotent(data_dir: DataDir) {
    let manager = ConnectionManager::<SqliteConnection>::new(data_dir.database_url());
    let pool = Pool::builder().max_size(1).build(manager).expect("pool");
    let repository = SqliteMemberRepository::new(pool);

    repository.ensure_schema().expect("first schema setup");
    repository.ensure_schema().expect("second schema setup");
}
