//! Administrator operations through the membership app.

use super::helpers::{Harness, form, harness, placed_form};
use rollbook::app::AppError;
use rollbook::member::{
    adapters::flat_file::decode_roster,
    domain::{Level, MemberRecord},
    services::{AdminError, RosterServiceError},
};
use rstest::{fixture, rstest};
use std::collections::BTreeMap;

const MEMBERS: [(&str, &str, &str, &str, &str); 6] = [
    ("Ama Mensah", "ama@example.com", "Nursing", "100", "Ayeduase"),
    ("Kofi Boateng", "kofi@example.com", "Law", "Graduate", "Bomso"),
    ("Esi Owusu", "esi@example.com", "Nursing", "100", "Kotei"),
    ("Yaw Darko", "yaw@example.com", "Pharmacy", "300", "Ayeduase"),
    ("Akua Asante", "akua@example.com", "Law", "100", "Tech Junction"),
    ("Kwame Asante", "kwame@example.com", "Nursing", "400", "Boadi"),
];

/// Harness seeded with [`MEMBERS`] and logged in.
#[fixture]
fn seeded(harness: Harness) -> Harness {
    let mut seeded = harness;
    tokio::task::block_in_place(|| {
        tokio::runtime::Handle::current().block_on(async {
            for (name, email, course, level, residence) in MEMBERS {
                seeded
                    .app
                    .register(placed_form(name, email, course, level, residence))
                    .await
                    .expect("seed registration");
            }
        });
    });
    seeded.login();
    seeded
}

fn emails(records: &[MemberRecord]) -> Vec<&str> {
    records.iter().map(|member| member.email().as_str()).collect()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn administrator_operations_need_login(harness: Harness) {
    let browse = harness.app.browse("").await;
    let export = harness.app.export("").await;
    let remove = harness.app.remove_by_name("Ama Mensah").await;

    for result in [browse.err(), export.err(), remove.err()] {
        assert!(matches!(
            result,
            Some(AppError::Roster(RosterServiceError::Admin(
                AdminError::NotAuthenticated
            )))
        ));
    }
}

#[rstest]
fn wrong_password_is_rejected(mut harness: Harness) {
    let result = harness.app.login("letmein");

    assert!(matches!(
        result,
        Err(AppError::Admin(AdminError::IncorrectCredential))
    ));
    assert!(!harness.app.is_admin());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn residence_search_finds_the_single_match(seeded: Harness) {
    let report = seeded.app.browse("tech junction").await.expect("browse");

    assert_eq!(emails(report.roster.records()), vec!["akua@example.com"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn level_counts_agree_with_independent_grouping(seeded: Harness) {
    let report = seeded.app.browse("").await.expect("browse");

    let mut expected: BTreeMap<Level, usize> = BTreeMap::new();
    for record in report.roster.records() {
        *expected.entry(record.details().level()).or_default() += 1;
    }
    let shown: BTreeMap<Level, usize> = report
        .level_counts
        .iter()
        .map(|tally| (tally.key, tally.count))
        .collect();

    assert_eq!(shown, expected);
    assert_eq!(
        report.level_counts.first().map(|tally| (tally.key, tally.count)),
        Some((Level::L100, 3))
    );
    let share_total: usize = report.level_shares.iter().map(|share| share.count).sum();
    assert_eq!(share_total, MEMBERS.len());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn groups_follow_course_then_level(seeded: Harness) {
    let report = seeded.app.browse("").await.expect("browse");

    let keys: Vec<(&str, Level)> = report
        .groups
        .iter()
        .map(|group| (group.course.as_str(), group.level))
        .collect();

    assert_eq!(
        keys,
        vec![
            ("Law", Level::L100),
            ("Law", Level::Graduate),
            ("Nursing", Level::L100),
            ("Nursing", Level::L400),
            ("Pharmacy", Level::L300),
        ]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn removed_member_disappears_from_browsing_and_mirror(seeded: Harness) {
    seeded
        .app
        .remove_by_email("esi@example.com")
        .await
        .expect("removal");

    let report = seeded.app.browse("").await.expect("browse");
    assert!(!emails(report.roster.records()).contains(&"esi@example.com"));
    assert_eq!(seeded.mirror.snapshot(), report.roster.records());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn removing_by_unknown_name_reports_it(seeded: Harness) {
    let result = seeded.app.remove_by_name("Nobody Here").await;

    assert!(matches!(
        result,
        Err(AppError::Roster(RosterServiceError::NoMemberNamed(_)))
    ));
    assert_eq!(seeded.mirror.snapshot().len(), MEMBERS.len());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn edit_keeps_the_registration_time(seeded: Harness) {
    let before = seeded.app.browse("kofi@").await.expect("browse");
    let original = before.roster.records().first().expect("kofi").clone();

    let edited = seeded
        .app
        .edit("kofi@example.com", form("Kofi Boateng", "kofi.b@example.com"))
        .await
        .expect("edit");

    assert_eq!(edited.registered_at(), original.registered_at());
    assert_eq!(edited.details().course(), "Nursing");
    let mirrored = seeded.mirror.snapshot();
    assert!(mirrored.contains(&edited));
    assert!(!emails(&mirrored).contains(&"kofi@example.com"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn export_of_filtered_view_matches_browse(seeded: Harness) {
    let bytes = seeded.app.export("law").await.expect("export");
    let rows = decode_roster(bytes.as_slice()).expect("exported csv decodes");
    let report = seeded.app.browse("law").await.expect("browse");

    let exported: Vec<&str> = rows.iter().map(|row| row.email.as_str()).collect();
    assert_eq!(exported, emails(report.roster.records()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn empty_query_exports_everything(seeded: Harness) {
    let bytes = seeded.app.export("").await.expect("export");
    let rows = decode_roster(bytes.as_slice()).expect("exported csv decodes");

    assert_eq!(rows.len(), MEMBERS.len());
}
