//! When steps for member registration BDD scenarios.

use super::world::{MembershipWorld, build_form, run_async};
use rollbook::member::domain::RegistrationForm;
use rstest_bdd_macros::when;

#[when(r#""{name}" registers with email "{email}""#)]
fn member_registers(world: &mut MembershipWorld, name: String, email: String) {
    world.last_registration = Some(run_async(world.app.register(build_form(&name, &email))));
}

#[when(r#""{name}" submits a form with a blank course"#)]
fn member_submits_blank_course(world: &mut MembershipWorld, name: String) {
    let form = RegistrationForm {
        course: "   ".to_owned(),
        ..build_form(&name, "blank.course@example.com")
    };
    world.last_registration = Some(run_async(world.app.register(form)));
}

#[when(r#"the administrator logs in with "{password}""#)]
fn administrator_logs_in(world: &mut MembershipWorld, password: String) {
    world.last_login = Some(world.app.login(&password));
}

#[when(r#"the administrator removes "{email}""#)]
fn administrator_removes(world: &mut MembershipWorld, email: String) -> Result<(), eyre::Report> {
    run_async(world.app.remove_by_email(&email))
        .map_err(|err| eyre::eyre!("removal failed: {err}"))?;
    Ok(())
}

#[when(r#"the administrator changes the email of "{original}" to "{replacement}""#)]
fn administrator_changes_email(
    world: &mut MembershipWorld,
    original: String,
    replacement: String,
) -> Result<(), eyre::Report> {
    let report = run_async(world.app.browse(&original))
        .map_err(|err| eyre::eyre!("browse failed: {err}"))?;
    let before = report
        .roster
        .records()
        .first()
        .cloned()
        .ok_or_else(|| eyre::eyre!("no member registered with {original}"))?;
    let form = build_form(before.details().name(), &replacement);
    let after = run_async(world.app.edit(&original, form))
        .map_err(|err| eyre::eyre!("edit failed: {err}"))?;
    world.before_edit = Some(before);
    world.after_edit = Some(after);
    Ok(())
}
