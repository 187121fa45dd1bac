//! Text and JSON rendering of command results.

use rollbook::app::AppError;
use rollbook::member::{
    domain::{MemberDomainError, MemberRecord},
    ports::MemberRepositoryError,
    services::{
        AdminError, ImportSummary, RegistrationServiceError, RosterReport, RosterServiceError,
    },
};
use serde::Serialize;
use std::io::{self, Write};

/// Writes `value` as pretty JSON followed by a newline.
pub fn json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).map_err(io::Error::other)?;
    writeln!(out)
}

fn record_line<W: Write>(out: &mut W, record: &MemberRecord) -> io::Result<()> {
    let details = record.details();
    writeln!(
        out,
        "{} | {} | {} | {} | {} | {} | {} | {} | {}",
        details.name(),
        details.student_id().unwrap_or("-"),
        details.index_number(),
        details.phone(),
        details.residence(),
        details.email(),
        details.course(),
        details.level(),
        record.timestamp_text(),
    )
}

/// Writes one line per record in registration order.
pub fn records<W: Write>(out: &mut W, records: &[MemberRecord]) -> io::Result<()> {
    for record in records {
        record_line(out, record)?;
    }
    Ok(())
}

/// Writes the matching records followed by a count.
pub fn list<W: Write>(out: &mut W, report: &RosterReport) -> io::Result<()> {
    records(out, report.roster.records())?;
    writeln!(out, "{} record(s)", report.roster.len())
}

/// Writes each course and level group with its members.
pub fn groups<W: Write>(out: &mut W, report: &RosterReport) -> io::Result<()> {
    for group in &report.groups {
        writeln!(
            out,
            "{} / Level {} ({})",
            group.course,
            group.level,
            group.members.len()
        )?;
        for member in &group.members {
            write!(out, "  ")?;
            record_line(out, member)?;
        }
    }
    Ok(())
}

/// Writes course counts, level counts and level proportions.
pub fn stats<W: Write>(out: &mut W, report: &RosterReport) -> io::Result<()> {
    writeln!(out, "Total: {}", report.roster.len())?;
    writeln!(out, "By course:")?;
    for tally in &report.course_counts {
        writeln!(out, "  {}: {}", tally.key, tally.count)?;
    }
    writeln!(out, "By level:")?;
    for tally in &report.level_counts {
        writeln!(out, "  {}: {}", tally.key, tally.count)?;
    }
    writeln!(out, "Level distribution:")?;
    for share in &report.level_shares {
        writeln!(out, "  {}: {:.1}%", share.level, share.percent())?;
    }
    Ok(())
}

/// Writes the outcome of an import.
pub fn import_summary<W: Write>(out: &mut W, summary: &ImportSummary) -> io::Result<()> {
    writeln!(out, "Imported {} record(s)", summary.imported)?;
    for skipped in &summary.skipped {
        writeln!(out, "  skipped row {}: {}", skipped.position, skipped.reason)?;
    }
    Ok(())
}

/// Returns the message shown to the operator for expected failures.
///
/// Unexpected failures return `None` and are reported with full context.
pub fn friendly_message(err: &AppError) -> Option<String> {
    match err {
        AppError::Registration(RegistrationServiceError::Domain(domain))
        | AppError::Roster(RosterServiceError::Domain(domain)) => Some(domain_message(domain)),
        AppError::Registration(RegistrationServiceError::Repository(
            MemberRepositoryError::DuplicateEmail(email),
        ))
        | AppError::Roster(RosterServiceError::Repository(
            MemberRepositoryError::DuplicateEmail(email),
        )) => Some(format!("The email {email} is already registered.")),
        AppError::Roster(RosterServiceError::Repository(MemberRepositoryError::NotFound(
            email,
        ))) => Some(format!("No member is registered under {email}.")),
        AppError::Roster(RosterServiceError::NoMemberNamed(name)) => {
            Some(format!("No member is named '{name}'."))
        }
        AppError::Admin(admin) | AppError::Roster(RosterServiceError::Admin(admin)) => {
            Some(admin_message(*admin).to_owned())
        }
        _ => None,
    }
}

fn domain_message(err: &MemberDomainError) -> String {
    match err {
        MemberDomainError::MissingField(field) => {
            format!("Please fill in all required fields: {field} is missing.")
        }
        MemberDomainError::InvalidLevel(_) => format!("{err}."),
    }
}

const fn admin_message(err: AdminError) -> &'static str {
    match err {
        AdminError::IncorrectCredential => "Incorrect password.",
        AdminError::NotConfigured => {
            "Administrator access is not configured; set an admin password first."
        }
        AdminError::NotAuthenticated => "Please log in as administrator first.",
    }
}
