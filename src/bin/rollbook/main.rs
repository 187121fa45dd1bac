//! Command-line front end for the Rollbook membership ledger.
//!
//! Usage:
//!
//! ```text
//! rollbook register --name "Ama Mensah" --index-number UEB0001 \
//!     --phone 0244000000 --residence Ayeduase --email ama@example.com \
//!     --course Nursing --level 100
//! rollbook admin --password <secret> list --query nursing
//! rollbook admin --password <secret> export --output roster.csv
//! ```
//!
//! Settings come from `rollbook.toml` (see `--config`) and `ROLLBOOK_*`
//! environment variables. Each invocation opens the data directory, runs one
//! operation and exits.

mod cli;
mod output;

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use clap::Parser;
use cli::{AdminArgs, AdminCommand, Cli, Command, RemoveArgs};
use eyre::{Result, WrapErr, eyre};
use rollbook::app::{AppError, RollbookApp};
use rollbook::config::RollbookConfig;
use rollbook::member::domain::MemberRecord;
use std::io::{self, Write};
use std::process::ExitCode;
use tokio::runtime::Builder;
use tracing_subscriber::EnvFilter;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = RollbookConfig::load(&cli.config)
        .wrap_err_with(|| format!("failed to load configuration from {}", cli.config))?;
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to start async runtime")?;

    let Err(report) = runtime.block_on(run(cli, &config)) else {
        return Ok(ExitCode::SUCCESS);
    };
    let friendly = report
        .downcast_ref::<AppError>()
        .and_then(output::friendly_message);
    match friendly {
        Some(message) => {
            writeln!(io::stderr().lock(), "{message}")?;
            Ok(ExitCode::FAILURE)
        }
        None => Err(report),
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run(cli: Cli, config: &RollbookConfig) -> Result<()> {
    let mut app = rollbook::app::open(config)
        .await
        .wrap_err_with(|| format!("failed to open data directory {}", config.data_dir))?;
    let mut out = io::stdout().lock();

    match cli.command {
        Command::Register(form) => {
            let record = app.register(form.into()).await?;
            if cli.json {
                output::json(&mut out, &record)?;
            } else {
                writeln!(
                    out,
                    "Registration successful. Welcome, {}!",
                    record.details().name()
                )?;
            }
            Ok(())
        }
        Command::Admin(admin) => run_admin(&mut app, admin, cli.json, &mut out).await,
    }
}

async fn run_admin<W: Write>(
    app: &mut RollbookApp,
    args: AdminArgs,
    json: bool,
    out: &mut W,
) -> Result<()> {
    let AdminArgs { password, command } = args;
    app.login(&password)?;
    let result = run_admin_command(app, command, json, out).await;
    app.logout();
    result
}

async fn run_admin_command<W: Write>(
    app: &RollbookApp,
    command: AdminCommand,
    json: bool,
    out: &mut W,
) -> Result<()> {
    match command {
        AdminCommand::List(args) => {
            let report = app.browse(&args.query).await?;
            if json {
                output::json(out, report.roster.records())?;
            } else {
                output::list(out, &report)?;
            }
        }
        AdminCommand::Groups(args) => {
            let report = app.browse(&args.query).await?;
            if json {
                output::json(out, &report.groups)?;
            } else {
                output::groups(out, &report)?;
            }
        }
        AdminCommand::Stats(args) => {
            let report = app.browse(&args.query).await?;
            if json {
                output::json(out, &report)?;
            } else {
                output::stats(out, &report)?;
            }
        }
        AdminCommand::Export { query, output } => {
            let bytes = app.export(&query.query).await?;
            match output {
                Some(path) => write_export(&path, &bytes)?,
                None => out.write_all(&bytes)?,
            }
        }
        AdminCommand::Remove(target) => {
            let removed = remove(app, target).await?;
            if json {
                output::json(out, &removed)?;
            } else {
                writeln!(out, "Removed {} record(s):", removed.len())?;
                output::records(out, &removed)?;
            }
        }
        AdminCommand::Edit {
            original_email,
            form,
        } => {
            let edited = app.edit(&original_email, form.into()).await?;
            if json {
                output::json(out, &edited)?;
            } else {
                writeln!(out, "Updated record:")?;
                output::records(out, std::slice::from_ref(&edited))?;
            }
        }
        AdminCommand::Import { path } => {
            let summary = app.import_file(&path).await?;
            if json {
                output::json(out, &summary)?;
            } else {
                output::import_summary(out, &summary)?;
            }
        }
    }
    Ok(())
}

async fn remove(app: &RollbookApp, target: RemoveArgs) -> Result<Vec<MemberRecord>, AppError> {
    match (target.email, target.name) {
        (Some(email), _) => app.remove_by_email(&email).await.map(|record| vec![record]),
        (None, Some(name)) => app.remove_by_name(&name).await,
        (None, None) => Ok(Vec::new()),
    }
}

fn write_export(path: &Utf8Path, bytes: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| eyre!("export path {path} has no file name"))?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority())
        .wrap_err_with(|| format!("failed to open {parent}"))?;
    dir.write(file_name, bytes)
        .wrap_err_with(|| format!("failed to write {path}"))
}
