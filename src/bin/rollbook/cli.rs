//! Command-line arguments.

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use rollbook::config::DEFAULT_CONFIG_FILE;
use rollbook::member::domain::RegistrationForm;

/// Membership registration ledger.
#[derive(Debug, Parser)]
#[command(name = "rollbook", version)]
pub struct Cli {
    /// Configuration file.
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: Utf8PathBuf,

    /// Enable debug logging unless `RUST_LOG` is set.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print results as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    /// Operation to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level operations.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Submit a registration.
    Register(FormArgs),

    /// Administrator operations.
    Admin(AdminArgs),
}

/// Registration form fields.
///
/// Every field defaults to empty so that a missing value is reported by
/// form validation rather than by argument parsing.
#[derive(Debug, Clone, Args)]
pub struct FormArgs {
    /// Full name.
    #[arg(long, default_value_t)]
    pub name: String,
    /// Student identifier.
    #[arg(long, default_value_t)]
    pub student_id: String,
    /// Index number.
    #[arg(long, default_value_t)]
    pub index_number: String,
    /// Phone number.
    #[arg(long, default_value_t)]
    pub phone: String,
    /// Place of residence.
    #[arg(long, default_value_t)]
    pub residence: String,
    /// Email address.
    #[arg(long, default_value_t)]
    pub email: String,
    /// Course of study.
    #[arg(long, default_value_t)]
    pub course: String,
    /// Level: 100, 200, 300, 400 or Graduate.
    #[arg(long, default_value_t)]
    pub level: String,
}

impl From<FormArgs> for RegistrationForm {
    fn from(args: FormArgs) -> Self {
        Self {
            name: args.name,
            student_id: args.student_id,
            index_number: args.index_number,
            phone: args.phone,
            residence: args.residence,
            email: args.email,
            course: args.course,
            level: args.level,
        }
    }
}

/// Administrator login and operation.
#[derive(Debug, Args)]
pub struct AdminArgs {
    /// Administrator password.
    #[arg(long)]
    pub password: String,

    /// Operation to run once logged in.
    #[command(subcommand)]
    pub command: AdminCommand,
}

/// Operations available to a logged-in administrator.
#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// List records matching a search.
    List(QueryArgs),

    /// Show records grouped by course and level.
    Groups(QueryArgs),

    /// Show course and level counts with level proportions.
    Stats(QueryArgs),

    /// Write matching records as CSV.
    Export {
        /// Search filter.
        #[command(flatten)]
        query: QueryArgs,
        /// Output file; standard output when omitted.
        #[arg(short, long)]
        output: Option<Utf8PathBuf>,
    },

    /// Remove records by email or by exact name.
    Remove(RemoveArgs),

    /// Replace every field of a record, keeping its timestamp.
    Edit {
        /// Email the record is currently registered under.
        original_email: String,
        /// Replacement values.
        #[command(flatten)]
        form: FormArgs,
    },

    /// Import a roster CSV without sending confirmations.
    Import {
        /// CSV file to read.
        path: Utf8PathBuf,
    },
}

/// Search filter shared by the browsing operations.
#[derive(Debug, Clone, Default, Args)]
pub struct QueryArgs {
    /// Case-insensitive text to match in any field; empty matches all.
    #[arg(short, long, default_value_t)]
    pub query: String,
}

/// Removal target.
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct RemoveArgs {
    /// Email of the record to remove.
    #[arg(long)]
    pub email: Option<String>,
    /// Exact name; every record with this name is removed.
    #[arg(long)]
    pub name: Option<String>,
}
