use clap::{Args, Subcommand};

use crate::cli::subcommands::{
    AccountCommands, AdviserCommands, CourseCommands, GradesCommands, SessionCommands,
};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Create the database, run migrations, and seed the root admin.
    Init,
    /// Academic sessions and promotion.
    Session {
        #[command(subcommand)]
        action: SessionCommands,
    },
    /// Course adviser assignment and result publication.
    Adviser {
        #[command(subcommand)]
        action: AdviserCommands,
    },
    /// Course catalogue.
    Course {
        #[command(subcommand)]
        action: CourseCommands,
    },
    /// Register a student's courses for a session.
    Register(RegisterArgs),
    /// Show a student's registration for a session.
    Registration(RegistrationArgs),
    /// Grade ingestion.
    Grades {
        #[command(subcommand)]
        action: GradesCommands,
    },
    /// Published results for a student, or all results for a course.
    Results(ResultsArgs),
    /// Accounts and their lifecycle.
    Account {
        #[command(subcommand)]
        action: AccountCommands,
    },
    /// Dump JSON schema for an entity type.
    Schema(SchemaArgs),
}

/// Arguments for `acad register`.
#[derive(Clone, Debug, Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub student: String,
    #[arg(long)]
    pub session: String,
    /// Student level for this registration.
    #[arg(long)]
    pub level: i64,
    /// Course ID taken in the first semester (repeatable).
    #[arg(long)]
    pub first: Vec<String>,
    /// Course ID taken in the second semester (repeatable).
    #[arg(long)]
    pub second: Vec<String>,
    /// Total credit units registered.
    #[arg(long)]
    pub credits: i64,
}

/// Arguments for `acad registration`.
#[derive(Clone, Debug, Args)]
pub struct RegistrationArgs {
    #[arg(long)]
    pub student: String,
    #[arg(long)]
    pub session: String,
}

/// Arguments for `acad results`.
#[derive(Clone, Debug, Args)]
pub struct ResultsArgs {
    /// Student whose published results to show.
    #[arg(long, required_unless_present = "course", conflicts_with = "course")]
    pub student: Option<String>,
    /// Course ID whose results to show (staff view, includes unpublished).
    #[arg(long, requires = "session")]
    pub course: Option<String>,
    #[arg(long)]
    pub session: Option<String>,
}

/// Arguments for `acad schema`.
#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Entity name, e.g. `account`, `course-result`.
    pub entity: String,
}
