use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `acad` binary.
#[derive(Debug, Parser)]
#[command(name = "acad", version, about = "Academic session and records lifecycle engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Max results to return
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Database path (overrides `database.path`)
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Account to act as (defaults to the root admin)
    #[arg(long = "as", global = true, value_name = "UNIQUE_ID")]
    pub actor: Option<String>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            limit: self.limit,
            quiet: self.quiet,
            verbose: self.verbose,
            db: self.db.clone(),
            actor: self.actor.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use pretty_assertions::assert_eq;

    use super::subcommands::{AccountCommands, CourseCommands, SessionCommands};
    use super::{Cli, Commands, GlobalFlags, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from([
            "acad", "--format", "raw", "--limit", "10", "--verbose", "session", "current",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert_eq!(cli.limit, Some(10));
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Session {
                action: SessionCommands::Current
            }
        ));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["acad", "account", "stats", "--quiet", "--as", "7"])
            .expect("cli should parse");

        assert!(cli.quiet);
        assert_eq!(cli.actor.as_deref(), Some("7"));
        assert!(matches!(
            cli.command,
            Commands::Account {
                action: AccountCommands::Stats
            }
        ));
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["acad", "--format", "xml", "session", "current"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn global_flags_extraction_copies_values() {
        let cli = Cli::try_parse_from(["acad", "--db", "/tmp/acad.db", "session", "list"])
            .expect("cli should parse");
        let flags: GlobalFlags = cli.global_flags();
        assert_eq!(flags.db.as_deref(), Some("/tmp/acad.db"));
        assert_eq!(flags.actor, None);
    }

    #[test]
    fn register_collects_both_terms() {
        let cli = Cli::try_parse_from([
            "acad", "register", "--student", "s1", "--session", "2024/2025", "--level", "200",
            "--first", "crs-1", "--first", "crs-2", "--second", "crs-3", "--credits", "9",
        ])
        .expect("cli should parse");
        let Commands::Register(args) = cli.command else {
            panic!("expected register");
        };
        assert_eq!(args.first, vec!["crs-1", "crs-2"]);
        assert_eq!(args.second, vec!["crs-3"]);
        assert_eq!(args.credits, 9);
    }

    #[test]
    fn course_update_accepts_repeated_lecturers() {
        let cli = Cli::try_parse_from([
            "acad", "course", "update", "CSC201", "--lecturer", "l1", "--lecturer", "l2",
        ])
        .expect("cli should parse");
        let Commands::Course {
            action: CourseCommands::Update { code, lecturer, .. },
        } = cli.command
        else {
            panic!("expected course update");
        };
        assert_eq!(code, "CSC201");
        assert_eq!(lecturer, vec!["l1", "l2"]);
    }

    #[test]
    fn delete_many_requires_ids() {
        assert!(Cli::try_parse_from(["acad", "account", "delete-many"]).is_err());
        let cli = Cli::try_parse_from(["acad", "account", "delete-many", "1", "2", "3"])
            .expect("cli should parse");
        let Commands::Account {
            action: AccountCommands::DeleteMany { ids },
        } = cli.command
        else {
            panic!("expected delete-many");
        };
        assert_eq!(ids, vec!["1", "2", "3"]);
    }
}
