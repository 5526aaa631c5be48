use clap::Subcommand;

/// Course adviser commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AdviserCommands {
    /// Make an adviser the active adviser for a level.
    Assign {
        adviser: String,
        #[arg(long)]
        level: i64,
        /// Session label (defaults to the current session).
        #[arg(long)]
        session: Option<String>,
    },
    /// Publish results for the level an adviser handles.
    Publish {
        /// Adviser ID (defaults to the acting account).
        #[arg(long)]
        adviser: Option<String>,
        #[arg(long)]
        level: i64,
        /// Session label (defaults to the current session).
        #[arg(long)]
        session: Option<String>,
    },
    /// List an adviser's assignments.
    List { adviser: String },
}
