use clap::Subcommand;

/// Session lifecycle commands.
#[derive(Clone, Debug, Subcommand)]
pub enum SessionCommands {
    /// Open a new session and promote every student and adviser.
    Open {
        /// Session label, e.g. 2024/2025.
        label: String,
    },
    /// Switch the current session without promoting anyone.
    SetCurrent { label: String },
    /// Show the current session.
    Current,
    /// List sessions, newest first.
    List {
        #[arg(long)]
        limit: Option<u32>,
    },
}
