use clap::Subcommand;

/// Grade ingestion commands.
#[derive(Clone, Debug, Subcommand)]
pub enum GradesCommands {
    /// Upload a batch of grades from a JSON file.
    ///
    /// The file holds an array of `{"student_id", "ca", "exam"}` objects.
    Upload {
        #[arg(long)]
        course: String,
        #[arg(long)]
        session: String,
        #[arg(long)]
        file: String,
    },
}
