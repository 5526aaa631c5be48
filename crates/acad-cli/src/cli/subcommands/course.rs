use clap::Subcommand;

/// Course catalogue commands.
#[derive(Clone, Debug, Subcommand)]
pub enum CourseCommands {
    /// Add a course.
    Create {
        #[arg(long)]
        code: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        credits: i64,
        #[arg(long)]
        level: i64,
        /// Canonical semester: 1 or 2.
        #[arg(long)]
        semester: i64,
        /// Lecturer ID (repeatable).
        #[arg(long)]
        lecturer: Vec<String>,
    },
    /// Update a course by code.
    Update {
        code: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        credits: Option<i64>,
        #[arg(long)]
        level: Option<i64>,
        #[arg(long)]
        semester: Option<i64>,
        /// Replace the lecturer set (repeatable).
        #[arg(long, conflicts_with = "clear_lecturers")]
        lecturer: Vec<String>,
        /// Detach every lecturer.
        #[arg(long)]
        clear_lecturers: bool,
    },
    /// Delete a course by code.
    Delete { code: String },
    /// Show a course and its lecturers.
    Get { code: String },
    /// List courses.
    List {
        #[arg(long)]
        level: Option<i64>,
    },
}
