use clap::Subcommand;

/// Account directory and lifecycle commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AccountCommands {
    /// Create an account.
    Create {
        unique_id: String,
        /// admin, lecturer, course-adviser, or student.
        #[arg(long)]
        role: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        mat_number: Option<String>,
        /// Entry level (students only).
        #[arg(long, default_value_t = 0)]
        level: i64,
    },
    /// Approve a pending account.
    Approve { unique_id: String },
    /// Change a staff member's role.
    Role {
        unique_id: String,
        role: String,
    },
    /// Show an account.
    Get { unique_id: String },
    /// List accounts.
    List {
        #[arg(long)]
        role: Option<String>,
        #[arg(long)]
        include_deleted: bool,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Account counts and pending approvals.
    Stats,
    /// Soft-delete an account.
    Delete { unique_id: String },
    /// Restore a soft-deleted account.
    Restore { unique_id: String },
    /// Soft-delete several accounts (admin only).
    DeleteMany {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Deleted accounts whose purge date has passed.
    PurgeCandidates {
        /// RFC 3339 instant to evaluate against (defaults to now).
        #[arg(long)]
        as_of: Option<String>,
    },
}
