//! CLI command definitions.

pub mod calendars;
pub mod comments;
pub mod events;
pub mod search;
pub mod users;

use clap::{Parser, Subcommand, ValueEnum};

/// Share deadlines, priorities and comments with your friends.
#[derive(Debug, Parser)]
#[command(name = "duedesk")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Username to act as.
    #[arg(long = "as", global = true, env = "DUEDESK_USER")]
    pub accessor: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "pretty")]
    pub format: OutputFormat,

    /// Use a throwaway in-memory store seeded with demo data.
    #[arg(long, global = true)]
    pub memory: bool,

    /// SQLite database path (overrides DUEDESK_SQLITE_PATH).
    #[arg(long, global = true)]
    pub sqlite_path: Option<String>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// The `--as` user, required by every command that reads or writes
    /// someone's data.
    pub fn accessor(&self) -> Result<&str, MissingAccessor> {
        self.accessor.as_deref().ok_or(MissingAccessor)
    }
}

/// Returned when a command needs `--as` and none was given.
#[derive(Debug, Clone, Copy, thiserror::Error)]
#[error("This command needs a user: pass --as <username> or set DUEDESK_USER.")]
pub struct MissingAccessor;

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable output.
    #[default]
    Pretty,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create demo users, events and comments.
    Seed,
    /// User accounts.
    Users(users::UsersCommand),
    /// Calendar management.
    Calendars(calendars::CalendarsCommand),
    /// Event management.
    Events(events::EventsCommand),
    /// Event comments.
    Comments(comments::CommentsCommand),
    /// Search your events.
    Search(search::SearchCommand),
    /// Every event you own, earliest deadline first.
    Agenda,
}
