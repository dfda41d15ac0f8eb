//! User CLI commands.

use clap::{Parser, Subcommand};

/// User account commands.
#[derive(Debug, Parser)]
pub struct UsersCommand {
    #[command(subcommand)]
    pub action: UsersAction,
}

/// Available user actions.
#[derive(Debug, Subcommand)]
pub enum UsersAction {
    /// Create a new user with a default calendar.
    Create {
        /// Username (3-32 letters, digits or underscores).
        username: String,
        /// Password hash produced by your authentication layer.
        #[arg(long)]
        password_hash: String,
        /// First name.
        #[arg(long)]
        first_name: String,
        /// Last name.
        #[arg(long)]
        last_name: String,
    },
    /// Show a user and their calendars.
    Get {
        /// Username. Defaults to --as.
        username: Option<String>,
    },
    /// Change the --as user's name.
    Rename {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
    },
    /// Replace the --as user's password hash.
    Password {
        #[arg(long)]
        password_hash: String,
    },
}
