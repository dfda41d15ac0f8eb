//! Comment CLI commands.

use clap::{Parser, Subcommand};

/// Comment commands.
#[derive(Debug, Parser)]
pub struct CommentsCommand {
    #[command(subcommand)]
    pub action: CommentsAction,
}

/// Available comment actions.
#[derive(Debug, Subcommand)]
pub enum CommentsAction {
    /// Comment on one of your events.
    Add {
        /// Event ID.
        event_id: String,
        /// Comment text.
        text: String,
    },
    /// Get comment by ID.
    Get {
        /// Comment ID.
        id: String,
    },
    /// Show the event a comment belongs to.
    Event {
        /// Comment ID.
        id: String,
    },
    /// Delete one of your comments.
    Delete {
        /// Comment ID.
        id: String,
    },
}
