//! Calendar CLI commands.

use clap::{Parser, Subcommand};

/// Calendar management commands.
#[derive(Debug, Parser)]
pub struct CalendarsCommand {
    #[command(subcommand)]
    pub action: CalendarsAction,
}

/// Available calendar actions.
#[derive(Debug, Subcommand)]
pub enum CalendarsAction {
    /// Create a new calendar.
    Create {
        /// Calendar title.
        title: String,
    },
    /// Get calendar by ID.
    Get {
        /// Calendar ID.
        id: String,
    },
    /// Add one of your events to one of your calendars.
    AddEvent {
        /// Calendar ID.
        calendar_id: String,
        /// Event ID.
        event_id: String,
    },
    /// Remove an event from every calendar that lists it.
    RemoveEvent {
        /// Event ID.
        event_id: String,
    },
    /// Show a month of a calendar, one line per day with events.
    Month {
        /// Calendar ID.
        calendar_id: String,
        /// Year, e.g. 2024.
        #[arg(long)]
        year: i32,
        /// Month, 1-12.
        #[arg(long)]
        month: u32,
    },
}
