//! Event CLI commands.

use clap::{Args, Parser, Subcommand};

use duedesk_core::calendar::EventForm;

/// Event management commands.
#[derive(Debug, Parser)]
pub struct EventsCommand {
    #[command(subcommand)]
    pub action: EventsAction,
}

/// Event fields as typed on the command line.
#[derive(Debug, Clone, Args)]
pub struct EventFields {
    /// Event title.
    #[arg(long)]
    pub title: String,
    /// Event description.
    #[arg(long, default_value = "")]
    pub description: String,
    /// Priority, 1 (lowest) to 5 (highest).
    #[arg(long)]
    pub priority: String,
    /// Deadline date (MM/DD/YYYY).
    #[arg(long)]
    pub date: String,
    /// Deadline time (HH:MM, 24 hour, UTC).
    #[arg(long, default_value = "23:59")]
    pub time: String,
}

impl From<EventFields> for EventForm {
    fn from(fields: EventFields) -> Self {
        EventForm {
            title: fields.title,
            description: fields.description,
            priority: fields.priority,
            date: fields.date,
            time: fields.time,
        }
    }
}

/// Available event actions.
#[derive(Debug, Subcommand)]
pub enum EventsAction {
    /// Create a new event.
    Create {
        #[command(flatten)]
        fields: EventFields,
        /// Also add the event to this calendar.
        #[arg(long)]
        calendar: Option<String>,
    },
    /// Get event by ID.
    Get {
        /// Event ID.
        id: String,
    },
    /// Replace an event's title, description, priority and deadline.
    Edit {
        /// Event ID.
        id: String,
        #[command(flatten)]
        fields: EventFields,
    },
    /// Delete event by ID.
    Delete {
        /// Event ID.
        id: String,
    },
    /// Share an event with another user.
    AddOwner {
        /// Event ID.
        id: String,
        /// Username to add.
        username: String,
    },
    /// Stop sharing an event with a user.
    RemoveOwner {
        /// Event ID.
        id: String,
        /// Username to remove.
        username: String,
    },
}
