//! Search CLI commands.

use clap::{Parser, Subcommand};

/// Search commands. Results only ever include events you own.
#[derive(Debug, Parser)]
pub struct SearchCommand {
    #[command(subcommand)]
    pub action: SearchAction,
}

/// Available searches.
#[derive(Debug, Subcommand)]
pub enum SearchAction {
    /// Generic search: User, Title/Description, Date or Priority.
    Query {
        /// Search type.
        #[arg(long = "type")]
        search_type: String,
        /// Search term.
        term: String,
        /// Priority sort order: asc or desc.
        #[arg(long, default_value = "desc")]
        order: String,
    },
    /// Events with exactly this priority.
    Priority {
        /// Priority, 1-5.
        priority: String,
        #[arg(long, default_value = "asc")]
        order: String,
    },
    /// Events due on a date; XX / XXXX match any month, day or year.
    Date {
        /// Date token (MM/DD/YYYY), e.g. 05/XX/XXXX.
        date: String,
        #[arg(long, default_value = "desc")]
        order: String,
    },
}
