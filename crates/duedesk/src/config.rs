use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Path to SQLite database file (default: "duedesk.db")
    pub sqlite_path: String,
    /// Break priority ties in search results by deadline, earliest first (default: true)
    pub deadline_tiebreak: bool,
    /// Add the accessor's ownership to the store predicate of every search,
    /// on top of the post-filter that always runs (default: true)
    pub scoped_search: bool,
    /// Number of demo users created by `seed` (default: 5)
    pub seed_users: usize,
    /// Number of events created per demo user (default: 5)
    pub seed_events_per_user: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `DUEDESK_SQLITE_PATH` - SQLite database path (default: "duedesk.db")
    /// - `DUEDESK_DEADLINE_TIEBREAK` - `true` or `false` (default: true)
    /// - `DUEDESK_SCOPED_SEARCH` - `true` or `false` (default: true)
    /// - `DUEDESK_SEED_USERS` - demo users to create (default: 5)
    /// - `DUEDESK_SEED_EVENTS` - demo events per user (default: 5)
    pub fn from_env() -> Self {
        Self::from_source(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_source(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            sqlite_path: lookup("DUEDESK_SQLITE_PATH").unwrap_or_else(|| "duedesk.db".to_string()),
            deadline_tiebreak: parsed(&lookup, "DUEDESK_DEADLINE_TIEBREAK").unwrap_or(true),
            scoped_search: parsed(&lookup, "DUEDESK_SCOPED_SEARCH").unwrap_or(true),
            seed_users: parsed(&lookup, "DUEDESK_SEED_USERS").unwrap_or(5),
            seed_events_per_user: parsed(&lookup, "DUEDESK_SEED_EVENTS").unwrap_or(5),
        }
    }
}

fn parsed<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self::from_source(|_| None)
    }
}
