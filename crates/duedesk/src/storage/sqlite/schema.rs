//! SQLite schema definitions and SQL query constants.
//!
//! Embedded arrays (event owners, event comments, user calendars) are stored
//! as JSON text and queried with `json_each`. Deadline components are
//! denormalized into integer columns so partial date filters stay indexable.

/// SQL statement to create all tables.
pub const CREATE_TABLES: &str = r#"
-- Users table, calendars embedded as a JSON array
CREATE TABLE IF NOT EXISTS users (
    username TEXT PRIMARY KEY,
    id TEXT NOT NULL UNIQUE,
    hashed_password TEXT NOT NULL,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    calendars TEXT NOT NULL
);

-- Events table, owners and comments embedded as JSON arrays
CREATE TABLE IF NOT EXISTS events (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL UNIQUE,
    owners TEXT NOT NULL,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    priority INTEGER NOT NULL,
    deadline TEXT NOT NULL,
    deadline_epoch INTEGER NOT NULL,
    deadline_year INTEGER NOT NULL,
    deadline_month INTEGER NOT NULL,
    deadline_day INTEGER NOT NULL,
    comments TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_events_priority ON events(priority);
CREATE INDEX IF NOT EXISTS idx_events_deadline_parts
    ON events(deadline_year, deadline_month, deadline_day);
"#;

/// Column list shared by every event `SELECT`, in `row_to_event` order.
pub const EVENT_COLUMNS: &str = "id, owners, title, description, priority, deadline, comments";

/// Column list shared by every user `SELECT`, in `row_to_user` order.
pub const USER_COLUMNS: &str = "username, id, hashed_password, first_name, last_name, calendars";

pub const INSERT_EVENT: &str = r#"
INSERT INTO events (id, owners, title, description, priority, deadline,
                    deadline_epoch, deadline_year, deadline_month, deadline_day, comments)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
"#;

pub const REPLACE_EVENT: &str = r#"
UPDATE events
SET owners = ?2, title = ?3, description = ?4, priority = ?5, deadline = ?6,
    deadline_epoch = ?7, deadline_year = ?8, deadline_month = ?9, deadline_day = ?10,
    comments = ?11
WHERE id = ?1
"#;

pub const UPDATE_EVENT_ARRAYS: &str = r#"
UPDATE events
SET owners = ?2, comments = ?3
WHERE id = ?1
"#;

pub const INSERT_USER: &str = r#"
INSERT INTO users (username, id, hashed_password, first_name, last_name, calendars)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)
"#;

pub const UPDATE_USER: &str = r#"
UPDATE users
SET hashed_password = ?2, first_name = ?3, last_name = ?4, calendars = ?5
WHERE username = ?1
"#;
