//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types.
//! These are testable in isolation without database access.

use chrono::{DateTime, Datelike, Utc};
use rusqlite::types::Type;
use rusqlite::Row;
use serde::de::DeserializeOwned;
use serde::Serialize;

use duedesk_core::calendar::{Event, ObjectId, User};
use duedesk_core::storage::RepositoryError;

/// Convert a SQLite row to an Event.
///
/// Expected columns: id, owners, title, description, priority, deadline, comments
pub fn row_to_event(row: &Row) -> rusqlite::Result<Event> {
    let id: String = row.get(0)?;
    let owners: String = row.get(1)?;
    let title: String = row.get(2)?;
    let description: String = row.get(3)?;
    let priority: u8 = row.get(4)?;
    let deadline: String = row.get(5)?;
    let comments: String = row.get(6)?;

    Ok(Event {
        id: parse_object_id(0, &id)?,
        owners: parse_json(1, &owners)?,
        title,
        description,
        priority,
        deadline: parse_datetime(5, &deadline)?,
        comments: parse_json(6, &comments)?,
    })
}

/// Convert a SQLite row to a User.
///
/// Expected columns: username, id, hashed_password, first_name, last_name, calendars
pub fn row_to_user(row: &Row) -> rusqlite::Result<User> {
    let username: String = row.get(0)?;
    let id: String = row.get(1)?;
    let hashed_password: String = row.get(2)?;
    let first_name: String = row.get(3)?;
    let last_name: String = row.get(4)?;
    let calendars: String = row.get(5)?;

    Ok(User {
        id: parse_object_id(1, &id)?,
        username,
        hashed_password,
        first_name,
        last_name,
        calendars: parse_json(5, &calendars)?,
    })
}

/// Column values derived from an event deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeadlineColumns {
    pub rfc3339: String,
    pub epoch_micros: i64,
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

pub fn deadline_columns(deadline: &DateTime<Utc>) -> DeadlineColumns {
    DeadlineColumns {
        rfc3339: format_datetime(deadline),
        epoch_micros: deadline.timestamp_micros(),
        year: deadline.year(),
        month: deadline.month(),
        day: deadline.day(),
    }
}

/// Serialize an embedded array to a JSON column value.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, RepositoryError> {
    serde_json::to_string(value).map_err(|e| RepositoryError::Serialization(e.to_string()))
}

/// Same as [`to_json`] but inside a connection closure.
pub fn to_json_sql<T: Serialize + ?Sized>(value: &T) -> rusqlite::Result<String> {
    serde_json::to_string(value).map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

/// Format a DateTime<Utc> for SQLite storage (RFC 3339).
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn conversion_error(
    column: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(err))
}

fn parse_json<T: DeserializeOwned>(column: usize, s: &str) -> rusqlite::Result<T> {
    serde_json::from_str(s).map_err(|e| conversion_error(column, e))
}

fn parse_object_id(column: usize, s: &str) -> rusqlite::Result<ObjectId> {
    s.parse().map_err(|e| conversion_error(column, e))
}

fn parse_datetime(column: usize, s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(column, e))
}
