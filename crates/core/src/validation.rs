//! Primitive input guards.
//!
//! Every service operation runs its raw string input through these before a
//! store is touched. Each guard either returns the normalized value or a
//! [`ValidationError`] describing the first problem found.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::calendar::ObjectId;

/// Largest integer an `f64` can represent without loss (2^53 - 1).
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

pub const MIN_USERNAME_LEN: usize = 3;
pub const MAX_USERNAME_LEN: usize = 32;
pub const MAX_NAME_LEN: usize = 50;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("String is empty.")]
    EmptyString,
    #[error("'{0}' is not a number.")]
    NotANumber(String),
    #[error("Number '{0}' is not finite.")]
    NotFinite(String),
    #[error("Number '{0}' is not an integer.")]
    NotAnInteger(String),
    #[error("'{0}' is not a boolean.")]
    NotABoolean(String),
    #[error("Id '{0}' is an invalid object id.")]
    InvalidObjectId(String),
    #[error("'{0}' is not a valid date.")]
    InvalidDate(String),
    #[error("Expected a non-empty array of strings.")]
    EmptyArray,
    #[error("{field} must be at most {max} characters long.")]
    TooLong { field: &'static str, max: usize },
    #[error("Username '{0}' must be 3-32 characters of letters, digits or underscores.")]
    InvalidUsername(String),
    #[error("Name '{0}' may only contain letters, spaces, apostrophes and hyphens.")]
    InvalidName(String),
}

pub type Result<T> = std::result::Result<T, ValidationError>;

/// Fails if `value` is empty, after trimming when `trim` is set.
///
/// ```
/// use duedesk_core::validation::require_string;
///
/// assert_eq!(require_string("  hi ", true).unwrap(), "hi");
/// assert!(require_string("   ", true).is_err());
/// assert_eq!(require_string("   ", false).unwrap(), "   ");
/// ```
pub fn require_string(value: &str, trim: bool) -> Result<&str> {
    let result = if trim { value.trim() } else { value };
    if result.is_empty() {
        return Err(ValidationError::EmptyString);
    }
    Ok(result)
}

/// Fails unless `value` is finite, and additionally a safe integer when
/// `is_integer` is set.
pub fn require_number(value: f64, is_integer: bool) -> Result<f64> {
    if value.is_nan() {
        return Err(ValidationError::NotANumber(value.to_string()));
    }
    if !value.is_finite() {
        return Err(ValidationError::NotFinite(value.to_string()));
    }
    if is_integer && (value.fract() != 0.0 || value.abs() > MAX_SAFE_INTEGER) {
        return Err(ValidationError::NotAnInteger(value.to_string()));
    }
    Ok(value)
}

/// Parses a trimmed decimal string into a finite number.
pub fn parse_number(value: &str) -> Result<f64> {
    let trimmed = require_string(value, true)?;
    let number: f64 = trimmed
        .parse()
        .map_err(|_| ValidationError::NotANumber(trimmed.to_string()))?;
    require_number(number, false)
}

/// Parses a trimmed string into a safe integer.
pub fn parse_integer(value: &str) -> Result<i64> {
    let number = require_number(parse_number(value)?, true)?;
    Ok(number as i64)
}

/// Fails unless `value` is a 24 character hex document id.
pub fn require_identifier(value: &str) -> Result<ObjectId> {
    let trimmed = require_string(value, true)?;
    ObjectId::parse_str(trimmed)
        .ok_or_else(|| ValidationError::InvalidObjectId(trimmed.to_string()))
}

/// Fails unless `value` is an RFC 3339 timestamp whose components exist on
/// the calendar.
pub fn require_date(value: &str) -> Result<DateTime<Utc>> {
    let trimmed = require_string(value, true)?;
    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ValidationError::InvalidDate(trimmed.to_string()))
}

/// Accepts exactly `true` or `false`.
pub fn require_boolean(value: &str) -> Result<bool> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(ValidationError::NotABoolean(other.to_string())),
    }
}

/// Fails unless `values` is non-empty and every element passes
/// [`require_string`].
pub fn require_non_empty_array_of_strings<S: AsRef<str>>(
    values: &[S],
    trim: bool,
) -> Result<Vec<String>> {
    if values.is_empty() {
        return Err(ValidationError::EmptyArray);
    }
    values
        .iter()
        .map(|v| require_string(v.as_ref(), trim).map(str::to_string))
        .collect()
}

/// Fails if `value` holds more than `max` characters.
pub fn require_text_length<'a>(
    value: &'a str,
    field: &'static str,
    max: usize,
) -> Result<&'a str> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(value)
}

/// Trims and lower-cases a username, then checks its shape.
///
/// ```
/// use duedesk_core::validation::require_username;
///
/// assert_eq!(require_username(" User_1 ").unwrap(), "user_1");
/// assert!(require_username("ab").is_err());
/// assert!(require_username("no spaces").is_err());
/// ```
pub fn require_username(value: &str) -> Result<String> {
    let username = require_string(value, true)?.to_lowercase();
    let len = username.chars().count();
    let valid_chars = username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !(MIN_USERNAME_LEN..=MAX_USERNAME_LEN).contains(&len) || !valid_chars {
        return Err(ValidationError::InvalidUsername(username));
    }
    Ok(username)
}

/// Trims a first or last name and checks its characters.
pub fn require_name(value: &str) -> Result<String> {
    let name = require_string(value, true)?;
    require_text_length(name, "Name", MAX_NAME_LEN)?;
    if !name
        .chars()
        .all(|c| c.is_alphabetic() || c == ' ' || c == '\'' || c == '-')
    {
        return Err(ValidationError::InvalidName(name.to_string()));
    }
    Ok(name.to_string())
}
