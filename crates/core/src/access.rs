//! Ownership based authorization.
//!
//! Callers must establish that a resource exists before asking whether the
//! accessor may see it, so a missing id is always reported as not found.

use crate::calendar::{Comment, Event, User};
use crate::error::{PlannerError, Result};

/// Trims and lower-cases a username for storage and comparison.
pub fn normalize_username(username: &str) -> String {
    username.trim().to_lowercase()
}

/// Case-insensitive membership of `accessor` in `owners`.
///
/// ```
/// use duedesk_core::access::is_authorized;
///
/// let owners = vec!["Alice".to_string(), "bob".to_string()];
/// assert!(is_authorized("alice", &owners));
/// assert!(is_authorized("BOB", &owners));
/// assert!(!is_authorized("carol", &owners));
/// ```
pub fn is_authorized<S: AsRef<str>>(accessor: &str, owners: &[S]) -> bool {
    let accessor = normalize_username(accessor);
    owners
        .iter()
        .any(|owner| normalize_username(owner.as_ref()) == accessor)
}

pub fn is_comment_author(accessor: &str, comment: &Comment) -> bool {
    normalize_username(accessor) == normalize_username(&comment.owner)
}

/// `Forbidden` unless the accessor owns the event.
pub fn ensure_event_access(accessor: &str, event: &Event) -> Result<()> {
    if is_authorized(accessor, &event.owners) {
        Ok(())
    } else {
        Err(PlannerError::forbidden(accessor, "event", event.id))
    }
}

/// `Forbidden` unless the accessor wrote the comment.
pub fn ensure_comment_author(accessor: &str, comment: &Comment) -> Result<()> {
    if is_comment_author(accessor, comment) {
        Ok(())
    } else {
        Err(PlannerError::Forbidden(format!(
            "User '{accessor}' is not the author of the comment with id '{}'.",
            comment.id
        )))
    }
}

/// `Forbidden` unless `user` is the accessor. Calendars are private to the
/// user document that embeds them.
pub fn ensure_calendar_owner(
    accessor: &str,
    user: &User,
    calendar_id: impl std::fmt::Display,
) -> Result<()> {
    if normalize_username(accessor) == user.username {
        Ok(())
    } else {
        Err(PlannerError::forbidden(accessor, "calendar", calendar_id))
    }
}

/// Keeps only the events the accessor owns, preserving order.
pub fn retain_authorized(events: Vec<Event>, accessor: &str) -> Vec<Event> {
    events
        .into_iter()
        .filter(|event| is_authorized(accessor, &event.owners))
        .collect()
}
