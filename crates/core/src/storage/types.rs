//! Store predicates, sort keys and update operators.
//!
//! These are plain data so that every backend can interpret them: the
//! in-memory store evaluates them directly with [`EventFilter::matches`] and
//! friends, the SQLite store compiles them to SQL.

use std::cmp::Ordering;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::calendar::{Calendar, Comment, Event, ObjectId, User};

/// A component of an event deadline, read in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeadlinePart {
    Year,
    Month,
    Day,
}

impl DeadlinePart {
    pub fn of(&self, event: &Event) -> i32 {
        match self {
            DeadlinePart::Year => event.deadline.year(),
            DeadlinePart::Month => event.deadline.month() as i32,
            DeadlinePart::Day => event.deadline.day() as i32,
        }
    }
}

/// Predicate over the events collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventFilter {
    All,
    Id(ObjectId),
    Ids(Vec<ObjectId>),
    /// The owners array contains this exact value.
    OwnersContain(String),
    /// Case-insensitive substring of the title or the description.
    TextContains(String),
    PriorityEq(u8),
    DeadlinePart { part: DeadlinePart, value: i32 },
    /// The event embeds a comment with this id.
    CommentId(ObjectId),
    /// Every inner filter matches. An empty list matches everything.
    And(Vec<EventFilter>),
}

impl EventFilter {
    pub fn matches(&self, event: &Event) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Id(id) => event.id == *id,
            EventFilter::Ids(ids) => ids.contains(&event.id),
            EventFilter::OwnersContain(owner) => event.owners.iter().any(|o| o == owner),
            EventFilter::TextContains(text) => {
                let needle = text.to_lowercase();
                event.title.to_lowercase().contains(&needle)
                    || event.description.to_lowercase().contains(&needle)
            }
            EventFilter::PriorityEq(priority) => event.priority == *priority,
            EventFilter::DeadlinePart { part, value } => part.of(event) == *value,
            EventFilter::CommentId(id) => event.comments.iter().any(|c| c.id == *id),
            EventFilter::And(filters) => filters.iter().all(|f| f.matches(event)),
        }
    }

    /// Conjunction with another filter, flattening nested `And`s.
    pub fn and(self, other: EventFilter) -> EventFilter {
        let mut parts = match self {
            EventFilter::And(parts) => parts,
            EventFilter::All => Vec::new(),
            single => vec![single],
        };
        match other {
            EventFilter::And(more) => parts.extend(more),
            EventFilter::All => {}
            single => parts.push(single),
        }
        EventFilter::And(parts)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortField {
    Priority,
    Deadline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn asc(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Ascending,
        }
    }

    pub fn desc(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Descending,
        }
    }

    fn compare(&self, a: &Event, b: &Event) -> Ordering {
        let ordering = match self.field {
            SortField::Priority => a.priority.cmp(&b.priority),
            SortField::Deadline => a.deadline.cmp(&b.deadline),
        };
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Lexicographic sort over several keys. Ties keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSort {
    pub keys: Vec<SortKey>,
}

impl EventSort {
    /// No ordering beyond insertion order.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn by(key: SortKey) -> Self {
        Self { keys: vec![key] }
    }

    pub fn then(mut self, key: SortKey) -> Self {
        self.keys.push(key);
        self
    }

    pub fn compare(&self, a: &Event, b: &Event) -> Ordering {
        self.keys
            .iter()
            .map(|key| key.compare(a, b))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }

    /// Stable sort in place.
    pub fn apply(&self, events: &mut [Event]) {
        if !self.keys.is_empty() {
            events.sort_by(|a, b| self.compare(a, b));
        }
    }
}

/// Array operators applied to a single event document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventUpdate {
    PushOwner(String),
    PullOwner(String),
    PushComment(Comment),
    PullComment(ObjectId),
}

impl EventUpdate {
    /// Applies the operator, returning whether the document changed.
    pub fn apply(&self, event: &mut Event) -> bool {
        match self {
            EventUpdate::PushOwner(owner) => {
                event.owners.push(owner.clone());
                true
            }
            EventUpdate::PullOwner(owner) => {
                let before = event.owners.len();
                event.owners.retain(|o| o != owner);
                event.owners.len() != before
            }
            EventUpdate::PushComment(comment) => {
                event.comments.push(comment.clone());
                true
            }
            EventUpdate::PullComment(id) => {
                let before = event.comments.len();
                event.comments.retain(|c| c.id != *id);
                event.comments.len() != before
            }
        }
    }
}

/// Outcome of an update, replace or update-many call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteResult {
    pub matched: u64,
    pub modified: u64,
}

impl WriteResult {
    pub fn new(matched: u64, modified: u64) -> Self {
        Self { matched, modified }
    }

    pub fn unmatched() -> Self {
        Self::default()
    }
}

/// Predicate over the users collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserFilter {
    Username(String),
    /// The user embeds a calendar with this id.
    CalendarId(ObjectId),
    /// One of the user's calendars lists this event.
    HoldsEvent(ObjectId),
    UsernameHoldsEvent { username: String, event_id: ObjectId },
}

impl UserFilter {
    pub fn matches(&self, user: &User) -> bool {
        match self {
            UserFilter::Username(username) => user.username == *username,
            UserFilter::CalendarId(id) => user.calendar(*id).is_some(),
            UserFilter::HoldsEvent(event_id) => user.holds_event(*event_id),
            UserFilter::UsernameHoldsEvent { username, event_id } => {
                user.username == *username && user.holds_event(*event_id)
            }
        }
    }
}

/// Operators applied to a user document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserUpdate {
    PushCalendar(Calendar),
    PushCalendarEvent {
        calendar_id: ObjectId,
        event_id: ObjectId,
    },
    /// Removes the event id from every calendar of the user.
    PullEvent(ObjectId),
    SetName {
        first_name: String,
        last_name: String,
    },
    SetPassword(String),
}

impl UserUpdate {
    /// Applies the operator, returning whether the document changed.
    ///
    /// `$set`-style operators count as a modification whenever they match.
    pub fn apply(&self, user: &mut User) -> bool {
        match self {
            UserUpdate::PushCalendar(calendar) => {
                user.calendars.push(calendar.clone());
                true
            }
            UserUpdate::PushCalendarEvent {
                calendar_id,
                event_id,
            } => match user.calendars.iter_mut().find(|c| c.id == *calendar_id) {
                Some(calendar) => {
                    calendar.events.push(*event_id);
                    true
                }
                None => false,
            },
            UserUpdate::PullEvent(event_id) => {
                let mut changed = false;
                for calendar in &mut user.calendars {
                    let before = calendar.events.len();
                    calendar.events.retain(|id| id != event_id);
                    changed |= calendar.events.len() != before;
                }
                changed
            }
            UserUpdate::SetName {
                first_name,
                last_name,
            } => {
                user.first_name = first_name.clone();
                user.last_name = last_name.clone();
                true
            }
            UserUpdate::SetPassword(hash) => {
                user.hashed_password = hash.clone();
                true
            }
        }
    }
}
