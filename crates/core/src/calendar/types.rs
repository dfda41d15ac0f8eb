use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::id::ObjectId;

/// Deadlines and comment creation times are stored in UTC.
pub type Timestamp = DateTime<Utc>;

/// A note attached to an event by one of its owners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: ObjectId,
    /// Username of the author. Only the author may delete the comment.
    pub owner: String,
    pub text: String,
    pub created_on: Timestamp,
}

impl Comment {
    pub fn new(owner: impl Into<String>, text: impl Into<String>, created_on: Timestamp) -> Self {
        Self {
            id: ObjectId::new(),
            owner: owner.into(),
            text: text.into(),
            created_on,
        }
    }

    /// Sets a specific ID for this comment (useful for testing).
    pub fn with_id(mut self, id: ObjectId) -> Self {
        self.id = id;
        self
    }
}

/// A deadline with a priority, shared between one or more owners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: ObjectId,
    /// Lower-cased usernames, unique, in the order they were added.
    pub owners: Vec<String>,
    pub title: String,
    pub description: String,
    /// 1 (lowest) to 5 (highest).
    pub priority: u8,
    pub deadline: Timestamp,
    pub comments: Vec<Comment>,
}

impl Event {
    /// Creates an event owned by a single user with no comments.
    pub fn new(
        owner: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        priority: u8,
        deadline: Timestamp,
    ) -> Self {
        Self {
            id: ObjectId::new(),
            owners: vec![owner.into()],
            title: title.into(),
            description: description.into(),
            priority,
            deadline,
            comments: Vec::new(),
        }
    }

    /// Sets a specific ID for this event (useful for testing).
    pub fn with_id(mut self, id: ObjectId) -> Self {
        self.id = id;
        self
    }

    /// Appends an extra owner.
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owners.push(owner.into());
        self
    }

    pub fn comment(&self, id: ObjectId) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == id)
    }

    /// The calendar day of the deadline (UTC).
    pub fn deadline_date(&self) -> NaiveDate {
        self.deadline.date_naive()
    }
}

/// A named list of event ids, embedded in exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calendar {
    pub id: ObjectId,
    pub title: String,
    pub events: Vec<ObjectId>,
}

impl Calendar {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: ObjectId::new(),
            title: title.into(),
            events: Vec::new(),
        }
    }

    /// Sets a specific ID for this calendar (useful for testing).
    pub fn with_id(mut self, id: ObjectId) -> Self {
        self.id = id;
        self
    }

    pub fn holds(&self, event_id: ObjectId) -> bool {
        self.events.contains(&event_id)
    }
}

/// An account. Calendars live inside the user document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: ObjectId,
    /// Unique, lower-cased.
    pub username: String,
    /// Opaque hash produced by the authentication layer; never rendered.
    #[serde(skip_serializing, default)]
    pub hashed_password: String,
    pub first_name: String,
    pub last_name: String,
    pub calendars: Vec<Calendar>,
}

impl User {
    pub fn new(
        username: impl Into<String>,
        hashed_password: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            id: ObjectId::new(),
            username: username.into(),
            hashed_password: hashed_password.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            calendars: Vec::new(),
        }
    }

    pub fn with_calendar(mut self, calendar: Calendar) -> Self {
        self.calendars.push(calendar);
        self
    }

    pub fn calendar(&self, id: ObjectId) -> Option<&Calendar> {
        self.calendars.iter().find(|c| c.id == id)
    }

    /// True if any of this user's calendars lists the event.
    pub fn holds_event(&self, event_id: ObjectId) -> bool {
        self.calendars.iter().any(|c| c.holds(event_id))
    }
}

/// One day of a month view with the events due on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayEvents {
    pub date: NaiveDate,
    pub events: Vec<Event>,
}

impl DayEvents {
    pub fn new(date: NaiveDate, events: Vec<Event>) -> Self {
        Self { date, events }
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
