//! Request types for event creation and editing.
//!
//! An [`EventForm`] carries the raw strings a form submits; an
//! [`EventDraft`] carries the same fields after validation. Services only
//! accept drafts, and a draft can only be built by [`EventDraft::new`], so
//! nothing unvalidated reaches a store.

use serde::{Deserialize, Serialize};

use super::operations::{validate_description, validate_priority, validate_title};
use super::types::{Event, Timestamp};
use crate::datetime::{parse_form_date, parse_time_string, to_timestamp};
use crate::validation::parse_integer;
use crate::Result;

/// Validated mutable fields of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventDraft {
    title: String,
    description: String,
    priority: u8,
    deadline: Timestamp,
}

impl EventDraft {
    /// Validates already-typed fields.
    pub fn new(
        title: &str,
        description: &str,
        priority: i64,
        deadline: Timestamp,
    ) -> Result<Self> {
        Ok(Self {
            title: validate_title(title)?,
            description: validate_description(description)?,
            priority: validate_priority(priority)?,
            deadline,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn priority(&self) -> u8 {
        self.priority
    }

    pub fn deadline(&self) -> Timestamp {
        self.deadline
    }

    /// A new event owned by `owner` alone.
    pub fn into_event(self, owner: impl Into<String>) -> Event {
        Event::new(
            owner,
            self.title,
            self.description,
            self.priority,
            self.deadline,
        )
    }

    /// Overwrites the mutable fields of `event`, keeping its id, owners and
    /// comments.
    pub fn apply_to(self, event: Event) -> Event {
        Event {
            title: self.title,
            description: self.description,
            priority: self.priority,
            deadline: self.deadline,
            ..event
        }
    }
}

/// Raw event form input: `MM/DD/YYYY` date and `HH:MM` time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventForm {
    pub title: String,
    pub description: String,
    pub priority: String,
    pub date: String,
    pub time: String,
}

impl EventForm {
    /// Validates every field and combines date and time into a UTC deadline.
    ///
    /// ```
    /// use duedesk_core::calendar::EventForm;
    ///
    /// let form = EventForm {
    ///     title: "Ship release".into(),
    ///     description: "Tag and publish".into(),
    ///     priority: "4".into(),
    ///     date: "03/15/2024".into(),
    ///     time: "17:00".into(),
    /// };
    /// let draft = form.into_draft().unwrap();
    /// assert_eq!(draft.priority(), 4);
    /// assert_eq!(draft.deadline().to_rfc3339(), "2024-03-15T17:00:00+00:00");
    /// ```
    pub fn into_draft(self) -> Result<EventDraft> {
        let priority = parse_integer(&self.priority)?;
        let date = parse_form_date(&self.date)?;
        let time = parse_time_string(&self.time)?;
        let deadline = to_timestamp(date, time)?;
        EventDraft::new(&self.title, &self.description, priority, deadline)
    }
}
