mod error;
mod id;
mod operations;
mod requests;
mod sorting;
mod types;

pub use error::EventError;
pub use id::{ObjectId, ParseObjectIdError};
pub use operations::{
    default_calendar_title, validate_calendar_title, validate_comment_text, validate_description,
    validate_priority, validate_title, MAX_CALENDAR_TITLE_LEN, MAX_COMMENT_LEN,
    MAX_DESCRIPTION_LEN, MAX_PRIORITY, MAX_TITLE_LEN, MIN_PRIORITY,
};
pub use requests::{EventDraft, EventForm};
pub use sorting::{build_month_view, group_events_by_date, month_dates, sort_by_deadline};
pub use types::{Calendar, Comment, DayEvents, Event, Timestamp, User};
