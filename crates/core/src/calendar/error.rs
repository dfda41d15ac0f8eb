use thiserror::Error;

/// Errors raised while validating event, comment and calendar fields.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventError {
    #[error("Event title cannot be empty.")]
    EmptyTitle,
    #[error("Event title too long (max 300 characters).")]
    TitleTooLong,
    #[error("Event description too long (max 2000 characters).")]
    DescriptionTooLong,
    #[error("Priority '{0}' must be in the range 1-5 inclusive.")]
    PriorityOutOfRange(i64),
    #[error("Comment cannot be empty.")]
    EmptyComment,
    #[error("Comment too long (max 1000 characters).")]
    CommentTooLong,
    #[error("Calendar title cannot be empty.")]
    EmptyCalendarTitle,
    #[error("Calendar title too long (max 100 characters).")]
    CalendarTitleTooLong,
}
