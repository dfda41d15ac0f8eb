use super::error::EventError;

pub const MAX_TITLE_LEN: usize = 300;
pub const MAX_DESCRIPTION_LEN: usize = 2000;
pub const MAX_COMMENT_LEN: usize = 1000;
pub const MAX_CALENDAR_TITLE_LEN: usize = 100;
pub const MIN_PRIORITY: u8 = 1;
pub const MAX_PRIORITY: u8 = 5;

/// Trims and bounds an event title. Length is counted in characters.
pub fn validate_title(title: &str) -> Result<String, EventError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(EventError::EmptyTitle);
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(EventError::TitleTooLong);
    }
    Ok(title.to_string())
}

/// Descriptions may be empty; whitespace is kept as entered.
pub fn validate_description(description: &str) -> Result<String, EventError> {
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(EventError::DescriptionTooLong);
    }
    Ok(description.to_string())
}

/// Narrows a validated integer to a 1-5 priority.
///
/// ```
/// use duedesk_core::calendar::validate_priority;
///
/// assert_eq!(validate_priority(5), Ok(5));
/// assert!(validate_priority(0).is_err());
/// assert!(validate_priority(6).is_err());
/// ```
pub fn validate_priority(priority: i64) -> Result<u8, EventError> {
    if priority < MIN_PRIORITY as i64 || priority > MAX_PRIORITY as i64 {
        return Err(EventError::PriorityOutOfRange(priority));
    }
    Ok(priority as u8)
}

pub fn validate_comment_text(text: &str) -> Result<String, EventError> {
    if text.trim().is_empty() {
        return Err(EventError::EmptyComment);
    }
    if text.chars().count() > MAX_COMMENT_LEN {
        return Err(EventError::CommentTooLong);
    }
    Ok(text.to_string())
}

pub fn validate_calendar_title(title: &str) -> Result<String, EventError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(EventError::EmptyCalendarTitle);
    }
    if title.chars().count() > MAX_CALENDAR_TITLE_LEN {
        return Err(EventError::CalendarTitleTooLong);
    }
    Ok(title.to_string())
}

/// Title of the calendar every new account starts with.
pub fn default_calendar_title(first_name: &str) -> String {
    format!("{first_name}'s Calendar")
}
