//! Calendar operations. Calendars are embedded in the user who owns them and
//! hold event ids only.

use duedesk_core::access::{ensure_calendar_owner, retain_authorized};
use duedesk_core::calendar::{
    build_month_view, validate_calendar_title, Calendar, DayEvents, ObjectId,
};
use duedesk_core::datetime::first_of_month;
use duedesk_core::storage::{EventFilter, EventSort, UserFilter, UserUpdate};
use duedesk_core::validation::require_identifier;
use duedesk_core::{PlannerError, Result};

use crate::error::ensure_modified;
use crate::events::{get_event, username_arg};
use crate::state::AppState;

/// Loads a calendar the accessor owns. `accessor` must be canonical.
pub(crate) async fn find_calendar(
    state: &AppState,
    calendar_id: ObjectId,
    accessor: &str,
) -> Result<Calendar> {
    let not_found = || PlannerError::not_found("a calendar", calendar_id);

    let user = state
        .users
        .find_user(&UserFilter::CalendarId(calendar_id))
        .await?
        .ok_or_else(not_found)?;
    ensure_calendar_owner(accessor, &user, calendar_id).inspect_err(|_| {
        tracing::warn!(accessor, %calendar_id, "Calendar access denied");
    })?;

    user.calendar(calendar_id).cloned().ok_or_else(not_found)
}

/// Adds an empty calendar to the accessor's account.
pub async fn create_calendar(state: &AppState, accessor: &str, title: &str) -> Result<Calendar> {
    let title = validate_calendar_title(title)?;
    let accessor = username_arg(accessor)?;

    let calendar = Calendar::new(title);
    let result = state
        .users
        .update_user(
            &UserFilter::Username(accessor.clone()),
            &UserUpdate::PushCalendar(calendar.clone()),
        )
        .await?;
    if result.matched == 0 {
        return Err(PlannerError::NotFound(format!(
            "Could not find a user with username '{accessor}'."
        )));
    }
    ensure_modified(result, || format!("create a calendar for user '{accessor}'"))?;

    tracing::info!(calendar_id = %calendar.id, owner = %accessor, "Created calendar");
    Ok(calendar)
}

/// Gets a calendar by id.
pub async fn get_calendar(
    state: &AppState,
    calendar_id: &str,
    accessor: &str,
) -> Result<Calendar> {
    let calendar_id = require_identifier(calendar_id)?;
    let accessor = username_arg(accessor)?;
    find_calendar(state, calendar_id, &accessor).await
}

/// Links an event the accessor owns into one of their calendars.
pub async fn add_event_to_calendar(
    state: &AppState,
    calendar_id: &str,
    event_id: &str,
    accessor: &str,
) -> Result<Calendar> {
    let mut calendar = get_calendar(state, calendar_id, accessor).await?;
    let event = get_event(state, event_id, accessor).await?;

    if calendar.holds(event.id) {
        return Err(PlannerError::InvalidArgument(format!(
            "The calendar with id '{}' already contains the event with id '{}'.",
            calendar.id, event.id
        )));
    }

    let result = state
        .users
        .update_user(
            &UserFilter::CalendarId(calendar.id),
            &UserUpdate::PushCalendarEvent {
                calendar_id: calendar.id,
                event_id: event.id,
            },
        )
        .await?;
    ensure_modified(result, || {
        format!(
            "add the event with id '{}' to the calendar with id '{}'",
            event.id, calendar.id
        )
    })?;
    calendar.events.push(event.id);

    tracing::info!(calendar_id = %calendar.id, event_id = %event.id, "Linked event");
    Ok(calendar)
}

/// Pulls an event id out of every calendar that lists it.
///
/// The accessor must list the event in one of their own calendars. Returns
/// the number of users whose calendars changed.
pub async fn remove_event_from_calendars(
    state: &AppState,
    event_id: &str,
    accessor: &str,
) -> Result<u64> {
    let event_id = require_identifier(event_id)?;
    let accessor = username_arg(accessor)?;

    let holder = state
        .users
        .find_user(&UserFilter::UsernameHoldsEvent {
            username: accessor.clone(),
            event_id,
        })
        .await?;
    if holder.is_none() {
        return Err(PlannerError::NotFound(format!(
            "User '{accessor}' does not have a calendar with the event id '{event_id}'."
        )));
    }

    let result = state
        .users
        .update_users(
            &UserFilter::HoldsEvent(event_id),
            &UserUpdate::PullEvent(event_id),
        )
        .await?;
    ensure_modified(result, || {
        format!("remove the event with id '{event_id}' from any calendar")
    })?;

    tracing::info!(%event_id, users_updated = result.modified, "Unlinked event");
    Ok(result.modified)
}

/// One bucket per day of `month`, each with that day's events from the
/// calendar, earliest deadline first.
pub async fn calendar_month(
    state: &AppState,
    calendar_id: &str,
    year: i32,
    month: u32,
    accessor: &str,
) -> Result<Vec<DayEvents>> {
    if first_of_month(year, month).is_none() {
        return Err(PlannerError::InvalidArgument(format!(
            "'{month}/{year}' is not a valid month."
        )));
    }
    let calendar = get_calendar(state, calendar_id, accessor).await?;
    let accessor = username_arg(accessor)?;

    let events = state
        .events
        .find_events(&EventFilter::Ids(calendar.events.clone()), &EventSort::none())
        .await?;
    let events = retain_authorized(events, &accessor);

    Ok(build_month_view(year, month, events))
}
