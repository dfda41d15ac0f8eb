//! Event operations: create, read, edit, delete and ownership changes.
//!
//! Every operation checks, in order: input validation, existence of the
//! target, then the accessor's authorization. Nothing is written before all
//! three pass.

use duedesk_core::access::{ensure_event_access, is_authorized, normalize_username};
use duedesk_core::calendar::{Event, EventDraft, ObjectId};
use duedesk_core::storage::{
    EventFilter, EventSort, EventUpdate, SortField, SortKey, UserFilter, UserUpdate,
};
use duedesk_core::validation::{require_identifier, require_string};
use duedesk_core::{PlannerError, Result};

use crate::error::ensure_modified;
use crate::state::AppState;

/// Validates a username argument and returns its canonical (lower-case) form.
pub(crate) fn username_arg(value: &str) -> Result<String> {
    Ok(normalize_username(require_string(value, true)?))
}

/// Loads an event, `NotFound` if absent.
pub(crate) async fn find_event(state: &AppState, id: ObjectId) -> Result<Event> {
    state
        .events
        .find_event(&EventFilter::Id(id))
        .await?
        .ok_or_else(|| PlannerError::not_found("an event", id))
}

/// `Forbidden` unless the accessor owns the event. Denials are logged.
pub(crate) fn authorize(accessor: &str, event: &Event) -> Result<()> {
    ensure_event_access(accessor, event).inspect_err(|_| {
        tracing::warn!(accessor, event_id = %event.id, "Event access denied");
    })
}

/// Creates an event owned by `owner` with no comments.
pub async fn create_event(state: &AppState, owner: &str, draft: EventDraft) -> Result<Event> {
    let owner = username_arg(owner)?;
    let event = draft.into_event(owner);

    state.events.insert_event(&event).await?;

    tracing::info!(event_id = %event.id, owner = %event.owners[0], "Created event");
    Ok(event)
}

/// Gets an event by id.
pub async fn get_event(state: &AppState, id: &str, accessor: &str) -> Result<Event> {
    let id = require_identifier(id)?;
    let accessor = username_arg(accessor)?;

    let event = find_event(state, id).await?;
    authorize(&accessor, &event)?;
    Ok(event)
}

/// Replaces the title, description, priority and deadline of an event.
/// Owners and comments are preserved.
pub async fn edit_event(
    state: &AppState,
    id: &str,
    accessor: &str,
    draft: EventDraft,
) -> Result<Event> {
    let event = get_event(state, id, accessor).await?;

    let edited = draft.apply_to(event);
    let result = state.events.replace_event(&edited).await?;
    ensure_modified(result, || format!("replace the event with id '{}'", edited.id))?;

    tracing::info!(event_id = %edited.id, "Edited event");
    Ok(edited)
}

/// Deletes an event and pulls its id out of every calendar.
///
/// Returns the deleted event as it was just before deletion.
pub async fn delete_event(state: &AppState, id: &str, accessor: &str) -> Result<Event> {
    let event = get_event(state, id, accessor).await?;

    let deleted = state.events.delete_event(&EventFilter::Id(event.id)).await?;
    if deleted == 0 {
        let message = format!("Could not delete the event with id '{}'.", event.id);
        tracing::error!(event_id = %event.id, "Delete removed no documents");
        return Err(PlannerError::StoreInconsistency(message));
    }

    let calendars = state
        .users
        .update_users(
            &UserFilter::HoldsEvent(event.id),
            &UserUpdate::PullEvent(event.id),
        )
        .await?;

    tracing::info!(
        event_id = %event.id,
        users_updated = calendars.modified,
        "Deleted event"
    );
    Ok(event)
}

/// Adds `username` to the owners of an event the accessor owns.
pub async fn add_owner(
    state: &AppState,
    id: &str,
    username: &str,
    accessor: &str,
) -> Result<Event> {
    let username = username_arg(username)?;
    let mut event = get_event(state, id, accessor).await?;

    if state
        .users
        .find_user(&UserFilter::Username(username.clone()))
        .await?
        .is_none()
    {
        return Err(PlannerError::NotFound(format!(
            "Could not find a user with username '{username}'."
        )));
    }
    if is_authorized(&username, &event.owners) {
        return Err(PlannerError::InvalidArgument(format!(
            "User '{username}' already owns the event with id '{}'.",
            event.id
        )));
    }

    let result = state
        .events
        .update_event(
            &EventFilter::Id(event.id),
            &EventUpdate::PushOwner(username.clone()),
        )
        .await?;
    ensure_modified(result, || {
        format!("add user '{username}' to the event with id '{}'", event.id)
    })?;
    event.owners.push(username.clone());

    tracing::info!(event_id = %event.id, owner = %username, "Added owner");
    Ok(event)
}

/// Removes `username` from the owners of an event the accessor owns, and
/// pulls the event from that user's calendars.
///
/// Removing the last owner is allowed and leaves the event orphaned.
pub async fn remove_owner(
    state: &AppState,
    id: &str,
    username: &str,
    accessor: &str,
) -> Result<Event> {
    let username = username_arg(username)?;
    let mut event = get_event(state, id, accessor).await?;

    if !event.owners.contains(&username) {
        return Err(PlannerError::InvalidArgument(format!(
            "User '{username}' is not an owner of the event with id '{}'.",
            event.id
        )));
    }

    let result = state
        .events
        .update_event(
            &EventFilter::Id(event.id),
            &EventUpdate::PullOwner(username.clone()),
        )
        .await?;
    ensure_modified(result, || {
        format!("remove user '{username}' from the event with id '{}'", event.id)
    })?;
    event.owners.retain(|owner| *owner != username);

    state
        .users
        .update_users(
            &UserFilter::UsernameHoldsEvent {
                username: username.clone(),
                event_id: event.id,
            },
            &UserUpdate::PullEvent(event.id),
        )
        .await?;

    tracing::info!(event_id = %event.id, owner = %username, "Removed owner");
    if event.owners.is_empty() {
        tracing::warn!(event_id = %event.id, "Event has no owners left");
    }
    Ok(event)
}

/// Creates an event and links it to one of the owner's calendars.
///
/// If linking fails the new event is deleted again, so a failed call leaves
/// no event outside the owner's calendars.
pub async fn schedule_event(
    state: &AppState,
    owner: &str,
    calendar_id: &str,
    draft: EventDraft,
) -> Result<Event> {
    let calendar_id = require_identifier(calendar_id)?;
    let owner = username_arg(owner)?;

    let calendar = crate::calendars::find_calendar(state, calendar_id, &owner).await?;
    let event = create_event(state, &owner, draft).await?;

    let linked = link_to_calendar(state, &owner, calendar.id, event.id).await;
    if let Err(e) = linked {
        tracing::warn!(
            event_id = %event.id,
            calendar_id = %calendar.id,
            "Linking failed, deleting the new event"
        );
        state.events.delete_event(&EventFilter::Id(event.id)).await?;
        return Err(e);
    }

    tracing::info!(event_id = %event.id, calendar_id = %calendar.id, "Scheduled event");
    Ok(event)
}

async fn link_to_calendar(
    state: &AppState,
    owner: &str,
    calendar_id: ObjectId,
    event_id: ObjectId,
) -> Result<()> {
    let result = state
        .users
        .update_user(
            &UserFilter::Username(owner.to_string()),
            &UserUpdate::PushCalendarEvent {
                calendar_id,
                event_id,
            },
        )
        .await?;
    ensure_modified(result, || {
        format!("add the event with id '{event_id}' to the calendar with id '{calendar_id}'")
    })
}

/// Every event the accessor owns, earliest deadline first.
pub async fn list_user_events(state: &AppState, accessor: &str) -> Result<Vec<Event>> {
    let accessor = username_arg(accessor)?;

    let sort = EventSort::by(SortKey::asc(SortField::Deadline))
        .then(SortKey::desc(SortField::Priority));
    let events = state
        .events
        .find_events(&EventFilter::OwnersContain(accessor), &sort)
        .await?;

    if events.is_empty() {
        return Err(PlannerError::no_events());
    }
    Ok(events)
}
