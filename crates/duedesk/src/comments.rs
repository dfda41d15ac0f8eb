//! Comment operations. Comments are embedded in their event, so every lookup
//! goes through the event that holds the comment.

use duedesk_core::access::ensure_comment_author;
use duedesk_core::calendar::{validate_comment_text, Comment, Event, ObjectId, Timestamp};
use duedesk_core::storage::{EventFilter, EventUpdate};
use duedesk_core::validation::require_identifier;
use duedesk_core::{PlannerError, Result};

use crate::error::ensure_modified;
use crate::events::{authorize, get_event, username_arg};
use crate::state::AppState;

/// Adds a comment by `username` to an event they own.
pub async fn add_comment(
    state: &AppState,
    event_id: &str,
    username: &str,
    text: &str,
    created_on: Timestamp,
) -> Result<Comment> {
    let text = validate_comment_text(text)?;
    let event = get_event(state, event_id, username).await?;

    let comment = Comment::new(username_arg(username)?, text, created_on);
    let result = state
        .events
        .update_event(
            &EventFilter::Id(event.id),
            &EventUpdate::PushComment(comment.clone()),
        )
        .await?;
    ensure_modified(result, || {
        format!("add the user comment to the event with id '{}'", event.id)
    })?;

    tracing::info!(event_id = %event.id, comment_id = %comment.id, "Added comment");
    Ok(comment)
}

async fn find_by_comment(state: &AppState, comment_id: ObjectId) -> Result<Event> {
    state
        .events
        .find_event(&EventFilter::CommentId(comment_id))
        .await?
        .ok_or_else(|| {
            PlannerError::NotFound(format!(
                "Could not find an event containing the user comment with comment id \
                 '{comment_id}'."
            ))
        })
}

/// Loads the event holding a comment the accessor may see. `accessor` must
/// be canonical.
async fn authorized_event(
    state: &AppState,
    comment_id: ObjectId,
    accessor: &str,
) -> Result<Event> {
    let event = find_by_comment(state, comment_id).await?;
    authorize(accessor, &event)?;
    Ok(event)
}

fn select_comment(event: &Event, comment_id: ObjectId) -> Result<Comment> {
    event
        .comment(comment_id)
        .cloned()
        .ok_or_else(|| PlannerError::not_found("a user comment", comment_id))
}

/// Gets the event holding a comment.
pub async fn get_event_from_comment(
    state: &AppState,
    comment_id: &str,
    accessor: &str,
) -> Result<Event> {
    let comment_id = require_identifier(comment_id)?;
    let accessor = username_arg(accessor)?;
    authorized_event(state, comment_id, &accessor).await
}

/// Gets a comment by id. The accessor must own the event holding it.
pub async fn get_comment(state: &AppState, comment_id: &str, accessor: &str) -> Result<Comment> {
    let comment_id = require_identifier(comment_id)?;
    let accessor = username_arg(accessor)?;
    let event = authorized_event(state, comment_id, &accessor).await?;
    select_comment(&event, comment_id)
}

/// Deletes a comment. Only its author may delete it, and only while they
/// still own the event.
pub async fn delete_comment(
    state: &AppState,
    comment_id: &str,
    accessor: &str,
) -> Result<Comment> {
    let comment_id = require_identifier(comment_id)?;
    let accessor = username_arg(accessor)?;
    let event = authorized_event(state, comment_id, &accessor).await?;
    let comment = select_comment(&event, comment_id)?;

    ensure_comment_author(&accessor, &comment).inspect_err(|_| {
        tracing::warn!(%accessor, comment_id = %comment.id, "Comment deletion denied");
    })?;

    let result = state
        .events
        .update_event(
            &EventFilter::Id(event.id),
            &EventUpdate::PullComment(comment.id),
        )
        .await?;
    ensure_modified(result, || {
        format!("delete the user comment with id '{}'", comment.id)
    })?;

    tracing::info!(event_id = %event.id, comment_id = %comment.id, "Deleted comment");
    Ok(comment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{add_owner, create_event};
    use crate::state::test_support::state;
    use crate::users::create_user;
    use chrono::{TimeZone, Utc};
    use duedesk_core::calendar::EventDraft;

    async fn shared_event(state: &AppState) -> String {
        for name in ["alice", "bob"] {
            create_user(state, name, "hash", "Test", "User").await.unwrap();
        }
        let draft = EventDraft::new(
            "Picnic",
            "Bring snacks",
            2,
            Utc.with_ymd_and_hms(2024, 7, 4, 12, 0, 0).unwrap(),
        )
        .unwrap();
        let event = create_event(state, "alice", draft).await.unwrap();
        let id = event.id.to_string();
        add_owner(state, &id, "bob", "alice").await.unwrap();
        id
    }

    #[tokio::test]
    async fn test_add_and_get_comment() {
        let state = state();
        let event_id = shared_event(&state).await;

        let comment = add_comment(&state, &event_id, "Bob", "I'll bring chips", Utc::now())
            .await
            .unwrap();
        assert_eq!(comment.owner, "bob");

        let found = get_comment(&state, &comment.id.to_string(), "alice")
            .await
            .unwrap();
        assert_eq!(found, comment);

        let event = get_event_from_comment(&state, &comment.id.to_string(), "bob")
            .await
            .unwrap();
        assert_eq!(event.id.to_string(), event_id);
    }

    #[tokio::test]
    async fn test_add_comment_requires_ownership() {
        let state = state();
        let event_id = shared_event(&state).await;

        let err = add_comment(&state, &event_id, "carol", "hi", Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, PlannerError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_add_comment_rejects_blank_text_first() {
        let state = state();
        let missing = ObjectId::new().to_string();

        let err = add_comment(&state, &missing, "alice", "   ", Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, PlannerError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_only_author_deletes_comment() {
        let state = state();
        let event_id = shared_event(&state).await;
        let comment = add_comment(&state, &event_id, "alice", "noon?", Utc::now())
            .await
            .unwrap();
        let comment_id = comment.id.to_string();

        let err = delete_comment(&state, &comment_id, "bob").await.unwrap_err();
        assert!(matches!(err, PlannerError::Forbidden(_)));

        let deleted = delete_comment(&state, &comment_id, "alice").await.unwrap();
        assert_eq!(deleted.id, comment.id);

        let gone = get_comment(&state, &comment_id, "alice").await.unwrap_err();
        assert!(matches!(gone, PlannerError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_comment_ids_accept_either_case() {
        let state = state();
        let event_id = shared_event(&state).await;
        let comment = add_comment(&state, &event_id, "alice", "noon?", Utc::now())
            .await
            .unwrap();
        let upper = comment.id.to_string().to_uppercase();

        assert_eq!(get_comment(&state, &upper, "bob").await.unwrap(), comment);
        let deleted = delete_comment(&state, &format!(" {upper} "), " Alice ")
            .await
            .unwrap();
        assert_eq!(deleted.id, comment.id);
    }

    #[tokio::test]
    async fn test_unknown_comment_not_found() {
        let state = state();
        let err = get_comment(&state, &ObjectId::new().to_string(), "alice")
            .await
            .unwrap_err();
        assert!(matches!(err, PlannerError::NotFound(_)));
    }
}
