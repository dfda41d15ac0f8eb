//! User accounts. Password hashing happens outside this crate; only the
//! opaque hash is stored.

use duedesk_core::calendar::{default_calendar_title, Calendar, User};
use duedesk_core::storage::{RepositoryError, UserFilter, UserUpdate};
use duedesk_core::validation::{require_name, require_string, require_username};
use duedesk_core::{PlannerError, Result};

use crate::error::ensure_modified;
use crate::events::username_arg;
use crate::state::AppState;

fn taken(username: &str) -> PlannerError {
    PlannerError::InvalidArgument(format!("Username '{username}' is already taken."))
}

fn user_not_found(username: &str) -> PlannerError {
    PlannerError::NotFound(format!("Could not find a user with username '{username}'."))
}

/// Creates an account with a default calendar titled after the first name.
pub async fn create_user(
    state: &AppState,
    username: &str,
    hashed_password: &str,
    first_name: &str,
    last_name: &str,
) -> Result<User> {
    let username = require_username(username)?;
    let hashed_password = require_string(hashed_password, false)?;
    let first_name = require_name(first_name)?;
    let last_name = require_name(last_name)?;

    if state
        .users
        .find_user(&UserFilter::Username(username.clone()))
        .await?
        .is_some()
    {
        return Err(taken(&username));
    }

    let calendar = Calendar::new(default_calendar_title(&first_name));
    let user = User::new(username, hashed_password, first_name, last_name).with_calendar(calendar);

    // A concurrent signup can still win the race between the check and the insert.
    state.users.insert_user(&user).await.map_err(|e| match e {
        RepositoryError::AlreadyExists { .. } => taken(&user.username),
        other => other.into(),
    })?;

    tracing::info!(username = %user.username, user_id = %user.id, "Created user");
    Ok(user)
}

/// Gets a user by username.
pub async fn get_user(state: &AppState, username: &str) -> Result<User> {
    let username = username_arg(username)?;
    state
        .users
        .find_user(&UserFilter::Username(username.clone()))
        .await?
        .ok_or_else(|| user_not_found(&username))
}

async fn update_existing(state: &AppState, username: &str, update: UserUpdate) -> Result<()> {
    let result = state
        .users
        .update_user(&UserFilter::Username(username.to_string()), &update)
        .await?;
    if result.matched == 0 {
        return Err(user_not_found(username));
    }
    ensure_modified(result, || format!("update the user '{username}'"))
}

/// Sets a user's first and last name.
pub async fn change_name(
    state: &AppState,
    username: &str,
    first_name: &str,
    last_name: &str,
) -> Result<User> {
    let username = username_arg(username)?;
    let first_name = require_name(first_name)?;
    let last_name = require_name(last_name)?;

    update_existing(
        state,
        &username,
        UserUpdate::SetName {
            first_name,
            last_name,
        },
    )
    .await?;

    tracing::info!(%username, "Changed name");
    get_user(state, &username).await
}

/// Replaces a user's password hash.
pub async fn change_password(
    state: &AppState,
    username: &str,
    hashed_password: &str,
) -> Result<()> {
    let username = username_arg(username)?;
    let hashed_password = require_string(hashed_password, false)?;

    let update = UserUpdate::SetPassword(hashed_password.to_string());
    update_existing(state, &username, update).await?;

    tracing::info!(%username, "Changed password");
    Ok(())
}
