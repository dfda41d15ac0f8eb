//! duedesk: shared deadlines with priorities and comments.
//!
//! The imperative shell around `duedesk_core`. Service modules (`users`,
//! `calendars`, `events`, `comments`, `search`) take an [`state::AppState`]
//! and an accessor username, run validation, existence and authorization
//! checks in that order, and then touch the store.

pub mod calendars;
pub mod cli;
pub mod comments;
pub mod config;
pub mod error;
pub mod events;
pub mod output;
pub mod search;
pub mod seed;
pub mod state;
pub mod storage;
pub mod users;
