//! Application state with repository-based storage.
//!
//! This module defines the shared state that every service operation
//! receives. It holds repository trait objects, so operations never know
//! which backend is active.

use std::sync::Arc;

use duedesk_core::storage::{EventRepository, UserRepository};

use crate::config::Config;

/// Shared application state.
///
/// Cheap to clone: both repositories sit behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Events collection (embeds comments).
    pub events: Arc<dyn EventRepository>,
    /// Users collection (embeds calendars).
    pub users: Arc<dyn UserRepository>,
    pub config: Config,
}

impl AppState {
    /// Builds state from already constructed repositories.
    pub fn build(
        events: Arc<dyn EventRepository>,
        users: Arc<dyn UserRepository>,
        config: Config,
    ) -> Self {
        Self {
            events,
            users,
            config,
        }
    }
}

// ============================================================================
// Factory functions for each storage backend
// ============================================================================

#[cfg(feature = "inmemory")]
mod inmemory {
    use super::*;
    use crate::storage::InMemoryRepository;

    impl AppState {
        /// Creates AppState with in-memory storage. Data is lost on drop.
        pub fn in_memory(config: Config) -> Self {
            let repo = Arc::new(InMemoryRepository::new());
            Self::build(repo.clone(), repo, config)
        }
    }
}

#[cfg(feature = "sqlite")]
mod sqlite {
    use super::*;
    use crate::storage::SqliteRepository;

    impl AppState {
        /// Creates AppState with SQLite storage at `config.sqlite_path`.
        pub async fn sqlite(config: Config) -> Result<Self, anyhow::Error> {
            let repo = Arc::new(SqliteRepository::new(&config.sqlite_path).await?);
            tracing::info!(path = %config.sqlite_path, "Opened SQLite store");
            Ok(Self::build(repo.clone(), repo, config))
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::storage::InMemoryRepository;

    /// In-memory state with default configuration.
    pub fn state() -> AppState {
        state_with(Config::default())
    }

    pub fn state_with(config: Config) -> AppState {
        let repo = Arc::new(InMemoryRepository::new());
        AppState::build(repo.clone(), repo, config)
    }

    /// SQLite `:memory:` state, for running service tests against SQL.
    #[cfg(feature = "sqlite")]
    pub async fn sqlite_state() -> AppState {
        let repo = Arc::new(
            crate::storage::SqliteRepository::new_in_memory()
                .await
                .unwrap(),
        );
        AppState::build(repo.clone(), repo, Config::default())
    }
}
