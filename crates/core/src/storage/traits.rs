use async_trait::async_trait;

use crate::calendar::{Event, User};

use super::{EventFilter, EventSort, EventUpdate, Result, UserFilter, UserUpdate, WriteResult};

/// Repository for the events collection. Comments are embedded in events.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Gets the first event matching the filter.
    async fn find_event(&self, filter: &EventFilter) -> Result<Option<Event>>;

    /// Gets every event matching the filter, in the given order.
    async fn find_events(&self, filter: &EventFilter, sort: &EventSort) -> Result<Vec<Event>>;

    /// Inserts a new event.
    async fn insert_event(&self, event: &Event) -> Result<()>;

    /// Applies an array operator to the first event matching the filter.
    async fn update_event(&self, filter: &EventFilter, update: &EventUpdate)
        -> Result<WriteResult>;

    /// Replaces the stored document with the same id.
    async fn replace_event(&self, event: &Event) -> Result<WriteResult>;

    /// Deletes the first event matching the filter, returning how many were removed.
    async fn delete_event(&self, filter: &EventFilter) -> Result<u64>;
}

/// Repository for the users collection. Calendars are embedded in users.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Gets the first user matching the filter.
    async fn find_user(&self, filter: &UserFilter) -> Result<Option<User>>;

    /// Inserts a new user; fails with `AlreadyExists` on a taken username.
    async fn insert_user(&self, user: &User) -> Result<()>;

    /// Applies an operator to the first user matching the filter.
    async fn update_user(&self, filter: &UserFilter, update: &UserUpdate) -> Result<WriteResult>;

    /// Applies an operator to every user matching the filter.
    async fn update_users(&self, filter: &UserFilter, update: &UserUpdate)
        -> Result<WriteResult>;
}
