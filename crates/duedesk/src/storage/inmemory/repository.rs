//! In-memory repository implementation.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use duedesk_core::calendar::{Event, User};
use duedesk_core::storage::{
    EventFilter, EventRepository, EventSort, EventUpdate, RepositoryError, Result, UserFilter,
    UserRepository, UserUpdate, WriteResult,
};

/// In-memory storage backend.
///
/// Documents live in insertion-ordered `Vec`s wrapped in `Arc<RwLock<_>>`.
/// Each call holds the lock for its whole duration, so every single-document
/// write is atomic. Data is lost when the repository is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    events: Arc<RwLock<Vec<Event>>>,
    users: Arc<RwLock<Vec<User>>>,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventRepository for InMemoryRepository {
    async fn find_event(&self, filter: &EventFilter) -> Result<Option<Event>> {
        let events = self.events.read().await;
        Ok(events.iter().find(|e| filter.matches(e)).cloned())
    }

    async fn find_events(&self, filter: &EventFilter, sort: &EventSort) -> Result<Vec<Event>> {
        let events = self.events.read().await;
        let mut found: Vec<Event> = events.iter().filter(|e| filter.matches(e)).cloned().collect();
        sort.apply(&mut found);
        Ok(found)
    }

    async fn insert_event(&self, event: &Event) -> Result<()> {
        let mut events = self.events.write().await;
        if events.iter().any(|e| e.id == event.id) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "Event",
                id: event.id.to_string(),
            });
        }
        events.push(event.clone());
        Ok(())
    }

    async fn update_event(
        &self,
        filter: &EventFilter,
        update: &EventUpdate,
    ) -> Result<WriteResult> {
        let mut events = self.events.write().await;
        match events.iter_mut().find(|e| filter.matches(e)) {
            Some(event) => {
                let modified = update.apply(event);
                Ok(WriteResult::new(1, modified as u64))
            }
            None => Ok(WriteResult::unmatched()),
        }
    }

    async fn replace_event(&self, event: &Event) -> Result<WriteResult> {
        let mut events = self.events.write().await;
        match events.iter_mut().find(|e| e.id == event.id) {
            Some(stored) => {
                *stored = event.clone();
                Ok(WriteResult::new(1, 1))
            }
            None => Ok(WriteResult::unmatched()),
        }
    }

    async fn delete_event(&self, filter: &EventFilter) -> Result<u64> {
        let mut events = self.events.write().await;
        match events.iter().position(|e| filter.matches(e)) {
            Some(index) => {
                events.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn find_user(&self, filter: &UserFilter) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| filter.matches(u)).cloned())
    }

    async fn insert_user(&self, user: &User) -> Result<()> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.username == user.username) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "User",
                id: user.username.clone(),
            });
        }
        users.push(user.clone());
        Ok(())
    }

    async fn update_user(&self, filter: &UserFilter, update: &UserUpdate) -> Result<WriteResult> {
        let mut users = self.users.write().await;
        match users.iter_mut().find(|u| filter.matches(u)) {
            Some(user) => {
                let modified = update.apply(user);
                Ok(WriteResult::new(1, modified as u64))
            }
            None => Ok(WriteResult::unmatched()),
        }
    }

    async fn update_users(&self, filter: &UserFilter, update: &UserUpdate) -> Result<WriteResult> {
        let mut users = self.users.write().await;
        let mut result = WriteResult::unmatched();
        for user in users.iter_mut().filter(|u| filter.matches(u)) {
            result.matched += 1;
            if update.apply(user) {
                result.modified += 1;
            }
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use duedesk_core::calendar::{Calendar, Comment, ObjectId};
    use duedesk_core::storage::{SortField, SortKey};

    fn event(owner: &str, title: &str, priority: u8, day: u32) -> Event {
        let deadline = Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap();
        Event::new(owner, title, "", priority, deadline)
    }

    #[tokio::test]
    async fn test_insert_and_find_event() {
        let repo = InMemoryRepository::new();
        let e = event("alice", "Report", 3, 1);

        repo.insert_event(&e).await.unwrap();
        let found = repo.find_event(&EventFilter::Id(e.id)).await.unwrap();

        assert_eq!(found, Some(e));
    }

    #[tokio::test]
    async fn test_insert_duplicate_event_fails() {
        let repo = InMemoryRepository::new();
        let e = event("alice", "Report", 3, 1);

        repo.insert_event(&e).await.unwrap();
        let result = repo.insert_event(&e).await;

        assert!(matches!(
            result,
            Err(RepositoryError::AlreadyExists {
                entity_type: "Event",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_find_events_filters_and_sorts() {
        let repo = InMemoryRepository::new();
        for e in [
            event("alice", "low", 1, 3),
            event("bob", "bob's", 5, 2),
            event("alice", "high", 4, 1),
        ] {
            repo.insert_event(&e).await.unwrap();
        }

        let found = repo
            .find_events(
                &EventFilter::OwnersContain("alice".into()),
                &EventSort::by(SortKey::desc(SortField::Priority)),
            )
            .await
            .unwrap();

        let titles: Vec<_> = found.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["high", "low"]);
    }

    #[tokio::test]
    async fn test_update_event_reports_counts() {
        let repo = InMemoryRepository::new();
        let e = event("alice", "Report", 3, 1);
        repo.insert_event(&e).await.unwrap();

        let pushed = repo
            .update_event(&EventFilter::Id(e.id), &EventUpdate::PushOwner("bob".into()))
            .await
            .unwrap();
        let pulled_absent = repo
            .update_event(&EventFilter::Id(e.id), &EventUpdate::PullOwner("carol".into()))
            .await
            .unwrap();
        let missing = repo
            .update_event(
                &EventFilter::Id(ObjectId::new()),
                &EventUpdate::PushOwner("bob".into()),
            )
            .await
            .unwrap();

        assert_eq!(pushed, WriteResult::new(1, 1));
        assert_eq!(pulled_absent, WriteResult::new(1, 0));
        assert_eq!(missing, WriteResult::unmatched());
    }

    #[tokio::test]
    async fn test_find_by_comment_id() {
        let repo = InMemoryRepository::new();
        let mut e = event("alice", "Report", 3, 1);
        let comment = Comment::new("alice", "note", Utc::now());
        let comment_id = comment.id;
        e.comments.push(comment);
        repo.insert_event(&e).await.unwrap();

        let found = repo
            .find_event(&EventFilter::CommentId(comment_id))
            .await
            .unwrap();
        assert_eq!(found.map(|f| f.id), Some(e.id));
    }

    #[tokio::test]
    async fn test_replace_and_delete_event() {
        let repo = InMemoryRepository::new();
        let mut e = event("alice", "Report", 3, 1);
        repo.insert_event(&e).await.unwrap();

        e.title = "Final report".into();
        assert_eq!(repo.replace_event(&e).await.unwrap(), WriteResult::new(1, 1));
        assert_eq!(repo.delete_event(&EventFilter::Id(e.id)).await.unwrap(), 1);
        assert_eq!(repo.delete_event(&EventFilter::Id(e.id)).await.unwrap(), 0);
        assert_eq!(
            repo.replace_event(&e).await.unwrap(),
            WriteResult::unmatched()
        );
    }

    #[tokio::test]
    async fn test_insert_duplicate_username_fails() {
        let repo = InMemoryRepository::new();
        repo.insert_user(&User::new("alice", "h", "Alice", "A"))
            .await
            .unwrap();

        let result = repo
            .insert_user(&User::new("alice", "h2", "Alicia", "B"))
            .await;
        assert!(matches!(
            result,
            Err(RepositoryError::AlreadyExists {
                entity_type: "User",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_update_users_touches_every_match() {
        let repo = InMemoryRepository::new();
        let event_id = ObjectId::new();
        for name in ["alice", "bob", "carol"] {
            let mut calendar = Calendar::new("Main");
            if name != "carol" {
                calendar.events.push(event_id);
            }
            repo.insert_user(&User::new(name, "h", "N", "N").with_calendar(calendar))
                .await
                .unwrap();
        }

        let result = repo
            .update_users(
                &UserFilter::HoldsEvent(event_id),
                &UserUpdate::PullEvent(event_id),
            )
            .await
            .unwrap();

        assert_eq!(result, WriteResult::new(2, 2));
        assert!(repo
            .find_user(&UserFilter::HoldsEvent(event_id))
            .await
            .unwrap()
            .is_none());
    }
}
