//! SQLite repository implementation.
//!
//! Implements the repository traits from `duedesk_core::storage` using SQLite.
//! Array operators are applied with a read-modify-write inside a transaction,
//! using the same `apply` functions as the in-memory backend.

use async_trait::async_trait;
use rusqlite::params_from_iter;
use tokio_rusqlite::Connection;

use duedesk_core::calendar::{Event, User};
use duedesk_core::storage::{
    EventFilter, EventRepository, EventSort, EventUpdate, RepositoryError, Result, UserFilter,
    UserRepository, UserUpdate, WriteResult,
};

use super::conversions::{deadline_columns, row_to_event, row_to_user, to_json, to_json_sql};
use super::error::map_tokio_rusqlite_error;
use super::filter::{event_clause, order_by, register_functions, user_clause, Clause};
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// SQLite-based repository implementation.
///
/// Provides async access to SQLite storage for both collections.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Creates a new repository with a file-based database.
    ///
    /// The database file will be created if it doesn't exist.
    /// Schema tables are created automatically.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a new repository with an in-memory database.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            register_functions(conn).map_err(wrap_err)?;
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }
}

fn select_events(
    conn: &rusqlite::Connection,
    clause: &Clause,
    order: &str,
    limit: Option<u32>,
) -> rusqlite::Result<Vec<Event>> {
    let mut sql = format!(
        "SELECT {} FROM events WHERE {} ORDER BY {order}",
        schema::EVENT_COLUMNS,
        clause.sql
    );
    if let Some(limit) = limit {
        sql.push_str(&format!(" LIMIT {limit}"));
    }
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(clause.params.iter()), row_to_event)?;
    rows.collect()
}

fn select_users(
    conn: &rusqlite::Connection,
    clause: &Clause,
    limit: Option<u32>,
) -> rusqlite::Result<Vec<User>> {
    let mut sql = format!(
        "SELECT {} FROM users WHERE {} ORDER BY rowid ASC",
        schema::USER_COLUMNS,
        clause.sql
    );
    if let Some(limit) = limit {
        sql.push_str(&format!(" LIMIT {limit}"));
    }
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(clause.params.iter()), row_to_user)?;
    rows.collect()
}

fn write_user(conn: &rusqlite::Connection, user: &User) -> rusqlite::Result<()> {
    conn.execute(
        schema::UPDATE_USER,
        rusqlite::params![
            user.username,
            user.hashed_password,
            user.first_name,
            user.last_name,
            to_json_sql(&user.calendars)?,
        ],
    )?;
    Ok(())
}

// ============================================================================
// EventRepository implementation
// ============================================================================

#[async_trait]
impl EventRepository for SqliteRepository {
    async fn find_event(&self, filter: &EventFilter) -> Result<Option<Event>> {
        let clause = event_clause(filter);
        let label = format!("{filter:?}");

        self.conn
            .call(move |conn| {
                let mut events =
                    select_events(conn, &clause, "seq ASC", Some(1)).map_err(wrap_err)?;
                Ok(events.pop())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Event", label))
    }

    async fn find_events(&self, filter: &EventFilter, sort: &EventSort) -> Result<Vec<Event>> {
        let clause = event_clause(filter);
        let order = order_by(sort);
        let label = format!("{filter:?}");

        self.conn
            .call(move |conn| select_events(conn, &clause, &order, None).map_err(wrap_err))
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Event", label))
    }

    async fn insert_event(&self, event: &Event) -> Result<()> {
        let id = event.id.to_string();
        let owners = to_json(&event.owners)?;
        let title = event.title.clone();
        let description = event.description.clone();
        let priority = event.priority;
        let deadline = deadline_columns(&event.deadline);
        let comments = to_json(&event.comments)?;
        let event_id = id.clone();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_EVENT,
                    rusqlite::params![
                        id,
                        owners,
                        title,
                        description,
                        priority,
                        deadline.rfc3339,
                        deadline.epoch_micros,
                        deadline.year,
                        deadline.month,
                        deadline.day,
                        comments
                    ],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Event", event_id))
    }

    async fn update_event(
        &self,
        filter: &EventFilter,
        update: &EventUpdate,
    ) -> Result<WriteResult> {
        let clause = event_clause(filter);
        let update = update.clone();
        let label = format!("{filter:?}");

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                let found = select_events(&tx, &clause, "seq ASC", Some(1)).map_err(wrap_err)?;
                let Some(mut event) = found.into_iter().next() else {
                    return Ok(WriteResult::unmatched());
                };

                let modified = update.apply(&mut event);
                if modified {
                    tx.execute(
                        schema::UPDATE_EVENT_ARRAYS,
                        rusqlite::params![
                            event.id.to_string(),
                            to_json_sql(&event.owners).map_err(wrap_err)?,
                            to_json_sql(&event.comments).map_err(wrap_err)?,
                        ],
                    )
                    .map_err(wrap_err)?;
                }
                tx.commit().map_err(wrap_err)?;

                Ok(WriteResult::new(1, modified as u64))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Event", label))
    }

    async fn replace_event(&self, event: &Event) -> Result<WriteResult> {
        let id = event.id.to_string();
        let owners = to_json(&event.owners)?;
        let title = event.title.clone();
        let description = event.description.clone();
        let priority = event.priority;
        let deadline = deadline_columns(&event.deadline);
        let comments = to_json(&event.comments)?;
        let event_id = id.clone();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::REPLACE_EVENT,
                        rusqlite::params![
                            id,
                            owners,
                            title,
                            description,
                            priority,
                            deadline.rfc3339,
                            deadline.epoch_micros,
                            deadline.year,
                            deadline.month,
                            deadline.day,
                            comments
                        ],
                    )
                    .map_err(wrap_err)? as u64;
                Ok(WriteResult::new(rows, rows))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Event", event_id))
    }

    async fn delete_event(&self, filter: &EventFilter) -> Result<u64> {
        let clause = event_clause(filter);
        let label = format!("{filter:?}");

        self.conn
            .call(move |conn| {
                let sql = format!(
                    "DELETE FROM events WHERE seq = \
                     (SELECT seq FROM events WHERE {} ORDER BY seq ASC LIMIT 1)",
                    clause.sql
                );
                let rows = conn
                    .execute(&sql, params_from_iter(clause.params.iter()))
                    .map_err(wrap_err)?;
                Ok(rows as u64)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Event", label))
    }
}

// ============================================================================
// UserRepository implementation
// ============================================================================

#[async_trait]
impl UserRepository for SqliteRepository {
    async fn find_user(&self, filter: &UserFilter) -> Result<Option<User>> {
        let clause = user_clause(filter);
        let label = format!("{filter:?}");

        self.conn
            .call(move |conn| {
                let mut users = select_users(conn, &clause, Some(1)).map_err(wrap_err)?;
                Ok(users.pop())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "User", label))
    }

    async fn insert_user(&self, user: &User) -> Result<()> {
        let username = user.username.clone();
        let id = user.id.to_string();
        let hashed_password = user.hashed_password.clone();
        let first_name = user.first_name.clone();
        let last_name = user.last_name.clone();
        let calendars = to_json(&user.calendars)?;
        let key = username.clone();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_USER,
                    rusqlite::params![
                        username,
                        id,
                        hashed_password,
                        first_name,
                        last_name,
                        calendars
                    ],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "User", key))
    }

    async fn update_user(&self, filter: &UserFilter, update: &UserUpdate) -> Result<WriteResult> {
        let clause = user_clause(filter);
        let update = update.clone();
        let label = format!("{filter:?}");

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                let found = select_users(&tx, &clause, Some(1)).map_err(wrap_err)?;
                let Some(mut user) = found.into_iter().next() else {
                    return Ok(WriteResult::unmatched());
                };

                let modified = update.apply(&mut user);
                if modified {
                    write_user(&tx, &user).map_err(wrap_err)?;
                }
                tx.commit().map_err(wrap_err)?;

                Ok(WriteResult::new(1, modified as u64))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "User", label))
    }

    async fn update_users(&self, filter: &UserFilter, update: &UserUpdate) -> Result<WriteResult> {
        let clause = user_clause(filter);
        let update = update.clone();
        let label = format!("{filter:?}");

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                let users = select_users(&tx, &clause, None).map_err(wrap_err)?;

                let mut result = WriteResult::unmatched();
                for mut user in users {
                    result.matched += 1;
                    if update.apply(&mut user) {
                        write_user(&tx, &user).map_err(wrap_err)?;
                        result.modified += 1;
                    }
                }
                tx.commit().map_err(wrap_err)?;

                Ok(result)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "User", label))
    }
}

/// Counts rows in a table. Test helper for checking cascades.
#[cfg(test)]
async fn count_rows(repo: &SqliteRepository, table: &'static str) -> i64 {
    repo.conn
        .call(move |conn| {
            conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
                .map_err(wrap_err)
        })
        .await
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use duedesk_core::calendar::{Calendar, Comment, ObjectId};
    use duedesk_core::storage::{DeadlinePart, SortField, SortKey};

    async fn setup() -> SqliteRepository {
        SqliteRepository::new_in_memory().await.unwrap()
    }

    fn event(owner: &str, title: &str, priority: u8, day: u32) -> Event {
        Event::new(
            owner,
            title,
            "some description",
            priority,
            Utc.with_ymd_and_hms(2024, 5, day, 12, 0, 0).unwrap(),
        )
    }

    fn user(username: &str) -> User {
        User::new(username, "hash", "Test", "User")
            .with_calendar(Calendar::new("Test's Calendar"))
    }

    #[tokio::test]
    async fn test_insert_and_find_event() {
        let repo = setup().await;
        let stored = event("alice", "Dentist", 3, 10);
        repo.insert_event(&stored).await.unwrap();

        let found = repo
            .find_event(&EventFilter::Id(stored.id))
            .await
            .unwrap();
        assert_eq!(found, Some(stored));
    }

    #[tokio::test]
    async fn test_find_event_missing_returns_none() {
        let repo = setup().await;
        let found = repo
            .find_event(&EventFilter::Id(ObjectId::new()))
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_event_id_already_exists() {
        let repo = setup().await;
        let stored = event("alice", "Dentist", 3, 10);
        repo.insert_event(&stored).await.unwrap();

        let result = repo.insert_event(&stored).await;
        assert!(matches!(
            result,
            Err(RepositoryError::AlreadyExists {
                entity_type: "Event",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_find_events_sorted_by_priority_then_deadline() {
        let repo = setup().await;
        let low = event("alice", "Low", 1, 3);
        let high_late = event("alice", "High late", 5, 20);
        let high_early = event("alice", "High early", 5, 2);
        for e in [&low, &high_late, &high_early] {
            repo.insert_event(e).await.unwrap();
        }

        let sort = EventSort::by(SortKey::desc(SortField::Priority))
            .then(SortKey::asc(SortField::Deadline));
        let found = repo.find_events(&EventFilter::All, &sort).await.unwrap();

        let titles: Vec<_> = found.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["High early", "High late", "Low"]);
    }

    #[tokio::test]
    async fn test_find_events_by_owner_and_text() {
        let repo = setup().await;
        repo.insert_event(&event("alice", "Team Lunch", 2, 1))
            .await
            .unwrap();
        repo.insert_event(&event("bob", "Lunch with Sam", 2, 1))
            .await
            .unwrap();
        repo.insert_event(&event("alice", "Gym", 2, 1)).await.unwrap();

        let filter = EventFilter::TextContains("LUNCH".into())
            .and(EventFilter::OwnersContain("alice".into()));
        let found = repo.find_events(&filter, &EventSort::none()).await.unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Team Lunch");
    }

    #[tokio::test]
    async fn test_find_events_by_text_folds_unicode() {
        let repo = setup().await;
        repo.insert_event(&event("alice", "ÉTÉ Festival", 2, 1))
            .await
            .unwrap();
        repo.insert_event(&event("alice", "Winter", 2, 1))
            .await
            .unwrap();

        let found = repo
            .find_events(&EventFilter::TextContains("été".into()), &EventSort::none())
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "ÉTÉ Festival");
    }

    #[tokio::test]
    async fn test_find_events_by_deadline_part() {
        let repo = setup().await;
        repo.insert_event(&event("alice", "Fifth", 2, 5)).await.unwrap();
        repo.insert_event(&event("alice", "Sixth", 2, 6)).await.unwrap();

        let filter = EventFilter::DeadlinePart {
            part: DeadlinePart::Day,
            value: 5,
        };
        let found = repo.find_events(&filter, &EventSort::none()).await.unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Fifth");
    }

    #[tokio::test]
    async fn test_update_event_push_and_pull_comment() {
        let repo = setup().await;
        let stored = event("alice", "Dentist", 3, 10);
        repo.insert_event(&stored).await.unwrap();
        let comment = Comment::new("alice", "bring x-rays", Utc::now());

        let pushed = repo
            .update_event(
                &EventFilter::Id(stored.id),
                &EventUpdate::PushComment(comment.clone()),
            )
            .await
            .unwrap();
        assert_eq!(pushed, WriteResult::new(1, 1));

        let by_comment = repo
            .find_event(&EventFilter::CommentId(comment.id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_comment.id, stored.id);

        let pulled = repo
            .update_event(
                &EventFilter::Id(stored.id),
                &EventUpdate::PullComment(comment.id),
            )
            .await
            .unwrap();
        assert_eq!(pulled, WriteResult::new(1, 1));

        let again = repo
            .update_event(
                &EventFilter::Id(stored.id),
                &EventUpdate::PullComment(comment.id),
            )
            .await
            .unwrap();
        assert_eq!(again, WriteResult::new(1, 0));
    }

    #[tokio::test]
    async fn test_update_event_unmatched() {
        let repo = setup().await;
        let result = repo
            .update_event(
                &EventFilter::Id(ObjectId::new()),
                &EventUpdate::PushOwner("bob".into()),
            )
            .await
            .unwrap();
        assert_eq!(result, WriteResult::unmatched());
    }

    #[tokio::test]
    async fn test_replace_event() {
        let repo = setup().await;
        let mut stored = event("alice", "Dentist", 3, 10);
        repo.insert_event(&stored).await.unwrap();

        stored.title = "Orthodontist".into();
        stored.deadline = Utc.with_ymd_and_hms(2025, 1, 2, 9, 30, 0).unwrap();
        let result = repo.replace_event(&stored).await.unwrap();
        assert_eq!(result, WriteResult::new(1, 1));

        let year = EventFilter::DeadlinePart {
            part: DeadlinePart::Year,
            value: 2025,
        };
        let found = repo.find_event(&year).await.unwrap().unwrap();
        assert_eq!(found.title, "Orthodontist");

        let missing = repo
            .replace_event(&event("alice", "Ghost", 1, 1))
            .await
            .unwrap();
        assert_eq!(missing, WriteResult::unmatched());
    }

    #[tokio::test]
    async fn test_delete_event_removes_one() {
        let repo = setup().await;
        repo.insert_event(&event("alice", "One", 1, 1)).await.unwrap();
        repo.insert_event(&event("alice", "Two", 1, 1)).await.unwrap();

        let deleted = repo
            .delete_event(&EventFilter::OwnersContain("alice".into()))
            .await
            .unwrap();
        assert_eq!(deleted, 1);
        assert_eq!(count_rows(&repo, "events").await, 1);

        let remaining = repo
            .find_events(&EventFilter::All, &EventSort::none())
            .await
            .unwrap();
        assert_eq!(remaining[0].title, "Two");
    }

    #[tokio::test]
    async fn test_insert_and_find_user() {
        let repo = setup().await;
        let stored = user("alice");
        repo.insert_user(&stored).await.unwrap();

        let found = repo
            .find_user(&UserFilter::Username("alice".into()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, stored.id);
        assert_eq!(found.hashed_password, "hash");

        let by_calendar = repo
            .find_user(&UserFilter::CalendarId(stored.calendars[0].id))
            .await
            .unwrap();
        assert!(by_calendar.is_some());
    }

    #[tokio::test]
    async fn test_duplicate_username_already_exists() {
        let repo = setup().await;
        repo.insert_user(&user("alice")).await.unwrap();

        let result = repo.insert_user(&user("alice")).await;
        assert!(matches!(
            result,
            Err(RepositoryError::AlreadyExists {
                entity_type: "User",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_update_users_pulls_event_everywhere() {
        let repo = setup().await;
        let event_id = ObjectId::new();
        for name in ["alice", "bob", "carol"] {
            let stored = user(name);
            repo.insert_user(&stored).await.unwrap();
            if name != "carol" {
                repo.update_user(
                    &UserFilter::Username(name.into()),
                    &UserUpdate::PushCalendarEvent {
                        calendar_id: stored.calendars[0].id,
                        event_id,
                    },
                )
                .await
                .unwrap();
            }
        }

        let holder = repo
            .find_user(&UserFilter::UsernameHoldsEvent {
                username: "bob".into(),
                event_id,
            })
            .await
            .unwrap();
        assert!(holder.is_some());

        let result = repo
            .update_users(
                &UserFilter::HoldsEvent(event_id),
                &UserUpdate::PullEvent(event_id),
            )
            .await
            .unwrap();
        assert_eq!(result, WriteResult::new(2, 2));

        let none_left = repo
            .find_user(&UserFilter::HoldsEvent(event_id))
            .await
            .unwrap();
        assert!(none_left.is_none());
        assert_eq!(count_rows(&repo, "users").await, 3);
    }

    #[tokio::test]
    async fn test_set_name_counts_as_modified() {
        let repo = setup().await;
        repo.insert_user(&user("alice")).await.unwrap();

        let update = UserUpdate::SetName {
            first_name: "Alice".into(),
            last_name: "Liddell".into(),
        };
        let result = repo
            .update_user(&UserFilter::Username("alice".into()), &update)
            .await
            .unwrap();
        assert_eq!(result, WriteResult::new(1, 1));

        let found = repo
            .find_user(&UserFilter::Username("alice".into()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.last_name, "Liddell");
    }

    #[tokio::test]
    async fn test_bound_values_are_not_interpolated() {
        let repo = setup().await;
        repo.insert_event(&event("alice", "Plain", 1, 1)).await.unwrap();

        let found = repo
            .find_events(
                &EventFilter::OwnersContain("alice' OR 1=1 --".into()),
                &EventSort::none(),
            )
            .await
            .unwrap();
        assert!(found.is_empty());
    }
}
