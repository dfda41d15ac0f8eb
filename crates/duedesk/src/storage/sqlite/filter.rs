//! Compiles store predicates and sort orders into SQL fragments.
//!
//! Pure functions: each returns a `WHERE` clause using anonymous `?`
//! placeholders plus the values to bind, in order.

use rusqlite::functions::FunctionFlags;
use rusqlite::types::Value;

use duedesk_core::storage::{
    DeadlinePart, EventFilter, EventSort, SortDirection, SortField, UserFilter,
};

/// A SQL boolean expression and its bound parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Clause {
    fn new(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    fn always() -> Self {
        Self::new("1 = 1", Vec::new())
    }

    fn never() -> Self {
        Self::new("0 = 1", Vec::new())
    }
}

fn text(value: impl Into<String>) -> Value {
    Value::Text(value.into())
}

/// SQL name of the Unicode lower-casing function. SQLite's own `lower()`
/// only folds ASCII.
pub const FOLD_CASE: &str = "fold_case";

/// Registers [`FOLD_CASE`] on a connection. Must run on every connection
/// before a `TextContains` clause is executed.
pub fn register_functions(conn: &rusqlite::Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        FOLD_CASE,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let value: Option<String> = ctx.get(0)?;
            Ok(value.map(|v| v.to_lowercase()))
        },
    )
}

const HOLDS_EVENT: &str = "EXISTS (SELECT 1 FROM json_each(users.calendars) AS c, \
     json_each(c.value, '$.events') AS e WHERE e.value = ?)";

pub fn event_clause(filter: &EventFilter) -> Clause {
    match filter {
        EventFilter::All => Clause::always(),
        EventFilter::Id(id) => Clause::new("id = ?", vec![text(id.to_string())]),
        EventFilter::Ids(ids) if ids.is_empty() => Clause::never(),
        EventFilter::Ids(ids) => {
            let placeholders = vec!["?"; ids.len()].join(", ");
            Clause::new(
                format!("id IN ({placeholders})"),
                ids.iter().map(|id| text(id.to_string())).collect(),
            )
        }
        EventFilter::OwnersContain(owner) => Clause::new(
            "EXISTS (SELECT 1 FROM json_each(events.owners) AS o WHERE o.value = ?)",
            vec![text(owner.clone())],
        ),
        EventFilter::TextContains(needle) => {
            let needle = needle.to_lowercase();
            Clause::new(
                format!(
                    "(instr({FOLD_CASE}(title), ?) > 0 \
                     OR instr({FOLD_CASE}(description), ?) > 0)"
                ),
                vec![text(needle.clone()), text(needle)],
            )
        }
        EventFilter::PriorityEq(priority) => {
            Clause::new("priority = ?", vec![Value::Integer(*priority as i64)])
        }
        EventFilter::DeadlinePart { part, value } => {
            let column = match part {
                DeadlinePart::Year => "deadline_year",
                DeadlinePart::Month => "deadline_month",
                DeadlinePart::Day => "deadline_day",
            };
            Clause::new(format!("{column} = ?"), vec![Value::Integer(*value as i64)])
        }
        EventFilter::CommentId(id) => Clause::new(
            "EXISTS (SELECT 1 FROM json_each(events.comments) AS c \
             WHERE json_extract(c.value, '$.id') = ?)",
            vec![text(id.to_string())],
        ),
        EventFilter::And(filters) if filters.is_empty() => Clause::always(),
        EventFilter::And(filters) => {
            let clauses: Vec<Clause> = filters.iter().map(event_clause).collect();
            conjunction(clauses)
        }
    }
}

pub fn user_clause(filter: &UserFilter) -> Clause {
    match filter {
        UserFilter::Username(username) => {
            Clause::new("username = ?", vec![text(username.clone())])
        }
        UserFilter::CalendarId(id) => Clause::new(
            "EXISTS (SELECT 1 FROM json_each(users.calendars) AS c \
             WHERE json_extract(c.value, '$.id') = ?)",
            vec![text(id.to_string())],
        ),
        UserFilter::HoldsEvent(event_id) => {
            Clause::new(HOLDS_EVENT, vec![text(event_id.to_string())])
        }
        UserFilter::UsernameHoldsEvent { username, event_id } => conjunction(vec![
            Clause::new("username = ?", vec![text(username.clone())]),
            Clause::new(HOLDS_EVENT, vec![text(event_id.to_string())]),
        ]),
    }
}

fn conjunction(clauses: Vec<Clause>) -> Clause {
    let sql = clauses
        .iter()
        .map(|c| format!("({})", c.sql))
        .collect::<Vec<_>>()
        .join(" AND ");
    let params = clauses.into_iter().flat_map(|c| c.params).collect();
    Clause::new(sql, params)
}

/// `ORDER BY` body. Insertion order always breaks remaining ties.
pub fn order_by(sort: &EventSort) -> String {
    let mut terms: Vec<String> = sort
        .keys
        .iter()
        .map(|key| {
            let column = match key.field {
                SortField::Priority => "priority",
                SortField::Deadline => "deadline_epoch",
            };
            let direction = match key.direction {
                SortDirection::Ascending => "ASC",
                SortDirection::Descending => "DESC",
            };
            format!("{column} {direction}")
        })
        .collect();
    terms.push("seq ASC".to_string());
    terms.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use duedesk_core::calendar::ObjectId;
    use duedesk_core::storage::{SortKey, SortField};

    #[test]
    fn test_empty_ids_never_match() {
        assert_eq!(event_clause(&EventFilter::Ids(vec![])).sql, "0 = 1");
    }

    #[test]
    fn test_ids_placeholders() {
        let ids = vec![ObjectId::new(), ObjectId::new()];
        let clause = event_clause(&EventFilter::Ids(ids));
        assert_eq!(clause.sql, "id IN (?, ?)");
        assert_eq!(clause.params.len(), 2);
    }

    #[test]
    fn test_text_contains_folds_needle() {
        let clause = event_clause(&EventFilter::TextContains("LuNcH".into()));
        assert!(clause.sql.contains("fold_case(title)"));
        assert_eq!(
            clause.params,
            vec![Value::Text("lunch".into()), Value::Text("lunch".into())]
        );
    }

    #[test]
    fn test_fold_case_handles_non_ascii() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        register_functions(&conn).unwrap();

        let folded: String = conn
            .query_row("SELECT fold_case('ÉTÉ Festival')", [], |row| row.get(0))
            .unwrap();
        assert_eq!(folded, "été festival");

        let sql = "SELECT instr(fold_case('ÉTÉ Festival'), ?) > 0";
        let hit: bool = conn.query_row(sql, ["été"], |row| row.get(0)).unwrap();
        assert!(hit);
    }

    #[test]
    fn test_and_joins_in_order() {
        let filter = EventFilter::And(vec![
            EventFilter::DeadlinePart {
                part: DeadlinePart::Month,
                value: 5,
            },
            EventFilter::OwnersContain("alice".into()),
        ]);
        let clause = event_clause(&filter);

        assert!(clause.sql.starts_with("(deadline_month = ?) AND (EXISTS"));
        assert_eq!(
            clause.params,
            vec![Value::Integer(5), Value::Text("alice".into())]
        );
    }

    #[test]
    fn test_empty_and_matches_everything() {
        assert_eq!(event_clause(&EventFilter::And(vec![])).sql, "1 = 1");
    }

    #[test]
    fn test_username_holds_event_binds_two_params() {
        let clause = user_clause(&UserFilter::UsernameHoldsEvent {
            username: "alice".into(),
            event_id: ObjectId::new(),
        });
        assert_eq!(clause.params.len(), 2);
        assert!(clause.sql.contains("json_each(c.value, '$.events')"));
    }

    #[test]
    fn test_order_by_appends_insertion_order() {
        let sort = EventSort::by(SortKey::desc(SortField::Priority))
            .then(SortKey::asc(SortField::Deadline));
        assert_eq!(
            order_by(&sort),
            "priority DESC, deadline_epoch ASC, seq ASC"
        );
        assert_eq!(order_by(&EventSort::none()), "seq ASC");
    }
}
