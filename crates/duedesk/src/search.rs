//! Search execution.
//!
//! Requests are validated and compiled in `duedesk_core::query`; this module
//! runs them against the store and applies the ownership gate. Every search
//! result is filtered to events the accessor owns, whatever the store
//! predicate was.

use duedesk_core::access::retain_authorized;
use duedesk_core::calendar::Event;
use duedesk_core::query::{SearchRequest, SearchType};
use duedesk_core::storage::EventFilter;
use duedesk_core::{PlannerError, Result};

use crate::events::username_arg;
use crate::state::AppState;

/// Resolves a raw `(search type, term, order)` search for an accessor.
///
/// An empty result is `NoResults`.
pub async fn filter_events(
    state: &AppState,
    search_type: &str,
    search_term: &str,
    order: &str,
    accessor: &str,
) -> Result<Vec<Event>> {
    let request = SearchRequest::parse(search_type, search_term, order)?;
    let accessor = username_arg(accessor)?;
    run_search(state, &request, &accessor).await
}

/// Events of exactly this priority (`1`..=`5`).
pub async fn filter_event_priority(
    state: &AppState,
    priority: &str,
    order: &str,
    accessor: &str,
) -> Result<Vec<Event>> {
    filter_events(state, SearchType::Priority.as_str(), priority, order, accessor).await
}

/// Events matching an `MM/DD/YYYY` token with `XX` / `XXXX` placeholders.
pub async fn filter_event_date(
    state: &AppState,
    date: &str,
    order: &str,
    accessor: &str,
) -> Result<Vec<Event>> {
    filter_events(state, SearchType::Date.as_str(), date, order, accessor).await
}

/// Runs an already validated request. `accessor` must be canonical.
pub async fn run_search(
    state: &AppState,
    request: &SearchRequest,
    accessor: &str,
) -> Result<Vec<Event>> {
    let mut filter = request.to_filter()?;
    if state.config.scoped_search {
        filter = filter.and(EventFilter::OwnersContain(accessor.to_string()));
    }
    let sort = request.sort(state.config.deadline_tiebreak);

    tracing::debug!(
        search_type = %request.search_type(),
        ?filter,
        ?sort,
        accessor,
        "Resolved search"
    );

    let found = state.events.find_events(&filter, &sort).await?;
    let visible = retain_authorized(found, accessor);

    if visible.is_empty() {
        return Err(PlannerError::no_events());
    }
    Ok(visible)
}
