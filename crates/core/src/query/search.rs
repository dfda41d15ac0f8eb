use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::date_filter::{parse_date_token, DateFilter};
use crate::calendar::validate_priority;
use crate::error::{PlannerError, Result};
use crate::storage::{EventFilter, EventSort, SortField, SortKey};
use crate::validation::{parse_integer, require_string};

/// Which field a search term is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchType {
    User,
    TitleDescription,
    Date,
    Priority,
}

impl SearchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::User => "User",
            SearchType::TitleDescription => "Title/Description",
            SearchType::Date => "Date",
            SearchType::Priority => "Priority",
        }
    }
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchType {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "User" => Ok(SearchType::User),
            "Title/Description" => Ok(SearchType::TitleDescription),
            "Date" => Ok(SearchType::Date),
            "Priority" => Ok(SearchType::Priority),
            other => Err(PlannerError::InvalidArgument(format!(
                "'{other}' is not a valid search type."
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// `+1` for ascending, `-1` for descending.
    pub fn direction(&self) -> i8 {
        match self {
            SortOrder::Asc => 1,
            SortOrder::Desc => -1,
        }
    }

    fn key(&self, field: SortField) -> SortKey {
        match self {
            SortOrder::Asc => SortKey::asc(field),
            SortOrder::Desc => SortKey::desc(field),
        }
    }
}

impl FromStr for SortOrder {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(PlannerError::InvalidArgument(format!(
                "'{other}' is not a valid sort order, expected 'asc' or 'desc'."
            ))),
        }
    }
}

/// A validated search term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchTerm {
    Owner(String),
    Text(String),
    Date(DateFilter),
    Priority(u8),
}

/// A fully validated search, ready to compile into a store query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub term: SearchTerm,
    pub order: SortOrder,
}

impl SearchRequest {
    /// Validates the raw `(searchType, searchTerm, order)` triple.
    ///
    /// ```
    /// use duedesk_core::query::{SearchRequest, SearchTerm, SortOrder};
    ///
    /// let request = SearchRequest::parse("Priority", " 3 ", "desc").unwrap();
    /// assert_eq!(request.term, SearchTerm::Priority(3));
    /// assert_eq!(request.order, SortOrder::Desc);
    ///
    /// assert!(SearchRequest::parse("Colour", "red", "asc").is_err());
    /// assert!(SearchRequest::parse("Priority", "9", "asc").is_err());
    /// ```
    pub fn parse(search_type: &str, search_term: &str, order: &str) -> Result<Self> {
        let search_type: SearchType = require_string(search_type, true)?.parse()?;
        let order: SortOrder = require_string(order, true)?.parse()?;
        let raw = require_string(search_term, true)?;

        let term = match search_type {
            SearchType::User => SearchTerm::Owner(raw.to_string()),
            SearchType::TitleDescription => SearchTerm::Text(raw.to_string()),
            SearchType::Date => SearchTerm::Date(parse_date_token(raw)?),
            SearchType::Priority => SearchTerm::Priority(validate_priority(parse_integer(raw)?)?),
        };
        Ok(Self { term, order })
    }

    pub fn search_type(&self) -> SearchType {
        match self.term {
            SearchTerm::Owner(_) => SearchType::User,
            SearchTerm::Text(_) => SearchType::TitleDescription,
            SearchTerm::Date(_) => SearchType::Date,
            SearchTerm::Priority(_) => SearchType::Priority,
        }
    }

    /// Compiles the term into a store predicate.
    pub fn to_filter(&self) -> Result<EventFilter> {
        match &self.term {
            SearchTerm::Owner(owner) => Ok(EventFilter::OwnersContain(owner.clone())),
            SearchTerm::Text(text) => Ok(EventFilter::TextContains(text.clone())),
            SearchTerm::Date(filter) => filter.predicate().to_filter(),
            SearchTerm::Priority(priority) => Ok(EventFilter::PriorityEq(*priority)),
        }
    }

    /// Priority in the requested order, optionally followed by deadline ascending.
    pub fn sort(&self, deadline_tiebreak: bool) -> EventSort {
        let sort = EventSort::by(self.order.key(SortField::Priority));
        if deadline_tiebreak {
            sort.then(SortKey::asc(SortField::Deadline))
        } else {
            sort
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::DatePredicate;
    use crate::storage::SortDirection;

    #[test]
    fn test_search_type_is_exact() {
        assert_eq!("User".parse::<SearchType>().unwrap(), SearchType::User);
        assert_eq!(
            "Title/Description".parse::<SearchType>().unwrap(),
            SearchType::TitleDescription
        );
        assert!("user".parse::<SearchType>().is_err());
        assert!("Title".parse::<SearchType>().is_err());
    }

    #[test]
    fn test_sort_order_direction() {
        assert_eq!("asc".parse::<SortOrder>().unwrap().direction(), 1);
        assert_eq!("desc".parse::<SortOrder>().unwrap().direction(), -1);
        assert!("down".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_parse_user_keeps_term_as_given() {
        let request = SearchRequest::parse("User", " Alice ", "asc").unwrap();
        assert_eq!(request.term, SearchTerm::Owner("Alice".into()));
        assert_eq!(
            request.to_filter().unwrap(),
            EventFilter::OwnersContain("Alice".into())
        );
    }

    #[test]
    fn test_parse_text() {
        let request = SearchRequest::parse("Title/Description", "lunch", "asc").unwrap();
        assert_eq!(request.search_type(), SearchType::TitleDescription);
        assert_eq!(
            request.to_filter().unwrap(),
            EventFilter::TextContains("lunch".into())
        );
    }

    #[test]
    fn test_parse_priority_bounds() {
        assert!(SearchRequest::parse("Priority", "0", "asc").is_err());
        assert!(SearchRequest::parse("Priority", "2.5", "asc").is_err());
        assert!(SearchRequest::parse("Priority", "high", "asc").is_err());
        assert_eq!(
            SearchRequest::parse("Priority", "5", "asc").unwrap().term,
            SearchTerm::Priority(5)
        );
    }

    #[test]
    fn test_parse_date_term() {
        let request = SearchRequest::parse("Date", "XX/15/2024", "desc").unwrap();
        match request.term {
            SearchTerm::Date(filter) => assert_eq!(
                filter.predicate(),
                DatePredicate::DayYear {
                    day: 15,
                    year: 2024
                }
            ),
            other => panic!("unexpected term {other:?}"),
        }
    }

    #[test]
    fn test_unconstrained_date_fails_on_compile() {
        let request = SearchRequest::parse("Date", "XX/XX/XXXX", "asc").unwrap();
        assert!(matches!(
            request.to_filter(),
            Err(PlannerError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_empty_inputs_rejected() {
        assert!(SearchRequest::parse("User", "  ", "asc").is_err());
        assert!(SearchRequest::parse("", "alice", "asc").is_err());
        assert!(SearchRequest::parse("User", "alice", "").is_err());
    }

    #[test]
    fn test_sort_keys() {
        let request = SearchRequest::parse("User", "alice", "desc").unwrap();
        let with = request.sort(true);
        assert_eq!(with.keys.len(), 2);
        assert_eq!(with.keys[0].field, SortField::Priority);
        assert_eq!(with.keys[0].direction, SortDirection::Descending);
        assert_eq!(with.keys[1], SortKey::asc(SortField::Deadline));
        assert_eq!(request.sort(false).keys.len(), 1);
    }
}
