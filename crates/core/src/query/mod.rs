//! Search and filter resolution.
//!
//! Turns raw search input into validated requests, store predicates and sort
//! orders. Execution and the final ownership gate happen in the shell.

mod date_filter;
mod search;

pub use date_filter::{parse_date_token, DateFilter, DatePredicate};
pub use search::{SearchRequest, SearchTerm, SearchType, SortOrder};
