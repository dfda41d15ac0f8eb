//! Functional core for duedesk.
//!
//! Everything in this crate is pure: domain types, input validation, date
//! conversion, authorization checks, query compilation and the repository
//! traits that the imperative shell implements. Nothing here performs I/O.

pub mod access;
pub mod calendar;
pub mod datetime;
pub mod error;
pub mod http_mapping;
pub mod query;
pub mod storage;
pub mod validation;

pub use error::{PlannerError, Result};
