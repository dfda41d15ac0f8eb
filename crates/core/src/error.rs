use thiserror::Error;

use crate::calendar::EventError;
use crate::datetime::DateError;
use crate::storage::RepositoryError;
use crate::validation::ValidationError;

/// Errors surfaced by every event, comment, calendar and search operation.
///
/// Validation and authorization failures are always detected before a
/// mutation reaches the store, so an `Err` never means a partial write.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlannerError {
    /// Malformed or out-of-range input, detected before any store access.
    #[error("Error: {0}")]
    InvalidArgument(String),

    /// No document matches the given identifier.
    #[error("Error: {0}")]
    NotFound(String),

    /// The accessor is authenticated but does not own the resource.
    #[error("Error: {0}")]
    Forbidden(String),

    /// A well-formed search matched nothing the accessor may see.
    #[error("{0}")]
    NoResults(String),

    /// A write reported zero affected documents after its preconditions passed.
    #[error("Error: {0}")]
    StoreInconsistency(String),

    /// The store call itself failed.
    #[error("Error: {0}")]
    Store(#[from] RepositoryError),
}

impl PlannerError {
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("Could not find {entity} with id '{id}'."))
    }

    pub fn forbidden(accessor: &str, entity: &str, id: impl std::fmt::Display) -> Self {
        Self::Forbidden(format!(
            "User '{accessor}' is not authorized to access the {entity} with id '{id}'."
        ))
    }

    pub fn no_events() -> Self {
        Self::NoResults("Sorry, no events could be found.".to_string())
    }

    /// Returns true for the recoverable "empty search" outcome.
    pub fn is_no_results(&self) -> bool {
        matches!(self, Self::NoResults(_))
    }
}

impl From<ValidationError> for PlannerError {
    fn from(err: ValidationError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}

impl From<DateError> for PlannerError {
    fn from(err: DateError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}

impl From<EventError> for PlannerError {
    fn from(err: EventError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}

/// Result type for planner operations.
pub type Result<T> = std::result::Result<T, PlannerError>;
