//! Pure functions for mapping planner errors to HTTP status codes.
//!
//! The web front end that consumes this crate renders every outcome as a page
//! or a JSON body; these mappings decide which status accompanies it.

use crate::error::PlannerError;
use crate::storage::RepositoryError;

/// Maps a [`RepositoryError`] to an HTTP status code.
///
/// - `NotFound` -> 404 (Not Found)
/// - `AlreadyExists` -> 409 (Conflict)
/// - `ConnectionFailed` -> 503 (Service Unavailable)
/// - `QueryFailed` -> 500 (Internal Server Error)
/// - `Serialization` -> 500 (Internal Server Error)
/// - `InvalidData` -> 400 (Bad Request)
///
/// # Examples
///
/// ```
/// use duedesk_core::http_mapping::repository_error_to_status_code;
/// use duedesk_core::storage::RepositoryError;
///
/// let error = RepositoryError::NotFound {
///     entity_type: "Event",
///     id: "64b7f0c2a1b2c3d4e5f60718".to_string(),
/// };
/// assert_eq!(repository_error_to_status_code(&error), 404);
/// ```
pub fn repository_error_to_status_code(error: &RepositoryError) -> u16 {
    match error {
        RepositoryError::NotFound { .. } => 404,
        RepositoryError::AlreadyExists { .. } => 409,
        RepositoryError::ConnectionFailed(_) => 503,
        RepositoryError::QueryFailed(_) => 500,
        RepositoryError::Serialization(_) => 500,
        RepositoryError::InvalidData(_) => 400,
    }
}

/// Maps a [`PlannerError`] to an HTTP status code.
///
/// `NoResults` is a normal outcome (an empty-state page), so it maps to 200.
///
/// ```
/// use duedesk_core::http_mapping::error_to_status_code;
/// use duedesk_core::PlannerError;
///
/// assert_eq!(error_to_status_code(&PlannerError::no_events()), 200);
/// ```
pub fn error_to_status_code(error: &PlannerError) -> u16 {
    match error {
        PlannerError::InvalidArgument(_) => 400,
        PlannerError::NotFound(_) => 404,
        PlannerError::Forbidden(_) => 403,
        PlannerError::NoResults(_) => 200,
        PlannerError::StoreInconsistency(_) => 500,
        PlannerError::Store(inner) => repository_error_to_status_code(inner),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_not_found_maps_to_404() {
        let error = RepositoryError::NotFound {
            entity_type: "User",
            id: "alice".to_string(),
        };
        assert_eq!(repository_error_to_status_code(&error), 404);
    }

    #[test]
    fn test_repository_already_exists_maps_to_409() {
        let error = RepositoryError::AlreadyExists {
            entity_type: "User",
            id: "alice".to_string(),
        };
        assert_eq!(repository_error_to_status_code(&error), 409);
    }

    #[test]
    fn test_connection_failed_maps_to_503() {
        let error = RepositoryError::ConnectionFailed("database is locked".to_string());
        assert_eq!(repository_error_to_status_code(&error), 503);
    }

    #[test]
    fn test_serialization_maps_to_500() {
        let error = RepositoryError::Serialization("owners column is not JSON".to_string());
        assert_eq!(repository_error_to_status_code(&error), 500);
    }

    #[test]
    fn test_planner_error_kinds() {
        assert_eq!(
            error_to_status_code(&PlannerError::InvalidArgument("x".into())),
            400
        );
        assert_eq!(error_to_status_code(&PlannerError::NotFound("x".into())), 404);
        assert_eq!(error_to_status_code(&PlannerError::Forbidden("x".into())), 403);
        assert_eq!(error_to_status_code(&PlannerError::no_events()), 200);
        assert_eq!(
            error_to_status_code(&PlannerError::StoreInconsistency("x".into())),
            500
        );
    }

    #[test]
    fn test_store_error_delegates_to_repository_mapping() {
        let error = PlannerError::Store(RepositoryError::ConnectionFailed("down".into()));
        assert_eq!(error_to_status_code(&error), 503);
    }
}
