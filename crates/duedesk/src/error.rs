//! Error helpers shared by the service modules.

use duedesk_core::http_mapping::error_to_status_code;
use duedesk_core::storage::WriteResult;
use duedesk_core::{PlannerError, Result};

/// Turns a write that passed its preconditions but changed nothing into
/// `StoreInconsistency`. `message` completes "Could not ...".
pub fn ensure_modified(result: WriteResult, message: impl FnOnce() -> String) -> Result<()> {
    if result.modified > 0 {
        return Ok(());
    }
    let message = format!("Could not {}.", message());
    tracing::error!(matched = result.matched, %message, "Write modified no documents");
    Err(PlannerError::StoreInconsistency(message))
}

/// Process exit code for a failed command.
///
/// `NoResults` is a normal outcome and exits 0; everything else exits with
/// the HTTP status class of the error (4 or 5).
pub fn exit_code(error: &PlannerError) -> i32 {
    match error_to_status_code(error) {
        200..=299 => 0,
        400..=499 => 4,
        _ => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duedesk_core::storage::RepositoryError;

    #[test]
    fn test_ensure_modified() {
        assert!(ensure_modified(WriteResult::new(1, 1), || unreachable!()).is_ok());

        let err = ensure_modified(WriteResult::new(1, 0), || "replace the event".into())
            .unwrap_err();
        assert_eq!(
            err,
            PlannerError::StoreInconsistency("Could not replace the event.".into())
        );
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code(&PlannerError::no_events()), 0);
        assert_eq!(exit_code(&PlannerError::InvalidArgument("x".into())), 4);
        assert_eq!(exit_code(&PlannerError::Forbidden("x".into())), 4);
        assert_eq!(
            exit_code(&PlannerError::Store(RepositoryError::ConnectionFailed(
                "down".into()
            ))),
            5
        );
    }
}
