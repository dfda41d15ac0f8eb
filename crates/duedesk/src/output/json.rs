//! JSON output formatting.

use duedesk_core::http_mapping::error_to_status_code;
use duedesk_core::PlannerError;

/// Format a value as JSON.
pub fn format_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

/// Format an error as `{"error": ..., "status": ...}`.
pub fn format_error(error: &PlannerError) -> String {
    serde_json::json!({
        "error": error.to_string(),
        "status": error_to_status_code(error),
    })
    .to_string()
}
