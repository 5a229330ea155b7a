//! Error handling utilities for MCP server

use rmcp::ErrorData;
use stride_core::{ErrorKind, GoalError};

/// Converts a goal error to an MCP error, keeping the user-facing wording.
pub fn to_mcp_error(message: &str, error: &GoalError) -> ErrorData {
    let text = format!("{message}: {}", error.user_message());
    match error.kind() {
        ErrorKind::Validation => ErrorData::invalid_params(text, None),
        ErrorKind::NotFound => ErrorData::resource_not_found(text, None),
        ErrorKind::NotAuthenticated => ErrorData::invalid_request(text, None),
        _ => ErrorData::internal_error(text, None),
    }
}
