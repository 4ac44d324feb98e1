//! MCP tool implementations.
//!
//! Each tool validates its parameters, calls into the client services and
//! returns pretty-printed JSON as text content.

pub mod credential;
pub mod favicon;
pub mod movie;

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;

use crate::error::ServerError;

/// Wrap `output` as a successful tool result.
pub fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output).map_err(ServerError::from)?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}
