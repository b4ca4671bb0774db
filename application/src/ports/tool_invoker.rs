//! Tool Invoker port
//!
//! Defines the interface for executing tools and skills. The reasoning
//! loop dispatches dynamic tool calls through it; the pipeline runner
//! executes its skill steps through the same seam.

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors that can occur during tool invocation
///
/// Errors travel through this enum, never through a sentinel success
/// value. The cores turn them into evidence (loop) or failed-step records
/// (pipeline); they are not thrown past those boundaries except for
/// required pipeline steps.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid parameters for '{tool}': {message}")]
    InvalidParams { tool: String, message: String },

    #[error("Tool '{tool}' failed: {message}")]
    ExecutionFailed { tool: String, message: String },
}

/// Port for tool and skill execution
///
/// Invocations must be safe to dedupe and cache: repeated calls with
/// identical parameters are expected to be idempotent per invocation.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ToolInvoker: Send + Sync {
    /// Execute a tool by name and return its result payload.
    async fn invoke(&self, tool: &str, params: &Map<String, Value>) -> Result<Value, ToolError>;

    /// Check if a tool is available
    fn has_tool(&self, name: &str) -> bool {
        self.available_tools().iter().any(|t| t == name)
    }

    /// Get names of all available tools
    fn available_tools(&self) -> Vec<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ToolError::UnknownTool("query_widgets".to_string());
        assert_eq!(err.to_string(), "Unknown tool: query_widgets");

        let err = ToolError::ExecutionFailed {
            tool: "query_deals".to_string(),
            message: "connection refused".to_string(),
        };
        assert!(err.to_string().contains("query_deals"));
        assert!(err.to_string().contains("connection refused"));
    }
}
