//! Tool registry adapter.
//!
//! Dispatches tool invocations to registered handlers by name. This is the
//! in-process stand-in for the skill registry and data-tool dispatch the
//! production system wires in.

use async_trait::async_trait;
use dealsense_application::ports::tool_invoker::{ToolError, ToolInvoker};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A single registered tool.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn handle(&self, params: &Map<String, Value>) -> Result<Value, ToolError>;
}

/// Adapter for plain synchronous functions.
struct FnHandler<F>(F);

#[async_trait]
impl<F> ToolHandler for FnHandler<F>
where
    F: Fn(&Map<String, Value>) -> Result<Value, ToolError> + Send + Sync,
{
    async fn handle(&self, params: &Map<String, Value>) -> Result<Value, ToolError> {
        (self.0)(params)
    }
}

/// Registry keyed by tool name.
///
/// BTreeMap keeps `available_tools` in a stable order for prompts.
#[derive(Default)]
pub struct ToolRegistry {
    handlers: BTreeMap<String, Arc<dyn ToolHandler>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under a tool name, replacing any existing one.
    pub fn register(mut self, name: impl Into<String>, handler: Arc<dyn ToolHandler>) -> Self {
        self.handlers.insert(name.into(), handler);
        self
    }

    /// Register a synchronous function as a tool.
    pub fn register_fn<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Map<String, Value>) -> Result<Value, ToolError> + Send + Sync + 'static,
    {
        self.register(name, Arc::new(FnHandler(f)))
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[async_trait]
impl ToolInvoker for ToolRegistry {
    async fn invoke(&self, tool: &str, params: &Map<String, Value>) -> Result<Value, ToolError> {
        let handler = self
            .handlers
            .get(tool)
            .ok_or_else(|| ToolError::UnknownTool(tool.to_string()))?;
        handler.handle(params).await
    }

    fn has_tool(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    fn available_tools(&self) -> Vec<String> {
        self.handlers.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry() -> ToolRegistry {
        ToolRegistry::new()
            .register_fn("query_deals", |params| {
                let owner = params
                    .get("owner")
                    .and_then(Value::as_str)
                    .unwrap_or("anyone");
                Ok(json!({"deals": [], "owner": owner}))
            })
            .register_fn("query_accounts", |_| {
                Err(ToolError::ExecutionFailed {
                    tool: "query_accounts".to_string(),
                    message: "CRM unreachable".to_string(),
                })
            })
    }

    #[tokio::test]
    async fn test_dispatch_by_name() {
        let registry = registry();
        let mut params = Map::new();
        params.insert("owner".to_string(), json!("Jane"));

        let result = registry.invoke("query_deals", &params).await.unwrap();
        assert_eq!(result["owner"], "Jane");
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let registry = registry();
        let result = registry.invoke("query_widgets", &Map::new()).await;
        assert!(matches!(result, Err(ToolError::UnknownTool(_))));
    }

    #[tokio::test]
    async fn test_handler_errors_pass_through() {
        let registry = registry();
        let result = registry.invoke("query_accounts", &Map::new()).await;
        assert!(matches!(result, Err(ToolError::ExecutionFailed { .. })));
    }

    #[test]
    fn test_available_tools_sorted() {
        let registry = registry();
        assert!(registry.has_tool("query_deals"));
        assert!(!registry.has_tool("query_widgets"));
        assert_eq!(
            registry.available_tools(),
            vec!["query_accounts".to_string(), "query_deals".to_string()]
        );
    }
}
