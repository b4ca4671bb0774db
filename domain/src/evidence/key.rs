//! Deterministic identity for tool calls.

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Identity of a `(tool, params)` invocation (Value Object).
///
/// The key is `tool_name + ":" + hex(sha256(canonical_json(params)))`.
/// `serde_json` maps serialize with sorted keys, so two parameter maps with
/// the same contents produce the same digest regardless of insertion order.
/// The full-width digest makes collisions between distinct parameter
/// payloads practically impossible, which both the reasoning loop's dedup
/// set and the pipeline's cache rely on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ToolKey(String);

impl ToolKey {
    pub fn new(tool: &str, params: &Map<String, Value>) -> Self {
        let canonical = serde_json::to_vec(params).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(&canonical);
        let digest = hex::encode(hasher.finalize());
        Self(format!("{}:{}", tool, digest))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key under which a failed call's sentinel evidence is stored.
    pub fn error_key(&self) -> String {
        format!("{}:error", self.0)
    }
}

impl std::fmt::Display for ToolKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_key_is_order_insensitive() {
        let a = ToolKey::new("query_deals", &params(json!({"owner": "Jane", "stage": "open"})));
        let b = ToolKey::new("query_deals", &params(json!({"stage": "open", "owner": "Jane"})));
        assert_eq!(a, b);
    }

    #[test]
    fn test_key_differs_by_params() {
        let a = ToolKey::new("query_deals", &params(json!({"owner": "Jane"})));
        let b = ToolKey::new("query_deals", &params(json!({"owner": "John"})));
        assert_ne!(a, b);
    }

    #[test]
    fn test_key_differs_by_tool() {
        let p = params(json!({"owner": "Jane"}));
        let a = ToolKey::new("query_deals", &p);
        let b = ToolKey::new("query_accounts", &p);
        assert_ne!(a, b);
    }

    #[test]
    fn test_key_format() {
        let key = ToolKey::new("query_deals", &Map::new());
        let (tool, digest) = key.as_str().split_once(':').unwrap();
        assert_eq!(tool, "query_deals");
        // sha256 hex digest
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_large_params_do_not_collide() {
        // Shared long prefix, difference buried deep in the payload
        let filler = "x".repeat(500);
        let a = ToolKey::new(
            "export_report",
            &params(json!({"columns": filler.clone(), "page": 1})),
        );
        let b = ToolKey::new(
            "export_report",
            &params(json!({"columns": filler, "page": 2})),
        );
        assert_ne!(a, b);
    }

    #[test]
    fn test_error_key_suffix() {
        let key = ToolKey::new("query_deals", &Map::new());
        assert_eq!(key.error_key(), format!("{}:error", key.as_str()));
    }

    #[test]
    fn test_nested_params_are_canonical() {
        let a = ToolKey::new(
            "query_deals",
            &params(json!({"filter": {"stage": "open", "min": 5}})),
        );
        let b = ToolKey::new(
            "query_deals",
            &params(json!({"filter": {"min": 5, "stage": "open"}})),
        );
        assert_eq!(a, b);
    }
}
