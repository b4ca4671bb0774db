//! Cited-record derivation from tool results.

use crate::run::records::ToolCallRecord;
use serde_json::Value;
use std::collections::HashSet;

/// A CRM record referenced by the evidence trail (Value Object).
///
/// Best-effort presentation metadata for the UI's citation panel; nothing
/// downstream depends on it for correctness.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CitedRecord {
    pub record_type: String,
    pub id: String,
    pub label: Option<String>,
}

/// Known result-array fields and how many citations each may contribute.
const CITATION_SHAPES: &[(&str, &str, usize)] = &[
    ("deals", "deal", 20),
    ("accounts", "account", 10),
    ("conversations", "conversation", 15),
    ("contacts", "contact", 10),
];

/// Fields probed, in order, for a human-readable label.
const LABEL_FIELDS: &[&str] = &["name", "title", "subject", "email"];

/// Scan successful tool results for known CRM record shapes and collect
/// citations, deduplicated by entity id, capped per record type.
pub fn derive_cited_records(tool_calls: &[ToolCallRecord]) -> Vec<CitedRecord> {
    let mut cited = Vec::new();
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut counts = [0usize; CITATION_SHAPES.len()];

    for record in tool_calls {
        let Some(result) = &record.result else {
            continue;
        };
        let Some(object) = result.as_object() else {
            continue;
        };

        for (shape_index, (field, record_type, cap)) in CITATION_SHAPES.iter().enumerate() {
            let Some(items) = object.get(*field).and_then(Value::as_array) else {
                continue;
            };
            for item in items {
                if counts[shape_index] >= *cap {
                    break;
                }
                let Some(id) = entity_id(item) else {
                    continue;
                };
                if !seen.insert((record_type.to_string(), id.clone())) {
                    continue;
                }
                counts[shape_index] += 1;
                cited.push(CitedRecord {
                    record_type: record_type.to_string(),
                    id,
                    label: entity_label(item),
                });
            }
        }
    }

    cited
}

fn entity_id(item: &Value) -> Option<String> {
    match item.get("id")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn entity_label(item: &Value) -> Option<String> {
    LABEL_FIELDS
        .iter()
        .find_map(|field| item.get(*field).and_then(Value::as_str))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call_with_result(result: Value) -> ToolCallRecord {
        ToolCallRecord {
            tool: "query_deals".to_string(),
            params: serde_json::Map::new(),
            result: Some(result),
            error: None,
            description: String::new(),
        }
    }

    #[test]
    fn test_derives_deals_with_labels() {
        let calls = vec![call_with_result(json!({
            "deals": [
                {"id": "d1", "name": "Acme renewal"},
                {"id": "d2", "title": "Globex expansion"},
            ]
        }))];

        let cited = derive_cited_records(&calls);
        assert_eq!(cited.len(), 2);
        assert_eq!(cited[0].record_type, "deal");
        assert_eq!(cited[0].id, "d1");
        assert_eq!(cited[0].label.as_deref(), Some("Acme renewal"));
        assert_eq!(cited[1].label.as_deref(), Some("Globex expansion"));
    }

    #[test]
    fn test_caps_per_record_type() {
        let deals: Vec<Value> = (0..30).map(|i| json!({"id": format!("d{}", i)})).collect();
        let accounts: Vec<Value> = (0..30).map(|i| json!({"id": format!("a{}", i)})).collect();
        let calls = vec![call_with_result(json!({
            "deals": deals,
            "accounts": accounts,
        }))];

        let cited = derive_cited_records(&calls);
        let deal_count = cited.iter().filter(|c| c.record_type == "deal").count();
        let account_count = cited.iter().filter(|c| c.record_type == "account").count();
        assert_eq!(deal_count, 20);
        assert_eq!(account_count, 10);
    }

    #[test]
    fn test_dedupes_by_entity_id_across_calls() {
        let calls = vec![
            call_with_result(json!({"deals": [{"id": "d1"}]})),
            call_with_result(json!({"deals": [{"id": "d1"}, {"id": "d2"}]})),
        ];

        let cited = derive_cited_records(&calls);
        assert_eq!(cited.len(), 2);
    }

    #[test]
    fn test_numeric_ids_accepted() {
        let calls = vec![call_with_result(json!({"contacts": [{"id": 42, "email": "jane@acme.com"}]}))];

        let cited = derive_cited_records(&calls);
        assert_eq!(cited[0].id, "42");
        assert_eq!(cited[0].record_type, "contact");
        assert_eq!(cited[0].label.as_deref(), Some("jane@acme.com"));
    }

    #[test]
    fn test_failed_calls_and_unknown_shapes_ignored() {
        let failed = ToolCallRecord {
            tool: "query_deals".to_string(),
            params: serde_json::Map::new(),
            result: None,
            error: Some("boom".to_string()),
            description: String::new(),
        };
        let unknown = call_with_result(json!({"widgets": [{"id": "w1"}]}));
        let scalar = call_with_result(json!("plain text result"));

        assert!(derive_cited_records(&[failed, unknown, scalar]).is_empty());
    }

    #[test]
    fn test_items_without_ids_skipped() {
        let calls = vec![call_with_result(json!({
            "deals": [{"name": "no id"}, {"id": "", "name": "empty id"}, {"id": "d1"}]
        }))];

        let cited = derive_cited_records(&calls);
        assert_eq!(cited.len(), 1);
        assert_eq!(cited[0].id, "d1");
    }
}
