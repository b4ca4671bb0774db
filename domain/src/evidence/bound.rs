//! Recursive array capping for JSON payloads.

use serde_json::{Map, Value, json};

/// Cap every array in `value` to at most `max_items` elements.
///
/// When an array inside an object is cut, the containing object gains a
/// `"_truncated": true` flag so downstream consumers (prompts, the ledger
/// row, the UI) can tell that records were dropped. A root-level array that
/// is cut has no containing object, so it is wrapped as
/// `{"items": [...], "_truncated": true}`.
pub fn bound_json(value: &Value, max_items: usize) -> Value {
    match value {
        Value::Array(items) => {
            let cut = items.len() > max_items;
            let bounded: Vec<Value> = items
                .iter()
                .take(max_items)
                .map(|item| bound_json(item, max_items))
                .collect();
            if cut {
                json!({ "items": bounded, "_truncated": true })
            } else {
                Value::Array(bounded)
            }
        }
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            let mut any_cut = false;
            for (key, entry) in map {
                match entry {
                    Value::Array(items) => {
                        if items.len() > max_items {
                            any_cut = true;
                        }
                        let bounded: Vec<Value> = items
                            .iter()
                            .take(max_items)
                            .map(|item| bound_json(item, max_items))
                            .collect();
                        out.insert(key.clone(), Value::Array(bounded));
                    }
                    other => {
                        out.insert(key.clone(), bound_json(other, max_items));
                    }
                }
            }
            if any_cut {
                out.insert("_truncated".to_string(), Value::Bool(true));
            }
            Value::Object(out)
        }
        other => other.clone(),
    }
}
