//! Working memory of the reasoning loop.

use crate::core::budget::{EVIDENCE_ARRAY_MAX_ITEMS, EVIDENCE_ENTRY_CHARS};
use crate::core::string::truncate;
use crate::evidence::bound::bound_json;
use crate::evidence::key::ToolKey;
use serde_json::Value;

/// Insertion-ordered map from tool-call identity to result payload.
///
/// Accumulated results grow without bound across iterations, so every
/// rendering path is budgeted: preview entries are array-capped and
/// character-capped before they enter a planning prompt, and synthesis
/// entries are character-capped before the final call.
#[derive(Debug, Default)]
pub struct EvidenceAccumulator {
    entries: Vec<(String, Value)>,
}

impl EvidenceAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a result payload under a key, replacing any prior value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// Store the failure sentinel for a tool call under its `:error` key.
    pub fn insert_error(&mut self, key: &ToolKey, message: &str) {
        self.insert(
            key.error_key(),
            Value::String(format!("[TOOL FAILED: {}]", message)),
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Bounded rendering for planning prompts.
    ///
    /// Arrays beyond [`EVIDENCE_ARRAY_MAX_ITEMS`] elements are cut and
    /// flagged, then each entry is serialized and capped at
    /// [`EVIDENCE_ENTRY_CHARS`] characters.
    pub fn prompt_preview(&self) -> String {
        self.render(|value| {
            let bounded = bound_json(value, EVIDENCE_ARRAY_MAX_ITEMS);
            serde_json::to_string(&bounded).unwrap_or_default()
        })
    }

    /// Rendering for the final synthesis call: every entry, each capped at
    /// [`EVIDENCE_ENTRY_CHARS`] characters.
    pub fn synthesis_block(&self) -> String {
        self.render(|value| serde_json::to_string(value).unwrap_or_default())
    }

    fn render(&self, serialize: impl Fn(&Value) -> String) -> String {
        let mut out = String::new();
        for (key, value) in &self.entries {
            if !out.is_empty() {
                out.push_str("\n\n");
            }
            out.push_str("### ");
            out.push_str(key);
            out.push('\n');
            out.push_str(&truncate(&serialize(value), EVIDENCE_ENTRY_CHARS));
        }
        out
    }
}
