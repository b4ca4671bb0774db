//! Plan parsing from LLM responses.
//!
//! Model replies are prose that should contain one JSON object. The parser
//! extracts the first top-level object by brace matching (string- and
//! escape-aware, so braces inside string values do not confuse it) and
//! decodes it into a [`Plan`]. Everything around the object is tolerated
//! and ignored.
//!
//! The caller decides what a failure means; the reasoning loop substitutes
//! [`Plan::fallback`](super::Plan::fallback) and keeps going.

use super::{Plan, PlanAction};
use thiserror::Error;

/// Why a model reply failed to decode into a [`Plan`].
#[derive(Error, Debug)]
pub enum PlanParseError {
    #[error("no JSON object found in response")]
    NoJsonObject,

    #[error("malformed plan JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("call_tool plan is missing a tool name")]
    MissingToolName,
}

/// Extract the first top-level JSON object from free-form text.
///
/// Returns the exact slice spanning the balanced braces, or `None` when no
/// complete object exists (including an opening brace that never closes).
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + i + 1]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Parse a model reply into a [`Plan`].
///
/// Decodes the first top-level JSON object in the text, then enforces the
/// structural invariant that a `call_tool` plan names a tool.
pub fn parse_plan(text: &str) -> Result<Plan, PlanParseError> {
    let json = extract_json_object(text).ok_or(PlanParseError::NoJsonObject)?;
    let plan: Plan = serde_json::from_str(json)?;

    if plan.action == PlanAction::CallTool {
        let has_tool_name = plan
            .tool_call
            .as_ref()
            .is_some_and(|call| !call.name.trim().is_empty());
        if !has_tool_name {
            return Err(PlanParseError::MissingToolName);
        }
    }

    Ok(plan)
}
