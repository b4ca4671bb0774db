//! Reasoning-loop plans.
//!
//! A [`Plan`] is the structured decision the model emits once per loop
//! iteration: what it observed, what it intends to do next, and how far
//! along the goal is. Plans are decoded from free-form model output by
//! [`parser::parse_plan`]; output that cannot be decoded is replaced by
//! [`Plan::fallback`] so a malformed reply can never crash the loop.

pub mod parser;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Action selected by the model for this iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanAction {
    /// Invoke a tool and feed the result back as evidence.
    #[serde(alias = "callTool", alias = "CallTool")]
    CallTool,
    /// Legacy action. Never executed; the loop redirects the model to an
    /// equivalent tool call instead.
    #[serde(alias = "runSkill", alias = "RunSkill")]
    RunSkill,
    /// Stop iterating and synthesize the final answer.
    #[serde(alias = "synthesizeAndDeliver", alias = "SynthesizeAndDeliver")]
    SynthesizeAndDeliver,
}

impl PlanAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanAction::CallTool => "call_tool",
            PlanAction::RunSkill => "run_skill",
            PlanAction::SynthesizeAndDeliver => "synthesize_and_deliver",
        }
    }
}

impl std::fmt::Display for PlanAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The model's self-assessment of goal completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalProgress {
    #[default]
    #[serde(alias = "None")]
    None,
    #[serde(alias = "Partial")]
    Partial,
    #[serde(alias = "Satisfied")]
    Satisfied,
}

impl GoalProgress {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalProgress::None => "none",
            GoalProgress::Partial => "partial",
            GoalProgress::Satisfied => "satisfied",
        }
    }
}

impl std::fmt::Display for GoalProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A requested tool invocation carried by a [`PlanAction::CallTool`] plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallRequest {
    pub name: String,
    #[serde(default)]
    pub params: Map<String, Value>,
}

impl ToolCallRequest {
    pub fn new(name: impl Into<String>, params: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }
}

/// One iteration's structured decision (Entity).
///
/// Invariant: `action = CallTool` implies `tool_call` is present with a
/// non-empty name. [`parser::parse_plan`] enforces this; constructing a
/// violating Plan by hand is possible but the loop treats it as a parse
/// failure upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default)]
    pub observation: String,
    #[serde(default)]
    pub reasoning: String,
    pub action: PlanAction,
    #[serde(default, alias = "toolCall")]
    pub tool_call: Option<ToolCallRequest>,
    #[serde(default, alias = "goalProgress")]
    pub goal_progress: GoalProgress,
}

impl Plan {
    /// Deterministic substitute plan used whenever model output cannot be
    /// decoded: move straight to synthesis over whatever evidence exists.
    pub fn fallback() -> Self {
        Self {
            observation: "The model response could not be decoded as a plan.".to_string(),
            reasoning: "Proceeding to synthesis over the evidence gathered so far.".to_string(),
            action: PlanAction::SynthesizeAndDeliver,
            tool_call: None,
            goal_progress: GoalProgress::Partial,
        }
    }

    /// Whether this plan ends the iteration loop.
    pub fn is_terminal(&self) -> bool {
        self.action == PlanAction::SynthesizeAndDeliver
            || self.goal_progress == GoalProgress::Satisfied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_plan_shape() {
        let plan = Plan::fallback();
        assert_eq!(plan.action, PlanAction::SynthesizeAndDeliver);
        assert_eq!(plan.goal_progress, GoalProgress::Partial);
        assert!(plan.tool_call.is_none());
        assert!(plan.is_terminal());
    }

    #[test]
    fn test_is_terminal_on_satisfied() {
        let plan = Plan {
            observation: String::new(),
            reasoning: String::new(),
            action: PlanAction::CallTool,
            tool_call: Some(ToolCallRequest::new("query_deals", Map::new())),
            goal_progress: GoalProgress::Satisfied,
        };
        assert!(plan.is_terminal());
    }

    #[test]
    fn test_action_accepts_camel_case_alias() {
        let action: PlanAction = serde_json::from_str(r#""synthesizeAndDeliver""#).unwrap();
        assert_eq!(action, PlanAction::SynthesizeAndDeliver);
        let action: PlanAction = serde_json::from_str(r#""call_tool""#).unwrap();
        assert_eq!(action, PlanAction::CallTool);
    }

    #[test]
    fn test_goal_progress_accepts_capitalized_alias() {
        let progress: GoalProgress = serde_json::from_str(r#""Satisfied""#).unwrap();
        assert_eq!(progress, GoalProgress::Satisfied);
        assert_eq!(GoalProgress::default(), GoalProgress::None);
    }
}
