//! Run result records.
//!
//! Everything here is created within one run and immutable once recorded;
//! nothing outlives the run except the ledger row built from it.

use crate::evidence::citations::CitedRecord;
use crate::run::ids::RunId;
use crate::run::status::{RunStatus, StepStatus};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One executed tool call in a reasoning-loop transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallRecord {
    pub tool: String,
    pub params: Map<String, Value>,
    pub result: Option<Value>,
    pub error: Option<String>,
    /// Why the model made this call, taken from its plan.
    pub description: String,
}

impl ToolCallRecord {
    pub fn success(
        tool: impl Into<String>,
        params: Map<String, Value>,
        result: Value,
        description: impl Into<String>,
    ) -> Self {
        Self {
            tool: tool.into(),
            params,
            result: Some(result),
            error: None,
            description: description.into(),
        }
    }

    pub fn failure(
        tool: impl Into<String>,
        params: Map<String, Value>,
        error: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            tool: tool.into(),
            params,
            result: None,
            error: Some(error.into()),
            description: description.into(),
        }
    }
}

/// One planning iteration in the reasoning chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasoningStep {
    /// 1-based iteration number.
    pub step: usize,
    pub observation: String,
    pub action: String,
    /// The model's goal-progress self-assessment.
    pub evaluation: String,
}

/// Aggregate evidence trail of one reasoning-loop run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoopEvidence {
    pub tool_calls: Vec<ToolCallRecord>,
    /// Skill evidence is never consumed by the ad-hoc loop (skills are not
    /// executable from it); the field is kept so loop and pipeline ledger
    /// rows share one evidence shape.
    pub skill_evidence_used: Vec<Value>,
    pub iterations: usize,
    pub reasoning_chain: Vec<ReasoningStep>,
    pub cited_records: Vec<CitedRecord>,
}

/// Outcome of one pipeline step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillResult {
    pub skill_id: String,
    pub status: StepStatus,
    pub output: Option<Value>,
    pub error: Option<String>,
    /// Total tokens the skill reported consuming. Zero for cached steps.
    pub token_usage: u64,
    pub duration_ms: u64,
    pub cached: bool,
    pub evidence: Option<Value>,
}

impl SkillResult {
    pub fn completed(
        skill_id: impl Into<String>,
        output: Value,
        token_usage: u64,
        duration_ms: u64,
        evidence: Option<Value>,
    ) -> Self {
        Self {
            skill_id: skill_id.into(),
            status: StepStatus::Completed,
            output: Some(output),
            error: None,
            token_usage,
            duration_ms,
            cached: false,
            evidence,
        }
    }

    /// A step served from the ledger cache. Costs nothing: no invocation,
    /// no tokens, zero duration.
    pub fn cached(skill_id: impl Into<String>, output: Value) -> Self {
        Self {
            skill_id: skill_id.into(),
            status: StepStatus::Cached,
            output: Some(output),
            error: None,
            token_usage: 0,
            duration_ms: 0,
            cached: true,
            evidence: None,
        }
    }

    pub fn failed(skill_id: impl Into<String>, error: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            skill_id: skill_id.into(),
            status: StepStatus::Failed,
            output: None,
            error: Some(error.into()),
            token_usage: 0,
            duration_ms,
            cached: false,
            evidence: None,
        }
    }

    pub fn is_failed(&self) -> bool {
        self.status == StepStatus::Failed
    }
}

/// Token accounting for one pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTokenUsage {
    pub skills: u64,
    pub synthesis: u64,
    pub total: u64,
}

impl RunTokenUsage {
    pub fn new(skills: u64, synthesis: u64) -> Self {
        Self {
            skills,
            synthesis,
            total: skills + synthesis,
        }
    }
}

/// Final result of one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRunResult {
    pub run_id: RunId,
    pub agent_id: String,
    pub status: RunStatus,
    pub skill_results: Vec<SkillResult>,
    pub synthesized_output: Option<String>,
    pub token_usage: RunTokenUsage,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cached_result_costs_nothing() {
        let result = SkillResult::cached("pipeline_health", json!({"score": 0.9}));
        assert_eq!(result.status, StepStatus::Cached);
        assert!(result.cached);
        assert_eq!(result.duration_ms, 0);
        assert_eq!(result.token_usage, 0);
    }

    #[test]
    fn test_failed_result_carries_error() {
        let result = SkillResult::failed("deal_risk", "skill 'deal_risk' timed out after 1s", 1000);
        assert!(result.is_failed());
        assert!(result.output.is_none());
        assert!(result.error.as_deref().unwrap().contains("timed out"));
    }

    #[test]
    fn test_run_token_usage_totals() {
        let usage = RunTokenUsage::new(1200, 300);
        assert_eq!(usage.total, 1500);
    }

    #[test]
    fn test_tool_call_record_constructors() {
        let ok = ToolCallRecord::success("query_deals", Map::new(), json!({"deals": []}), "look up deals");
        assert!(ok.result.is_some());
        assert!(ok.error.is_none());

        let bad = ToolCallRecord::failure("query_deals", Map::new(), "boom", "look up deals");
        assert!(bad.result.is_none());
        assert_eq!(bad.error.as_deref(), Some("boom"));
    }
}
