//! Run Ledger port
//!
//! Append-only record of every orchestration run's lifecycle, plus the
//! read path the pipeline's cache probe uses. The ledger is externally
//! owned; both cores treat writes as best-effort and never fail a run
//! over a ledger error.

use async_trait::async_trait;
use dealsense_domain::{RunId, RunKind, RunStatus, WorkspaceId};
use serde_json::Value;
use thiserror::Error;

/// Errors from the underlying ledger store
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Ledger storage error: {0}")]
    Storage(String),
}

/// Terminal update written when a run finishes.
///
/// Everything beyond the status is optional so the loop and the pipeline
/// can share one row shape: the loop fills `evidence`, the pipeline fills
/// `step_results` and `synthesized_output`.
#[derive(Debug, Clone)]
pub struct RunUpdate {
    pub status: RunStatus,
    pub duration_ms: u64,
    pub step_results: Option<Value>,
    pub synthesized_output: Option<String>,
    pub token_usage: Option<Value>,
    pub error: Option<String>,
    /// Evidence payload, already bounded by the caller.
    pub evidence: Option<Value>,
}

impl RunUpdate {
    pub fn new(status: RunStatus, duration_ms: u64) -> Self {
        Self {
            status,
            duration_ms,
            step_results: None,
            synthesized_output: None,
            token_usage: None,
            error: None,
            evidence: None,
        }
    }

    pub fn with_step_results(mut self, step_results: Value) -> Self {
        self.step_results = Some(step_results);
        self
    }

    pub fn with_synthesized_output(mut self, output: impl Into<String>) -> Self {
        self.synthesized_output = Some(output.into());
        self
    }

    pub fn with_token_usage(mut self, usage: Value) -> Self {
        self.token_usage = Some(usage);
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_evidence(mut self, evidence: Value) -> Self {
        self.evidence = Some(evidence);
        self
    }
}

/// Port for the run ledger
///
/// Write path is used by both cores; the read path only by the pipeline's
/// cache probe. Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait RunLedger: Send + Sync {
    /// Record that a run has started.
    async fn insert_run(
        &self,
        id: RunId,
        kind: RunKind,
        workspace_id: &WorkspaceId,
        status: RunStatus,
    ) -> Result<(), LedgerError>;

    /// Record a run's terminal state.
    async fn update_run(&self, id: RunId, update: RunUpdate) -> Result<(), LedgerError>;

    /// Cache probe: the output of the most recent `completed` execution of
    /// a skill in this workspace within the TTL window, if any.
    async fn find_recent_completed_skill_output(
        &self,
        workspace_id: &WorkspaceId,
        skill_id: &str,
        within_minutes: u64,
    ) -> Result<Option<Value>, LedgerError>;
}

/// No-op ledger for tests and callers that do not persist runs.
pub struct NoRunLedger;

#[async_trait]
impl RunLedger for NoRunLedger {
    async fn insert_run(
        &self,
        _id: RunId,
        _kind: RunKind,
        _workspace_id: &WorkspaceId,
        _status: RunStatus,
    ) -> Result<(), LedgerError> {
        Ok(())
    }

    async fn update_run(&self, _id: RunId, _update: RunUpdate) -> Result<(), LedgerError> {
        Ok(())
    }

    async fn find_recent_completed_skill_output(
        &self,
        _workspace_id: &WorkspaceId,
        _skill_id: &str,
        _within_minutes: u64,
    ) -> Result<Option<Value>, LedgerError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_no_ledger_is_always_a_cache_miss() {
        let ledger = NoRunLedger;
        let output = ledger
            .find_recent_completed_skill_output(&WorkspaceId::new("ws"), "pipeline_health", 30)
            .await
            .unwrap();
        assert!(output.is_none());
    }

    #[test]
    fn test_update_builder() {
        let update = RunUpdate::new(RunStatus::Partial, 1200)
            .with_synthesized_output("report")
            .with_error("step 'deal_risk' failed")
            .with_evidence(json!({"tool_calls": []}));

        assert_eq!(update.status, RunStatus::Partial);
        assert_eq!(update.synthesized_output.as_deref(), Some("report"));
        assert!(update.error.is_some());
        assert!(update.evidence.is_some());
        assert!(update.step_results.is_none());
    }
}
