//! In-memory run ledger.
//!
//! Backs tests and single-process deployments. Terminal run updates feed
//! the skill-output cache: when a run's step results include a freshly
//! `completed` skill, that output becomes probe-able by later runs until
//! its TTL window closes.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dealsense_application::ports::run_ledger::{LedgerError, RunLedger, RunUpdate};
use dealsense_domain::{RunId, RunKind, RunStatus, WorkspaceId};
use serde_json::Value;
use std::sync::Mutex;

/// One ledger row.
#[derive(Debug, Clone)]
pub struct RunRow {
    pub id: RunId,
    pub kind: RunKind,
    pub workspace_id: WorkspaceId,
    pub status: RunStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub duration_ms: u64,
    pub step_results: Option<Value>,
    pub synthesized_output: Option<String>,
    pub token_usage: Option<Value>,
    pub error: Option<String>,
    pub evidence: Option<Value>,
}

#[derive(Debug, Clone)]
struct SkillOutputRow {
    workspace_id: WorkspaceId,
    skill_id: String,
    output: Value,
    completed_at: DateTime<Utc>,
}

/// Mutex-guarded in-memory ledger.
#[derive(Default)]
pub struct InMemoryRunLedger {
    runs: Mutex<Vec<RunRow>>,
    skill_outputs: Mutex<Vec<SkillOutputRow>>,
}

impl InMemoryRunLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all rows, oldest first.
    pub fn runs(&self) -> Vec<RunRow> {
        self.runs.lock().expect("ledger lock").clone()
    }

    /// Seed a cached skill output directly (as if an earlier run completed
    /// the skill `age_minutes` ago).
    pub fn seed_skill_output(
        &self,
        workspace_id: &WorkspaceId,
        skill_id: &str,
        output: Value,
        age_minutes: i64,
    ) {
        self.skill_outputs
            .lock()
            .expect("ledger lock")
            .push(SkillOutputRow {
                workspace_id: workspace_id.clone(),
                skill_id: skill_id.to_string(),
                output,
                completed_at: Utc::now() - Duration::minutes(age_minutes),
            });
    }

    /// Index freshly completed skill outputs from a terminal update's step
    /// results. Cached steps are not re-indexed: reuse must not extend a
    /// stale output's TTL window.
    fn index_step_outputs(&self, workspace_id: &WorkspaceId, step_results: &Value) {
        let Some(steps) = step_results.as_array() else {
            return;
        };
        let mut outputs = self.skill_outputs.lock().expect("ledger lock");
        for step in steps {
            let completed = step.get("status").and_then(Value::as_str) == Some("completed");
            let Some(skill_id) = step.get("skill_id").and_then(Value::as_str) else {
                continue;
            };
            let Some(output) = step.get("output") else {
                continue;
            };
            if completed && !output.is_null() {
                outputs.push(SkillOutputRow {
                    workspace_id: workspace_id.clone(),
                    skill_id: skill_id.to_string(),
                    output: output.clone(),
                    completed_at: Utc::now(),
                });
            }
        }
    }
}

#[async_trait]
impl RunLedger for InMemoryRunLedger {
    async fn insert_run(
        &self,
        id: RunId,
        kind: RunKind,
        workspace_id: &WorkspaceId,
        status: RunStatus,
    ) -> Result<(), LedgerError> {
        self.runs.lock().expect("ledger lock").push(RunRow {
            id,
            kind,
            workspace_id: workspace_id.clone(),
            status,
            started_at: Utc::now(),
            finished_at: None,
            duration_ms: 0,
            step_results: None,
            synthesized_output: None,
            token_usage: None,
            error: None,
            evidence: None,
        });
        Ok(())
    }

    async fn update_run(&self, id: RunId, update: RunUpdate) -> Result<(), LedgerError> {
        let workspace_id = {
            let mut runs = self.runs.lock().expect("ledger lock");
            let row = runs
                .iter_mut()
                .find(|row| row.id == id)
                .ok_or_else(|| LedgerError::Storage(format!("unknown run {}", id)))?;
            row.status = update.status;
            row.finished_at = Some(Utc::now());
            row.duration_ms = update.duration_ms;
            row.step_results = update.step_results.clone();
            row.synthesized_output = update.synthesized_output;
            row.token_usage = update.token_usage;
            row.error = update.error;
            row.evidence = update.evidence;
            row.workspace_id.clone()
        };

        if let Some(step_results) = &update.step_results {
            self.index_step_outputs(&workspace_id, step_results);
        }
        Ok(())
    }

    async fn find_recent_completed_skill_output(
        &self,
        workspace_id: &WorkspaceId,
        skill_id: &str,
        within_minutes: u64,
    ) -> Result<Option<Value>, LedgerError> {
        let cutoff = Utc::now() - Duration::minutes(within_minutes as i64);
        let outputs = self.skill_outputs.lock().expect("ledger lock");
        Ok(outputs
            .iter()
            .filter(|row| {
                row.workspace_id == *workspace_id
                    && row.skill_id == skill_id
                    && row.completed_at >= cutoff
            })
            .max_by_key(|row| row.completed_at)
            .map(|row| row.output.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ws() -> WorkspaceId {
        WorkspaceId::new("ws-1")
    }

    #[tokio::test]
    async fn test_insert_then_update() {
        let ledger = InMemoryRunLedger::new();
        let id = RunId::new();
        ledger
            .insert_run(id, RunKind::Agent, &ws(), RunStatus::Running)
            .await
            .unwrap();

        ledger
            .update_run(
                id,
                RunUpdate::new(RunStatus::Completed, 1500).with_synthesized_output("report"),
            )
            .await
            .unwrap();

        let rows = ledger.runs();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, RunStatus::Completed);
        assert_eq!(rows[0].duration_ms, 1500);
        assert_eq!(rows[0].synthesized_output.as_deref(), Some("report"));
        assert!(rows[0].finished_at.is_some());
    }

    #[tokio::test]
    async fn test_update_unknown_run_is_storage_error() {
        let ledger = InMemoryRunLedger::new();
        let result = ledger
            .update_run(RunId::new(), RunUpdate::new(RunStatus::Failed, 0))
            .await;
        assert!(matches!(result, Err(LedgerError::Storage(_))));
    }

    #[tokio::test]
    async fn test_probe_respects_ttl_window() {
        let ledger = InMemoryRunLedger::new();
        ledger.seed_skill_output(&ws(), "pipeline_health", json!({"score": 0.9}), 10);

        let hit = ledger
            .find_recent_completed_skill_output(&ws(), "pipeline_health", 30)
            .await
            .unwrap();
        assert_eq!(hit, Some(json!({"score": 0.9})));

        let miss = ledger
            .find_recent_completed_skill_output(&ws(), "pipeline_health", 5)
            .await
            .unwrap();
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn test_probe_is_workspace_scoped() {
        let ledger = InMemoryRunLedger::new();
        ledger.seed_skill_output(&ws(), "pipeline_health", json!({"score": 0.9}), 1);

        let other = ledger
            .find_recent_completed_skill_output(
                &WorkspaceId::new("ws-2"),
                "pipeline_health",
                30,
            )
            .await
            .unwrap();
        assert!(other.is_none());
    }

    #[tokio::test]
    async fn test_probe_prefers_most_recent_output() {
        let ledger = InMemoryRunLedger::new();
        ledger.seed_skill_output(&ws(), "pipeline_health", json!({"score": 0.5}), 20);
        ledger.seed_skill_output(&ws(), "pipeline_health", json!({"score": 0.9}), 2);

        let hit = ledger
            .find_recent_completed_skill_output(&ws(), "pipeline_health", 30)
            .await
            .unwrap();
        assert_eq!(hit, Some(json!({"score": 0.9})));
    }

    #[tokio::test]
    async fn test_terminal_update_indexes_completed_outputs() {
        let ledger = InMemoryRunLedger::new();
        let id = RunId::new();
        ledger
            .insert_run(id, RunKind::Agent, &ws(), RunStatus::Running)
            .await
            .unwrap();

        ledger
            .update_run(
                id,
                RunUpdate::new(RunStatus::Completed, 100).with_step_results(json!([
                    {"skill_id": "pipeline_health", "status": "completed", "output": {"score": 0.9}},
                    {"skill_id": "deal_risk", "status": "failed", "output": null},
                    {"skill_id": "stale_skill", "status": "cached", "output": {"old": true}},
                ])),
            )
            .await
            .unwrap();

        let hit = ledger
            .find_recent_completed_skill_output(&ws(), "pipeline_health", 30)
            .await
            .unwrap();
        assert_eq!(hit, Some(json!({"score": 0.9})));

        // Failed steps contribute nothing
        assert!(ledger
            .find_recent_completed_skill_output(&ws(), "deal_risk", 30)
            .await
            .unwrap()
            .is_none());

        // Cache reuse must not refresh a stale output's TTL
        assert!(ledger
            .find_recent_completed_skill_output(&ws(), "stale_skill", 30)
            .await
            .unwrap()
            .is_none());
    }
}
