//! JSONL file ledger.
//!
//! Each run lifecycle event becomes a single JSON line with a `type` field
//! and UTC timestamp, appended via a buffered writer. Append-only by
//! design: the file carries the audit trail, so the cache probe always
//! misses here. Pair it with [`InMemoryRunLedger`](super::memory::InMemoryRunLedger)
//! or a relational adapter when caching matters.

use async_trait::async_trait;
use dealsense_application::ports::run_ledger::{LedgerError, RunLedger, RunUpdate};
use dealsense_domain::{RunId, RunKind, RunStatus, WorkspaceId};
use serde_json::{Value, json};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Run ledger that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes after every record
/// and on `Drop`.
pub struct JsonlRunLedger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlRunLedger {
    /// Open (or create) a ledger file at the given path, appending to any
    /// existing content. Creates parent directories as needed. Returns
    /// `None` if the file cannot be opened.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!("Could not create ledger directory {}: {}", parent.display(), e);
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open ledger file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the ledger file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, record: Value) -> Result<(), LedgerError> {
        let line = serde_json::to_string(&record)
            .map_err(|e| LedgerError::Storage(e.to_string()))?;
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| LedgerError::Storage("ledger writer poisoned".to_string()))?;
        writeln!(writer, "{}", line).map_err(|e| LedgerError::Storage(e.to_string()))?;
        // Flush per record for crash safety; the file is append-only
        writer.flush().map_err(|e| LedgerError::Storage(e.to_string()))
    }

    fn timestamp() -> String {
        chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
    }
}

#[async_trait]
impl RunLedger for JsonlRunLedger {
    async fn insert_run(
        &self,
        id: RunId,
        kind: RunKind,
        workspace_id: &WorkspaceId,
        status: RunStatus,
    ) -> Result<(), LedgerError> {
        self.append(json!({
            "type": "run_started",
            "timestamp": Self::timestamp(),
            "run_id": id,
            "kind": kind,
            "workspace_id": workspace_id,
            "status": status,
        }))
    }

    async fn update_run(&self, id: RunId, update: RunUpdate) -> Result<(), LedgerError> {
        self.append(json!({
            "type": "run_finished",
            "timestamp": Self::timestamp(),
            "run_id": id,
            "status": update.status,
            "duration_ms": update.duration_ms,
            "step_results": update.step_results,
            "synthesized_output": update.synthesized_output,
            "token_usage": update.token_usage,
            "error": update.error,
            "evidence": update.evidence,
        }))
    }

    async fn find_recent_completed_skill_output(
        &self,
        _workspace_id: &WorkspaceId,
        _skill_id: &str,
        _within_minutes: u64,
    ) -> Result<Option<Value>, LedgerError> {
        // Append-only file, no index to probe
        Ok(None)
    }
}

impl Drop for JsonlRunLedger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[tokio::test]
    async fn test_writes_lifecycle_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs.jsonl");
        let ledger = JsonlRunLedger::new(&path).unwrap();

        let id = RunId::new();
        ledger
            .insert_run(id, RunKind::Agent, &WorkspaceId::new("ws-1"), RunStatus::Running)
            .await
            .unwrap();
        ledger
            .update_run(
                id,
                RunUpdate::new(RunStatus::Partial, 2200)
                    .with_error("step 'deal_risk' failed")
                    .with_synthesized_output("report"),
            )
            .await
            .unwrap();
        drop(ledger);

        let mut content = String::new();
        File::open(&path)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        let lines: Vec<&str> = content.trim().lines().collect();
        assert_eq!(lines.len(), 2);

        let started: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(started["type"], "run_started");
        assert_eq!(started["kind"], "agent");
        assert_eq!(started["workspace_id"], "ws-1");
        assert_eq!(started["run_id"], json!(id));
        assert!(started["timestamp"].is_string());

        let finished: Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(finished["type"], "run_finished");
        assert_eq!(finished["status"], "partial");
        assert_eq!(finished["duration_ms"], 2200);
        assert_eq!(finished["synthesized_output"], "report");
    }

    #[tokio::test]
    async fn test_appends_across_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs.jsonl");

        for _ in 0..2 {
            let ledger = JsonlRunLedger::new(&path).unwrap();
            ledger
                .insert_run(
                    RunId::new(),
                    RunKind::Question,
                    &WorkspaceId::new("ws-1"),
                    RunStatus::Running,
                )
                .await
                .unwrap();
        }

        let mut content = String::new();
        File::open(&path)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content.trim().lines().count(), 2);
    }

    #[tokio::test]
    async fn test_probe_always_misses() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = JsonlRunLedger::new(dir.path().join("runs.jsonl")).unwrap();
        let output = ledger
            .find_recent_completed_skill_output(&WorkspaceId::new("ws-1"), "pipeline_health", 30)
            .await
            .unwrap();
        assert!(output.is_none());
    }
}
