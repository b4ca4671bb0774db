//! Run Pipeline use case
//!
//! Executes an agent definition's ordered skill steps, then synthesizes a
//! report over the step outputs and hands it to delivery. Steps run
//! strictly in order; sequential execution trades throughput for
//! deterministic cache and evidence ordering.
//!
//! | Step outcome          | Effect on the run                           |
//! |-----------------------|---------------------------------------------|
//! | Cache hit             | output reused, no invocation, zero cost     |
//! | Optional step fails   | recorded, run continues, status → partial   |
//! | Required step fails   | run aborts immediately, status → failed     |
//! | Timeout               | treated exactly like an execution failure   |
//! | Delivery fails        | logged, never changes the run's status      |

use crate::ports::delivery::DeliveryDispatcher;
use crate::ports::llm_gateway::{GatewayError, GenerateOptions, LlmGateway, Tracking};
use crate::ports::progress::{NoRunProgress, RunProgressNotifier};
use crate::ports::run_ledger::{RunLedger, RunUpdate};
use crate::ports::tool_invoker::{ToolError, ToolInvoker};
use crate::use_cases::shared::is_cancelled;
use dealsense_domain::core::budget::{LEDGER_ARRAY_MAX_ITEMS, LEDGER_PAYLOAD_MAX_BYTES};
use dealsense_domain::{
    AgentDefinition, AgentRunResult, DomainError, Message, RunId, RunKind, RunStatus,
    RunTokenUsage, SkillResult, SkillStep, SynthesisPrompt, WorkspaceId, bound_json,
};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that can occur during a pipeline run
#[derive(Error, Debug)]
pub enum RunPipelineError {
    #[error(transparent)]
    InvalidDefinition(#[from] DomainError),

    #[error("Required step '{skill_id}' failed: {reason}")]
    RequiredStepFailed { skill_id: String, reason: String },

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Operation cancelled")]
    Cancelled,
}

impl RunPipelineError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunPipelineError::Cancelled)
    }
}

/// Input for a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineInput {
    pub definition: AgentDefinition,
    pub workspace_id: WorkspaceId,
    /// Dry runs execute and synthesize but skip delivery.
    pub dry_run: bool,
}

impl PipelineInput {
    pub fn new(definition: AgentDefinition, workspace_id: WorkspaceId) -> Self {
        Self {
            definition,
            workspace_id,
            dry_run: false,
        }
    }

    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }
}

/// What one skill invocation yielded, unpacked from the invoker's payload.
struct SkillPayload {
    output: Value,
    tokens: u64,
    evidence: Option<Value>,
}

/// Skills report their narrative output alongside token usage and evidence.
/// The wire shape is `{"output": ..., "token_usage": n, "evidence": ...}`;
/// anything else is taken as the output itself.
fn unpack_skill_payload(value: Value) -> SkillPayload {
    match value {
        Value::Object(mut map) if map.contains_key("output") => {
            let output = map.remove("output").unwrap_or(Value::Null);
            let tokens = map
                .get("token_usage")
                .and_then(Value::as_u64)
                .unwrap_or(0);
            let evidence = map.remove("evidence");
            SkillPayload {
                output,
                tokens,
                evidence,
            }
        }
        other => SkillPayload {
            output: other,
            tokens: 0,
            evidence: None,
        },
    }
}

/// Use case for executing a scheduled or triggered agent pipeline
pub struct RunPipelineUseCase<G: LlmGateway + 'static, T: ToolInvoker + 'static> {
    gateway: Arc<G>,
    invoker: Arc<T>,
    ledger: Arc<dyn RunLedger>,
    delivery: Arc<dyn DeliveryDispatcher>,
    cancellation_token: Option<CancellationToken>,
}

impl<G: LlmGateway + 'static, T: ToolInvoker + 'static> RunPipelineUseCase<G, T> {
    pub fn new(
        gateway: Arc<G>,
        invoker: Arc<T>,
        ledger: Arc<dyn RunLedger>,
        delivery: Arc<dyn DeliveryDispatcher>,
    ) -> Self {
        Self {
            gateway,
            invoker,
            ledger,
            delivery,
            cancellation_token: None,
        }
    }

    /// Set a cancellation token for graceful interruption
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Execute the pipeline without progress reporting
    pub async fn execute(&self, input: PipelineInput) -> Result<AgentRunResult, RunPipelineError> {
        self.execute_with_progress(input, &NoRunProgress).await
    }

    /// Execute the pipeline with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: PipelineInput,
        progress: &dyn RunProgressNotifier,
    ) -> Result<AgentRunResult, RunPipelineError> {
        input.definition.validate()?;

        let run_id = RunId::new();
        let started = Instant::now();
        info!(
            %run_id,
            agent = %input.definition.agent_id,
            steps = input.definition.steps.len(),
            "Starting pipeline run"
        );

        if let Err(e) = self
            .ledger
            .insert_run(run_id, RunKind::Agent, &input.workspace_id, RunStatus::Running)
            .await
        {
            warn!(%run_id, "Could not record run start: {}", e);
        }

        // ==================== Step execution ====================
        let mut skill_results: Vec<SkillResult> = Vec::new();
        let mut skills_tokens: u64 = 0;

        for step in &input.definition.steps {
            if is_cancelled(&self.cancellation_token) {
                self.record_abort(run_id, started, &skill_results, "cancelled").await;
                return Err(RunPipelineError::Cancelled);
            }
            progress.on_step_start(&step.skill_id);

            let result = self.execute_step(run_id, &input.workspace_id, step).await;
            progress.on_step_complete(&result);

            if result.is_failed() && step.required {
                let reason = result
                    .error
                    .clone()
                    .unwrap_or_else(|| "unknown failure".to_string());
                skill_results.push(result);
                self.record_abort(run_id, started, &skill_results, &reason).await;
                return Err(RunPipelineError::RequiredStepFailed {
                    skill_id: step.skill_id.clone(),
                    reason,
                });
            }

            if result.is_failed() {
                warn!(
                    %run_id,
                    skill = %step.skill_id,
                    "Optional step failed, continuing: {}",
                    result.error.as_deref().unwrap_or("unknown failure")
                );
            }

            skills_tokens += result.token_usage;
            skill_results.push(result);
        }

        // ==================== Synthesis ====================
        let outputs: Vec<(String, String)> = input
            .definition
            .steps
            .iter()
            .zip(&skill_results)
            .filter_map(|(step, result)| {
                result.output.as_ref().map(|output| {
                    (
                        step.output_key.clone(),
                        serde_json::to_string(output).unwrap_or_default(),
                    )
                })
            })
            .collect();

        let mut synthesis_usage = 0u64;
        let synthesized_output = if input.definition.synthesis.enabled && !outputs.is_empty() {
            let synthesis = &input.definition.synthesis;
            let user_prompt =
                SynthesisPrompt::render_pipeline_template(&synthesis.user_prompt_template, &outputs);
            let generation = self
                .gateway
                .generate(
                    synthesis.capability,
                    &synthesis.system_prompt,
                    &[Message::user(user_prompt)],
                    GenerateOptions::default().with_max_tokens(synthesis.max_tokens),
                    Tracking::new(run_id, input.workspace_id.clone(), "synthesis"),
                )
                .await?;
            synthesis_usage = generation.usage.total();
            Some(generation.content)
        } else {
            debug!(%run_id, "Synthesis skipped");
            None
        };

        // ==================== Delivery ====================
        let skill_evidence: Vec<&Value> = skill_results
            .iter()
            .filter_map(|r| r.evidence.as_ref())
            .collect();

        if input.dry_run {
            debug!(%run_id, "Dry run, skipping delivery");
        } else {
            progress.on_delivery(input.definition.delivery.channel.as_str());
            let evidence = if skill_evidence.is_empty() {
                None
            } else {
                Some(json!(skill_evidence))
            };
            // Delivery happens even without a synthesized report; the
            // dispatcher still receives the accumulated skill evidence.
            if let Err(e) = self
                .delivery
                .deliver(
                    &input.definition.delivery,
                    synthesized_output.as_deref(),
                    evidence.as_ref(),
                )
                .await
            {
                // Best-effort: a failed delivery never fails the run.
                warn!(%run_id, "Delivery failed: {}", e);
            }
        }

        // ==================== Final record ====================
        let any_failed = skill_results.iter().any(SkillResult::is_failed);
        let status = if any_failed {
            RunStatus::Partial
        } else {
            RunStatus::Completed
        };
        let token_usage = RunTokenUsage::new(skills_tokens, synthesis_usage);
        let duration_ms = started.elapsed().as_millis() as u64;

        let mut update = RunUpdate::new(status, duration_ms)
            .with_step_results(bounded_step_results(&skill_results))
            .with_token_usage(json!({
                "skills": token_usage.skills,
                "synthesis": token_usage.synthesis,
                "total": token_usage.total,
            }));
        if let Some(output) = &synthesized_output {
            update = update.with_synthesized_output(output.clone());
        }
        if let Err(e) = self.ledger.update_run(run_id, update).await {
            warn!(%run_id, "Could not record run completion: {}", e);
        }

        info!(%run_id, %status, duration_ms, "Pipeline run finished");

        Ok(AgentRunResult {
            run_id,
            agent_id: input.definition.agent_id.clone(),
            status,
            skill_results,
            synthesized_output,
            token_usage,
        })
    }

    /// Run one step: cache probe first, then a timed invocation.
    async fn execute_step(
        &self,
        run_id: RunId,
        workspace_id: &WorkspaceId,
        step: &SkillStep,
    ) -> SkillResult {
        // Cache probe. A probe error degrades to a miss.
        match self
            .ledger
            .find_recent_completed_skill_output(workspace_id, &step.skill_id, step.cache_ttl_minutes)
            .await
        {
            Ok(Some(output)) => {
                debug!(%run_id, skill = %step.skill_id, "Cache hit");
                return SkillResult::cached(&step.skill_id, output);
            }
            Ok(None) => {}
            Err(e) => {
                warn!(%run_id, skill = %step.skill_id, "Cache probe failed, executing: {}", e);
            }
        }

        let step_started = Instant::now();
        let timeout = Duration::from_secs(step.timeout_seconds);
        let invocation = self.invoker.invoke(&step.skill_id, &step.params);

        let outcome: Result<Result<Value, ToolError>, tokio::time::error::Elapsed> =
            tokio::time::timeout(timeout, invocation).await;
        let duration_ms = step_started.elapsed().as_millis() as u64;

        match outcome {
            Ok(Ok(payload)) => {
                let payload = unpack_skill_payload(payload);
                SkillResult::completed(
                    &step.skill_id,
                    payload.output,
                    payload.tokens,
                    duration_ms,
                    payload.evidence,
                )
            }
            Ok(Err(e)) => SkillResult::failed(&step.skill_id, e.to_string(), duration_ms),
            Err(_) => SkillResult::failed(
                &step.skill_id,
                format!(
                    "skill '{}' timed out after {}s",
                    step.skill_id, step.timeout_seconds
                ),
                duration_ms,
            ),
        }
    }

    /// Best-effort failure record for the early-abort path.
    async fn record_abort(
        &self,
        run_id: RunId,
        started: Instant,
        skill_results: &[SkillResult],
        reason: &str,
    ) {
        let update = RunUpdate::new(RunStatus::Failed, started.elapsed().as_millis() as u64)
            .with_step_results(bounded_step_results(skill_results))
            .with_error(reason.to_string());
        if let Err(e) = self.ledger.update_run(run_id, update).await {
            warn!(%run_id, "Could not record run failure: {}", e);
        }
    }
}

/// Serialize step results for the ledger row. Payloads over the size
/// ceiling get their embedded record lists capped; smaller payloads are
/// stored verbatim.
fn bounded_step_results(skill_results: &[SkillResult]) -> Value {
    let Ok(value) = serde_json::to_value(skill_results) else {
        return Value::Null;
    };
    let serialized_bytes = value.to_string().len();
    if serialized_bytes > LEDGER_PAYLOAD_MAX_BYTES {
        bound_json(&value, LEDGER_ARRAY_MAX_ITEMS)
    } else {
        value
    }
}
