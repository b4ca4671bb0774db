//! Answer Question use case
//!
//! The reasoning loop: a bounded number of plan → act → observe iterations
//! against the LLM gateway and tool invoker, with the evidence accumulator
//! as working memory, followed by a synthesis pass over everything gathered.
//!
//! | Failure                  | Handling                                    |
//! |--------------------------|---------------------------------------------|
//! | Unparseable plan         | substitute fallback plan, keep going        |
//! | Tool call fails          | sentinel evidence + failed record, keep going |
//! | Duplicate tool call      | redirect message, costs an iteration only   |
//! | Gateway transport fails  | propagate to the caller                     |

use crate::config::LoopParams;
use crate::ports::llm_gateway::{GatewayError, GenerateOptions, LlmGateway, Tracking};
use crate::ports::progress::{NoRunProgress, RunProgressNotifier};
use crate::ports::run_ledger::{NoRunLedger, RunLedger, RunUpdate};
use crate::ports::tool_invoker::ToolInvoker;
use crate::use_cases::shared::is_cancelled;
use dealsense_domain::core::budget::LEDGER_ARRAY_MAX_ITEMS;
use dealsense_domain::{
    Capability, EvidenceAccumulator, LoopEvidence, Message, Plan, PlanAction, ReasoningPrompt,
    ReasoningStep, RunId, RunKind, RunStatus, SynthesisPrompt, TokenUsage, ToolCallRecord, ToolKey,
    WorkspaceId, bound_json, derive_cited_records, parse_plan,
};
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that can occur while answering a question
#[derive(Error, Debug)]
pub enum AnswerQuestionError {
    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Operation cancelled")]
    Cancelled,
}

impl AnswerQuestionError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AnswerQuestionError::Cancelled)
    }
}

/// Input for the reasoning loop.
#[derive(Debug, Clone)]
pub struct QuestionInput {
    pub question: String,
    /// Names of the tools the loop may call.
    pub tools: Vec<String>,
    /// Earlier conversation to seed the transcript with.
    pub prior_context: Option<String>,
    pub workspace_id: WorkspaceId,
}

impl QuestionInput {
    pub fn new(question: impl Into<String>, tools: Vec<String>) -> Self {
        Self {
            question: question.into(),
            tools,
            prior_context: None,
            workspace_id: WorkspaceId::new("default"),
        }
    }

    pub fn with_prior_context(mut self, context: impl Into<String>) -> Self {
        self.prior_context = Some(context.into());
        self
    }

    pub fn with_workspace(mut self, workspace_id: WorkspaceId) -> Self {
        self.workspace_id = workspace_id;
        self
    }
}

/// Output of the reasoning loop: the synthesized answer plus its full
/// evidence trail.
#[derive(Debug, Clone)]
pub struct QuestionOutput {
    pub run_id: RunId,
    pub answer: String,
    pub evidence: LoopEvidence,
    pub tokens_used: u64,
    pub latency_ms: u64,
}

/// Use case for answering an ad-hoc question over CRM data
pub struct AnswerQuestionUseCase<G: LlmGateway + 'static, T: ToolInvoker + 'static> {
    gateway: Arc<G>,
    invoker: Arc<T>,
    ledger: Arc<dyn RunLedger>,
    params: LoopParams,
    cancellation_token: Option<CancellationToken>,
}

impl<G: LlmGateway + 'static, T: ToolInvoker + 'static> AnswerQuestionUseCase<G, T> {
    pub fn new(gateway: Arc<G>, invoker: Arc<T>) -> Self {
        Self {
            gateway,
            invoker,
            ledger: Arc::new(NoRunLedger),
            params: LoopParams::default(),
            cancellation_token: None,
        }
    }

    /// Set the run ledger runs are recorded to (best-effort).
    pub fn with_ledger(mut self, ledger: Arc<dyn RunLedger>) -> Self {
        self.ledger = ledger;
        self
    }

    pub fn with_params(mut self, params: LoopParams) -> Self {
        self.params = params;
        self
    }

    /// Set a cancellation token for graceful interruption
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Execute the loop without progress reporting
    pub async fn execute(&self, input: QuestionInput) -> Result<QuestionOutput, AnswerQuestionError> {
        self.execute_with_progress(input, &NoRunProgress).await
    }

    /// Execute the loop with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: QuestionInput,
        progress: &dyn RunProgressNotifier,
    ) -> Result<QuestionOutput, AnswerQuestionError> {
        if input.question.trim().is_empty() {
            return Err(AnswerQuestionError::InvalidQuestion(
                "question is empty".to_string(),
            ));
        }

        let run_id = RunId::new();
        let started = Instant::now();
        info!(%run_id, question = %input.question, "Starting reasoning loop");

        if let Err(e) = self
            .ledger
            .insert_run(run_id, RunKind::Question, &input.workspace_id, RunStatus::Running)
            .await
        {
            warn!(%run_id, "Could not record run start: {}", e);
        }

        let result = self.run_loop(run_id, &input, progress).await;

        let latency_ms = started.elapsed().as_millis() as u64;
        match result {
            Ok((answer, evidence, usage)) => {
                let evidence_json = serde_json::to_value(&evidence)
                    .map(|v| bound_json(&v, LEDGER_ARRAY_MAX_ITEMS))
                    .unwrap_or(serde_json::Value::Null);
                let update = RunUpdate::new(RunStatus::Completed, latency_ms)
                    .with_synthesized_output(answer.clone())
                    .with_token_usage(json!({
                        "input": usage.input,
                        "output": usage.output,
                        "total": usage.total(),
                    }))
                    .with_evidence(evidence_json);
                if let Err(e) = self.ledger.update_run(run_id, update).await {
                    warn!(%run_id, "Could not record run completion: {}", e);
                }

                info!(
                    %run_id,
                    iterations = evidence.iterations,
                    tool_calls = evidence.tool_calls.len(),
                    latency_ms,
                    "Reasoning loop finished"
                );

                Ok(QuestionOutput {
                    run_id,
                    answer,
                    evidence,
                    tokens_used: usage.total(),
                    latency_ms,
                })
            }
            Err(e) => {
                let update =
                    RunUpdate::new(RunStatus::Failed, latency_ms).with_error(e.to_string());
                if let Err(ledger_err) = self.ledger.update_run(run_id, update).await {
                    warn!(%run_id, "Could not record run failure: {}", ledger_err);
                }
                Err(e)
            }
        }
    }

    /// The iteration loop itself, then synthesis.
    async fn run_loop(
        &self,
        run_id: RunId,
        input: &QuestionInput,
        progress: &dyn RunProgressNotifier,
    ) -> Result<(String, LoopEvidence, TokenUsage), AnswerQuestionError> {
        let mut transcript = vec![Message::user(ReasoningPrompt::seed_question(
            &input.question,
            input.prior_context.as_deref(),
        ))];
        let mut evidence = EvidenceAccumulator::new();
        let mut called: HashSet<ToolKey> = HashSet::new();
        let mut tool_calls: Vec<ToolCallRecord> = Vec::new();
        let mut reasoning_chain: Vec<ReasoningStep> = Vec::new();
        let mut usage = TokenUsage::default();
        let mut iterations = 0;

        for iteration in 1..=self.params.max_iterations {
            if is_cancelled(&self.cancellation_token) {
                return Err(AnswerQuestionError::Cancelled);
            }
            progress.on_iteration_start(iteration, self.params.max_iterations);

            let system_prompt =
                ReasoningPrompt::system(&input.tools, &evidence.prompt_preview());
            let generation = self
                .gateway
                .generate(
                    Capability::Reason,
                    &system_prompt,
                    &transcript,
                    GenerateOptions::default(),
                    Tracking::new(run_id, input.workspace_id.clone(), "planning"),
                )
                .await?;
            usage.add(generation.usage);

            let plan = match parse_plan(&generation.content) {
                Ok(plan) => plan,
                Err(e) => {
                    warn!(%run_id, iteration, "Plan did not decode ({}), using fallback", e);
                    Plan::fallback()
                }
            };
            progress.on_plan(&plan);

            // The model sees its own prior reasoning on the next turn.
            transcript.push(Message::assistant(generation.content));

            iterations = iteration;
            reasoning_chain.push(ReasoningStep {
                step: iteration,
                observation: plan.observation.clone(),
                action: plan.action.to_string(),
                evaluation: plan.goal_progress.to_string(),
            });

            if plan.is_terminal() {
                debug!(%run_id, iteration, "Loop terminated by plan");
                break;
            }

            match plan.action {
                PlanAction::CallTool => {
                    let Some(call) = plan.tool_call else {
                        // The parser guarantees a tool name for decoded
                        // plans; a bare call_tool can only be hand-built.
                        warn!(%run_id, iteration, "call_tool plan without a tool call, skipping");
                        continue;
                    };

                    let key = ToolKey::new(&call.name, &call.params);
                    if !called.insert(key.clone()) {
                        // Anti-thrash guard: identical call already made.
                        debug!(%run_id, tool = %call.name, "Duplicate tool call suppressed");
                        progress.on_duplicate_tool_call(&call.name);
                        transcript.push(Message::system(
                            ReasoningPrompt::duplicate_tool_redirect(&call.name),
                        ));
                        continue;
                    }

                    progress.on_tool_call(&call.name);
                    match self.invoker.invoke(&call.name, &call.params).await {
                        Ok(result) => {
                            let rendered =
                                serde_json::to_string(&result).unwrap_or_default();
                            evidence.insert(key.as_str(), result.clone());
                            tool_calls.push(ToolCallRecord::success(
                                &call.name,
                                call.params,
                                result,
                                &plan.reasoning,
                            ));
                            transcript.push(Message::user(
                                ReasoningPrompt::tool_result_message(&call.name, &rendered),
                            ));
                            progress.on_tool_result(&call.name, true);
                        }
                        Err(e) => {
                            let message = e.to_string();
                            warn!(%run_id, tool = %call.name, "Tool failed: {}", message);
                            evidence.insert_error(&key, &message);
                            tool_calls.push(ToolCallRecord::failure(
                                &call.name,
                                call.params,
                                &message,
                                &plan.reasoning,
                            ));
                            transcript.push(Message::user(
                                ReasoningPrompt::tool_failure_message(&call.name, &message),
                            ));
                            progress.on_tool_result(&call.name, false);
                        }
                    }
                }
                PlanAction::RunSkill => {
                    // Full skill execution is expensive and must not be
                    // triggerable from the ad-hoc loop.
                    debug!(%run_id, iteration, "run_skill redirected to tools");
                    transcript.push(Message::system(ReasoningPrompt::run_skill_redirect()));
                }
                PlanAction::SynthesizeAndDeliver => unreachable!("terminal plans break above"),
            }
        }

        if is_cancelled(&self.cancellation_token) {
            return Err(AnswerQuestionError::Cancelled);
        }
        progress.on_synthesis_start();

        let synthesis_user =
            SynthesisPrompt::loop_user(&input.question, &evidence.synthesis_block());
        let generation = self
            .gateway
            .generate(
                Capability::Reason,
                SynthesisPrompt::loop_system(),
                &[Message::user(synthesis_user)],
                GenerateOptions::default(),
                Tracking::new(run_id, input.workspace_id.clone(), "synthesis"),
            )
            .await?;
        usage.add(generation.usage);

        let cited_records = derive_cited_records(&tool_calls);
        let loop_evidence = LoopEvidence {
            tool_calls,
            skill_evidence_used: Vec::new(),
            iterations,
            reasoning_chain,
            cited_records,
        };

        Ok((generation.content, loop_evidence, usage))
    }
}
