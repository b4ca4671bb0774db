//! Domain layer for dealsense
//!
//! This crate contains the core business logic, entities, and value objects
//! of the orchestration core. It has no dependencies on infrastructure or
//! presentation concerns.
//!
//! # Core Concepts
//!
//! ## Reasoning Loop
//!
//! An ad-hoc question is answered by an iterative plan → act → observe loop:
//! each iteration the model emits a [`Plan`], the loop may invoke one tool,
//! and the result lands in the [`EvidenceAccumulator`] under its
//! content-hash [`ToolKey`].
//!
//! ## Pipeline
//!
//! A scheduled agent run executes the ordered [`SkillStep`] list of an
//! [`AgentDefinition`], then synthesizes a report over the step outputs.
//!
//! Every rendering of accumulated evidence is budgeted (see
//! [`core::budget`]) so no single payload can starve the model's context
//! window.

pub mod agent;
pub mod core;
pub mod evidence;
pub mod plan;
pub mod prompt;
pub mod run;
pub mod session;

// Re-export commonly used types
pub use agent::definition::{
    AgentDefinition, DeliveryChannel, DeliverySpec, SkillStep, SynthesisSpec,
};
pub use self::core::{capability::Capability, error::DomainError};
pub use evidence::{
    accumulator::EvidenceAccumulator,
    bound::bound_json,
    citations::{CitedRecord, derive_cited_records},
    key::ToolKey,
};
pub use plan::{
    GoalProgress, Plan, PlanAction, ToolCallRequest,
    parser::{PlanParseError, extract_json_object, parse_plan},
};
pub use prompt::{ReasoningPrompt, SynthesisPrompt};
pub use run::{
    ids::{RunId, WorkspaceId},
    records::{
        AgentRunResult, LoopEvidence, ReasoningStep, RunTokenUsage, SkillResult, ToolCallRecord,
    },
    status::{RunKind, RunStatus, StepStatus},
};
pub use session::entities::{Message, Role, TokenUsage};
