//! Application layer for dealsense
//!
//! This crate contains use cases, port definitions, and application
//! configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{LoopParams, PipelineDefaults};
pub use ports::{
    delivery::{DeliveryDispatcher, DeliveryError, NoDelivery},
    llm_gateway::{GatewayError, GenerateOptions, Generation, LlmGateway, Tracking},
    progress::{NoRunProgress, RunProgressNotifier},
    run_ledger::{LedgerError, NoRunLedger, RunLedger, RunUpdate},
    tool_invoker::{ToolError, ToolInvoker},
};
pub use use_cases::answer_question::{
    AnswerQuestionError, AnswerQuestionUseCase, QuestionInput, QuestionOutput,
};
pub use use_cases::run_pipeline::{PipelineInput, RunPipelineError, RunPipelineUseCase};
