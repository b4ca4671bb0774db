//! Use cases (application services).
//!
//! The two orchestration cores:
//!
//! - [`answer_question::AnswerQuestionUseCase`] — the reasoning loop for
//!   ad-hoc questions
//! - [`run_pipeline::RunPipelineUseCase`] — the pipeline runner for
//!   scheduled agent executions

pub mod answer_question;
pub mod run_pipeline;
pub(crate) mod shared;
