//! Loop parameters — reasoning-loop control.
//!
//! [`LoopParams`] groups the static parameters that bound the plan/act/observe
//! loop in [`AnswerQuestionUseCase`](crate::use_cases::answer_question::AnswerQuestionUseCase).
//! These are application-layer concerns, not domain policy.

use serde::{Deserialize, Serialize};

/// Reasoning-loop control parameters.
///
/// The loop has no internal wall-clock timeout; `max_iterations` is its
/// only bound. Callers that need a deadline wrap the whole call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoopParams {
    /// Maximum number of planning iterations before forced synthesis.
    pub max_iterations: usize,
}

impl Default for LoopParams {
    fn default() -> Self {
        Self { max_iterations: 5 }
    }
}

impl LoopParams {
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }
}
