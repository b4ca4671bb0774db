//! Prompt construction for the orchestration cores.
//!
//! - [`templates::ReasoningPrompt`] — planning-loop prompts and transcript messages
//! - [`synthesis::SynthesisPrompt`] — final-answer prompts and pipeline template rendering

pub mod synthesis;
pub mod templates;

pub use synthesis::SynthesisPrompt;
pub use templates::ReasoningPrompt;
