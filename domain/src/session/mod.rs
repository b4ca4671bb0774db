//! LLM session domain.
//!
//! - [`entities::Message`] — a single message within a conversation transcript
//! - [`entities::TokenUsage`] — token counters reported by the gateway

pub mod entities;
