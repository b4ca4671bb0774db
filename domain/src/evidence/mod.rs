//! Evidence domain.
//!
//! - [`key::ToolKey`] — content-hash identity of a tool call
//! - [`accumulator::EvidenceAccumulator`] — the loop's bounded working memory
//! - [`bound::bound_json`] — recursive array capping for prompts and ledger rows
//! - [`citations`] — cited-record derivation from tool results

pub mod accumulator;
pub mod bound;
pub mod citations;
pub mod key;
