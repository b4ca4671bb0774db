//! Run ledger adapters.
//!
//! [`memory::InMemoryRunLedger`] keeps rows and the skill-output cache in
//! memory. [`jsonl::JsonlRunLedger`] appends run records to a JSONL audit
//! file and never serves cache probes.

pub mod jsonl;
pub mod memory;

pub use jsonl::JsonlRunLedger;
pub use memory::InMemoryRunLedger;
