//! Run domain.
//!
//! - [`ids::RunId`], [`ids::WorkspaceId`] — run and tenant identity
//! - [`status`] — run/step lifecycle states
//! - [`records`] — immutable result records written to the run ledger

pub mod ids;
pub mod records;
pub mod status;
