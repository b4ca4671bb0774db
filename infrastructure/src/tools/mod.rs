//! Tool dispatch adapters.

pub mod registry;

pub use registry::{ToolHandler, ToolRegistry};
