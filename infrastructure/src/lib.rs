//! Infrastructure layer for dealsense
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading,
//! run ledgers, tool dispatch, delivery, and the hosted LLM gateway.

pub mod config;
pub mod delivery;
pub mod gateway;
pub mod ledger;
pub mod logging;
pub mod tools;

// Re-export commonly used types
pub use config::{ConfigLoader, FileConfig};
pub use delivery::TracingDelivery;
pub use ledger::{InMemoryRunLedger, JsonlRunLedger};
pub use logging::init_tracing;
pub use tools::{ToolHandler, ToolRegistry};

#[cfg(feature = "http-gateway")]
pub use gateway::{OpenAiGateway, OpenAiGatewayConfig};
