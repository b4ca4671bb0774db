//! Port definitions (interfaces to external collaborators).
//!
//! Ports are trait definitions that the application layer depends on.
//! Implementations (adapters) live in the infrastructure layer:
//!
//! - [`llm_gateway::LlmGateway`] — text generation by capability class
//! - [`tool_invoker::ToolInvoker`] — tool and skill execution
//! - [`run_ledger::RunLedger`] — run lifecycle persistence + cache probe
//! - [`delivery::DeliveryDispatcher`] — best-effort report delivery
//! - [`progress::RunProgressNotifier`] — run observation callbacks

pub mod delivery;
pub mod llm_gateway;
pub mod progress;
pub mod run_ledger;
pub mod tool_invoker;
