//! LLM gateway adapters.
//!
//! The HTTP adapter is behind the `http-gateway` feature so library users
//! that bring their own gateway do not pull in a TLS stack.

#[cfg(feature = "http-gateway")]
pub mod openai;

#[cfg(feature = "http-gateway")]
pub use openai::{OpenAiGateway, OpenAiGatewayConfig};
