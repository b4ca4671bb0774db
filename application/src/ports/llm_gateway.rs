//! LLM Gateway port
//!
//! Defines the interface for generating text against an LLM provider.
//! The core requests a capability class, never a concrete model; the
//! adapter decides what that maps to.

use async_trait::async_trait;
use dealsense_domain::{Capability, Message, RunId, TokenUsage, WorkspaceId};
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
///
/// These are transport-level failures. The cores never recover from them:
/// there is no business fallback for "the model is unreachable", so they
/// propagate to the caller, whose retry policy applies.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Capability not available: {0}")]
    CapabilityNotAvailable(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// Generation parameters for one call.
#[derive(Debug, Clone, Copy)]
pub struct GenerateOptions {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            max_tokens: 2_000,
            temperature: 0.2,
        }
    }
}

impl GenerateOptions {
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Attribution metadata carried with each call for usage accounting.
///
/// Opaque to the gateway contract; adapters forward it to whatever
/// tracking their provider supports.
#[derive(Debug, Clone, Default)]
pub struct Tracking {
    pub run_id: Option<RunId>,
    pub workspace_id: Option<WorkspaceId>,
    /// What the call is for (e.g. "planning", "synthesis").
    pub purpose: &'static str,
}

impl Tracking {
    pub fn new(run_id: RunId, workspace_id: WorkspaceId, purpose: &'static str) -> Self {
        Self {
            run_id: Some(run_id),
            workspace_id: Some(workspace_id),
            purpose,
        }
    }
}

/// One completed generation: the text plus its token counters.
#[derive(Debug, Clone)]
pub struct Generation {
    /// Opaque text. May or may not contain a JSON object; callers must
    /// never assume well-formed JSON.
    pub content: String,
    pub usage: TokenUsage,
}

/// Gateway for LLM generation
///
/// This port defines how the application layer reaches LLM providers.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Generate text for a capability class over a system prompt and a
    /// message transcript.
    async fn generate(
        &self,
        capability: Capability,
        system_prompt: &str,
        messages: &[Message],
        options: GenerateOptions,
        tracking: Tracking,
    ) -> Result<Generation, GatewayError>;
}
