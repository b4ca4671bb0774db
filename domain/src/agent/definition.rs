//! Agent definitions: the static description of a pipeline.

use crate::core::capability::Capability;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

fn default_cache_ttl_minutes() -> u64 {
    30
}

fn default_timeout_seconds() -> u64 {
    120
}

fn default_enabled() -> bool {
    true
}

fn default_max_tokens() -> u32 {
    2_000
}

/// One ordered step of an agent pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillStep {
    pub skill_id: String,
    /// Key the step's output is stored under and the `{{placeholder}}` name
    /// available to the synthesis template.
    pub output_key: String,
    /// Required steps abort the whole run on failure; optional steps
    /// degrade it to partial.
    #[serde(default)]
    pub required: bool,
    #[serde(default = "default_cache_ttl_minutes")]
    pub cache_ttl_minutes: u64,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default)]
    pub params: Map<String, Value>,
}

impl SkillStep {
    pub fn new(skill_id: impl Into<String>, output_key: impl Into<String>) -> Self {
        Self {
            skill_id: skill_id.into(),
            output_key: output_key.into(),
            required: false,
            cache_ttl_minutes: default_cache_ttl_minutes(),
            timeout_seconds: default_timeout_seconds(),
            params: Map::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_cache_ttl_minutes(mut self, minutes: u64) -> Self {
        self.cache_ttl_minutes = minutes;
        self
    }

    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: Value) -> Self {
        self.params.insert(key.into(), value);
        self
    }
}

/// Synthesis configuration for an agent pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisSpec {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub system_prompt: String,
    /// Template with `{{output_key}}` placeholders plus the combined
    /// `{{skill_outputs}}` block.
    pub user_prompt_template: String,
    #[serde(default, alias = "provider")]
    pub capability: Capability,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl SynthesisSpec {
    pub fn new(system_prompt: impl Into<String>, user_prompt_template: impl Into<String>) -> Self {
        Self {
            enabled: true,
            system_prompt: system_prompt.into(),
            user_prompt_template: user_prompt_template.into(),
            capability: Capability::default(),
            max_tokens: default_max_tokens(),
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            system_prompt: String::new(),
            user_prompt_template: String::new(),
            capability: Capability::default(),
            max_tokens: default_max_tokens(),
        }
    }

    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.capability = capability;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Where an agent's synthesized report is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryChannel {
    Slack,
    Email,
    Api,
    Webhook,
}

impl DeliveryChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryChannel::Slack => "slack",
            DeliveryChannel::Email => "email",
            DeliveryChannel::Api => "api",
            DeliveryChannel::Webhook => "webhook",
        }
    }
}

impl std::fmt::Display for DeliveryChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Delivery configuration for an agent pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliverySpec {
    pub channel: DeliveryChannel,
    /// Renderer hint (e.g. "markdown", "blocks"). Opaque to the core.
    #[serde(default)]
    pub format: String,
}

impl DeliverySpec {
    pub fn new(channel: DeliveryChannel) -> Self {
        Self {
            channel,
            format: String::new(),
        }
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }
}

/// Static definition of an agent pipeline (Entity).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentDefinition {
    pub agent_id: String,
    pub name: String,
    pub steps: Vec<SkillStep>,
    pub synthesis: SynthesisSpec,
    pub delivery: DeliverySpec,
}

impl AgentDefinition {
    pub fn new(
        agent_id: impl Into<String>,
        name: impl Into<String>,
        steps: Vec<SkillStep>,
        synthesis: SynthesisSpec,
        delivery: DeliverySpec,
    ) -> Self {
        Self {
            agent_id: agent_id.into(),
            name: name.into(),
            steps,
            synthesis,
            delivery,
        }
    }

    /// Structural validation: at least one step, every step named, output
    /// keys unique (a duplicate key would silently shadow a step's output
    /// in the synthesis template).
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.steps.is_empty() {
            return Err(DomainError::InvalidAgentDefinition(format!(
                "agent '{}' has no steps",
                self.agent_id
            )));
        }

        let mut seen_keys = HashSet::new();
        for step in &self.steps {
            if step.skill_id.trim().is_empty() {
                return Err(DomainError::InvalidAgentDefinition(format!(
                    "agent '{}' has a step with an empty skill id",
                    self.agent_id
                )));
            }
            if step.output_key.trim().is_empty() {
                return Err(DomainError::InvalidAgentDefinition(format!(
                    "step '{}' has an empty output key",
                    step.skill_id
                )));
            }
            if !seen_keys.insert(step.output_key.as_str()) {
                return Err(DomainError::InvalidAgentDefinition(format!(
                    "duplicate output key '{}'",
                    step.output_key
                )));
            }
        }

        Ok(())
    }
}
