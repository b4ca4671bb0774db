//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file
//! and are converted into the application-layer parameter types after
//! loading.

use dealsense_application::config::{LoopParams, PipelineDefaults};
use serde::{Deserialize, Serialize};

/// Reasoning loop section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReasoningConfig {
    /// Maximum plan/act/observe iterations per question
    pub max_iterations: usize,
}

impl Default for FileReasoningConfig {
    fn default() -> Self {
        Self { max_iterations: 5 }
    }
}

/// Pipeline runner section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePipelineConfig {
    /// Cache reuse window applied when a step does not set its own
    pub cache_ttl_minutes: u64,
    /// Per-step timeout applied when a step does not set its own
    pub timeout_seconds: u64,
}

impl Default for FilePipelineConfig {
    fn default() -> Self {
        Self {
            cache_ttl_minutes: 30,
            timeout_seconds: 120,
        }
    }
}

/// LLM gateway section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGatewayConfig {
    /// Base URL of an OpenAI-compatible endpoint
    pub base_url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Model serving the `reason` capability
    pub reason_model: String,
    /// Model serving the `extract` capability
    pub extract_model: String,
}

impl Default for FileGatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            reason_model: "gpt-4o".to_string(),
            extract_model: "gpt-4o-mini".to_string(),
        }
    }
}

/// Logging section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Tracing filter directive, e.g. "dealsense=debug"
    pub filter: String,
    /// Optional path for the JSONL run ledger
    pub ledger_path: Option<String>,
}

impl Default for FileLoggingConfig {
    fn default() -> Self {
        Self {
            filter: "dealsense=info".to_string(),
            ledger_path: None,
        }
    }
}

/// Complete configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub reasoning: FileReasoningConfig,
    pub pipeline: FilePipelineConfig,
    pub gateway: FileGatewayConfig,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Loop parameters for the question use case
    pub fn loop_params(&self) -> LoopParams {
        LoopParams::default().with_max_iterations(self.reasoning.max_iterations)
    }

    /// Fallback policy values for pipeline steps
    pub fn pipeline_defaults(&self) -> PipelineDefaults {
        PipelineDefaults::default()
            .with_cache_ttl_minutes(self.pipeline.cache_ttl_minutes)
            .with_timeout_seconds(self.pipeline.timeout_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FileConfig::default();
        assert_eq!(config.reasoning.max_iterations, 5);
        assert_eq!(config.pipeline.cache_ttl_minutes, 30);
        assert_eq!(config.pipeline.timeout_seconds, 120);
        assert_eq!(config.gateway.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.logging.filter, "dealsense=info");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: FileConfig = toml::from_str(
            r#"
            [reasoning]
            max_iterations = 8

            [gateway]
            base_url = "https://llm.internal/v1"
            "#,
        )
        .unwrap();
        assert_eq!(config.reasoning.max_iterations, 8);
        assert_eq!(config.gateway.base_url, "https://llm.internal/v1");
        assert_eq!(config.gateway.reason_model, "gpt-4o");
        assert_eq!(config.pipeline.timeout_seconds, 120);
    }

    #[test]
    fn test_loop_params_conversion() {
        let mut config = FileConfig::default();
        config.reasoning.max_iterations = 3;
        assert_eq!(config.loop_params().max_iterations, 3);
    }

    #[test]
    fn test_pipeline_defaults_conversion() {
        let mut config = FileConfig::default();
        config.pipeline.cache_ttl_minutes = 10;
        config.pipeline.timeout_seconds = 45;
        let defaults = config.pipeline_defaults();
        assert_eq!(defaults.cache_ttl_minutes, 10);
        assert_eq!(defaults.timeout_seconds, 45);
    }
}
