//! Pipeline defaults — fallbacks for per-step settings.
//!
//! Per-step cache TTL and timeout come from the agent definition; these
//! defaults apply when a definition is built programmatically without
//! explicit values, and they mirror the serde defaults on
//! [`SkillStep`](dealsense_domain::SkillStep).

use serde::{Deserialize, Serialize};

/// Default cache and timeout settings for pipeline steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineDefaults {
    /// Cache validity window for skill outputs, in minutes.
    pub cache_ttl_minutes: u64,
    /// Per-step execution timeout, in seconds.
    pub timeout_seconds: u64,
}

impl Default for PipelineDefaults {
    fn default() -> Self {
        Self {
            cache_ttl_minutes: 30,
            timeout_seconds: 120,
        }
    }
}

impl PipelineDefaults {
    pub fn with_cache_ttl_minutes(mut self, minutes: u64) -> Self {
        self.cache_ttl_minutes = minutes;
        self
    }

    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }
}
