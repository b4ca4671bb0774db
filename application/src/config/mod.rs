//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave:
//!
//! - [`LoopParams`] — reasoning-loop control (iteration bound)
//! - [`PipelineDefaults`] — fallback cache TTL and timeout for pipeline steps

pub mod loop_params;
pub mod pipeline_defaults;

pub use loop_params::LoopParams;
pub use pipeline_defaults::PipelineDefaults;
