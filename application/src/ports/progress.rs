//! Run progress port.
//!
//! [`RunProgressNotifier`] is an **output port** a caller can implement to
//! observe a run as it executes (UI status line, server-sent events).
//! All methods have default no-op implementations, so implementers only
//! override the callbacks they care about.

use dealsense_domain::{Plan, SkillResult};

/// Progress notifier for orchestration runs.
pub trait RunProgressNotifier: Send + Sync {
    // ==================== Reasoning loop ====================

    /// Called at the start of each planning iteration (1-based).
    fn on_iteration_start(&self, _iteration: usize, _max_iterations: usize) {}

    /// Called when an iteration's plan has been decoded (or substituted).
    fn on_plan(&self, _plan: &Plan) {}

    /// Called when a tool is invoked.
    fn on_tool_call(&self, _tool: &str) {}

    /// Called when a tool returns (success or failure).
    fn on_tool_result(&self, _tool: &str, _success: bool) {}

    /// Called when a duplicate tool call was suppressed and redirected.
    fn on_duplicate_tool_call(&self, _tool: &str) {}

    /// Called when the loop stops iterating and begins synthesis.
    fn on_synthesis_start(&self) {}

    // ==================== Pipeline ====================

    /// Called before a skill step executes (or is served from cache).
    fn on_step_start(&self, _skill_id: &str) {}

    /// Called when a step finishes, whatever its outcome.
    fn on_step_complete(&self, _result: &SkillResult) {}

    /// Called when the synthesized report is handed to delivery.
    fn on_delivery(&self, _channel: &str) {}
}

/// No-op implementation for when progress isn't needed
pub struct NoRunProgress;

impl RunProgressNotifier for NoRunProgress {}
