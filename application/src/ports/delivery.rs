//! Delivery Dispatcher port
//!
//! Fire-and-forget hand-off of a synthesized report to its configured
//! channel. Delivery failures are logged by the pipeline runner and never
//! change a run's status retroactively.

use async_trait::async_trait;
use dealsense_domain::DeliverySpec;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur during delivery
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Delivery to {channel} failed: {message}")]
    Failed { channel: String, message: String },
}

/// Port for delivering synthesized output
///
/// Implementations (Slack, email, webhook adapters) live in the
/// infrastructure layer.
#[async_trait]
pub trait DeliveryDispatcher: Send + Sync {
    /// Deliver content to the configured channel, optionally with the
    /// skill evidence that backs it. `content` is `None` when the run
    /// produced no synthesized report (synthesis disabled, or no step
    /// output to synthesize over); evidence is still handed off.
    async fn deliver(
        &self,
        spec: &DeliverySpec,
        content: Option<&str>,
        evidence: Option<&Value>,
    ) -> Result<(), DeliveryError>;
}

/// No-op dispatcher for tests and dry runs.
pub struct NoDelivery;

#[async_trait]
impl DeliveryDispatcher for NoDelivery {
    async fn deliver(
        &self,
        _spec: &DeliverySpec,
        _content: Option<&str>,
        _evidence: Option<&Value>,
    ) -> Result<(), DeliveryError> {
        Ok(())
    }
}
