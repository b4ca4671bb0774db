//! Tracing delivery adapter.
//!
//! Stand-in dispatcher that records deliveries to the log instead of an
//! outbound channel. Useful for local runs and as the default wiring
//! until a Slack/email adapter is configured.

use async_trait::async_trait;
use dealsense_application::ports::delivery::{DeliveryDispatcher, DeliveryError};
use dealsense_domain::DeliverySpec;
use serde_json::Value;
use tracing::info;

/// Dispatcher that logs each delivery via `tracing`.
#[derive(Default)]
pub struct TracingDelivery;

impl TracingDelivery {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DeliveryDispatcher for TracingDelivery {
    async fn deliver(
        &self,
        spec: &DeliverySpec,
        content: Option<&str>,
        evidence: Option<&Value>,
    ) -> Result<(), DeliveryError> {
        info!(
            channel = %spec.channel,
            format = %spec.format,
            content_chars = content.map_or(0, str::len),
            has_evidence = evidence.is_some(),
            "Delivering synthesized report"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dealsense_domain::DeliveryChannel;
    use serde_json::json;

    #[tokio::test]
    async fn test_delivery_always_succeeds() {
        let dispatcher = TracingDelivery::new();
        let spec = DeliverySpec::new(DeliveryChannel::Slack).with_format("markdown");
        let result = dispatcher.deliver(&spec, Some("weekly report"), None).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_evidence_only_delivery_succeeds() {
        let dispatcher = TracingDelivery::new();
        let spec = DeliverySpec::new(DeliveryChannel::Slack);
        let evidence = json!([{"deals": []}]);
        let result = dispatcher.deliver(&spec, None, Some(&evidence)).await;
        assert!(result.is_ok());
    }
}
