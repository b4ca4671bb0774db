//! Delivery adapters.

pub mod tracing;

pub use self::tracing::TracingDelivery;
