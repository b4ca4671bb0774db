//! Agent domain.
//!
//! [`definition::AgentDefinition`] is the static description of a pipeline:
//! its ordered skill steps, synthesis configuration, and delivery target.

pub mod definition;
