//! Core domain concepts shared across all subdomains.
//!
//! - [`capability::Capability`] — capability class requested from the LLM gateway
//! - [`budget`] — context budget constants for evidence and prompt bounding
//! - [`error::DomainError`] — domain-level errors

pub mod budget;
pub mod capability;
pub mod error;
pub mod string;
