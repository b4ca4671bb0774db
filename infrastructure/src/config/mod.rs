//! Configuration loading.

pub mod file;
pub mod loader;

pub use file::{
    FileConfig, FileGatewayConfig, FileLoggingConfig, FilePipelineConfig, FileReasoningConfig,
};
pub use loader::ConfigLoader;
