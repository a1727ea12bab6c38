//! ClassPilot Core — error taxonomy and configuration.

pub mod config;
pub mod error;

pub use config::{BedrockConfig, ServerConfig};
pub use error::{Error, Result};
