//! # Judson Common Library
//!
//! Shared code for the judson sorter:
//! - Bootstrap configuration (TOML file, environment, compiled defaults)
//! - Output (library) folder resolution
//! - Common error type

pub mod config;
pub mod error;

pub use config::{LoggingConfig, TomlConfig};
pub use error::{Error, Result};
