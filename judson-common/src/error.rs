//! Common error types for judson

use thiserror::Error;

/// Common result type for judson operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the judson crates
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML parse error (wraps toml::de::Error)
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}
