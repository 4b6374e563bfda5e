//! Common error types for RVV

use thiserror::Error;

/// Common result type for RVV operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across RVV crates
#[derive(Error, Debug)]
pub enum Error {
    /// TOML parse error for catalogs or config files
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration loading or catalog validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
