//! Common error types for the outreach dashboard
//!
//! Malformed feed data never surfaces here: the visit pipeline is total and
//! degrades bad fields to absent values, and a failed fetch is a
//! [`crate::feed::FetchError`] handled by degrading to an empty feed. These
//! errors cover loading configuration.

use thiserror::Error;

/// Common result type for outreach operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the outreach crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML configuration could not be parsed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}
