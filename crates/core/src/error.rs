//! Error types shared by the core and its adapters.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A date (or other input value) could not be interpreted
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unknown stardate style name
    #[error("Unknown stardate style: {0}")]
    InvalidStyle(String),

    #[error("Post not found: {0}")]
    PostNotFound(i64),

    /// Failure reported by a content or term store
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
