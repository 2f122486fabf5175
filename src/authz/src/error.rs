//! Error types for the authorization engine

use thiserror::Error;

/// Authorization engine errors
///
/// A denied request is never an error: the evaluator only ever answers
/// `true`/`false`. These cover the I/O and configuration surfaces around it.
#[derive(Debug, Error)]
pub enum AuthzError {
    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Policy not found
    #[error("Policy not found: {0}")]
    PolicyNotFound(String),

    /// Scope hierarchy failed validation
    #[error("Invalid scope hierarchy: {0}")]
    InvalidSchema(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// JSON encoding or decoding failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Policy store backend failure
    #[error("Store error: {0}")]
    Store(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for authorization operations
pub type Result<T> = std::result::Result<T, AuthzError>;
