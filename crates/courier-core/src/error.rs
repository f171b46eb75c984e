//! Error types for the core crate

use thiserror::Error;

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core operations
#[derive(Debug, Error)]
pub enum CoreError {
    /// A required argument was missing or empty
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Provider name is not in the registry
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    /// Options document could not be parsed or is incomplete
    #[error("Invalid options: {0}")]
    Options(String),

    /// Secret encryption or decryption failed
    #[error("Secret encryption error: {0}")]
    SecretCrypto(String),

    /// Wire record could not be decoded
    #[error("Invalid wire record: {0}")]
    WireFormat(String),

    /// SMTP transmission error
    #[error("SMTP error: {0}")]
    Smtp(String),

    /// Retrieval error
    #[error("Retrieval error: {0}")]
    Fetch(String),
}

impl From<courier_smtp::SmtpError> for CoreError {
    fn from(e: courier_smtp::SmtpError) -> Self {
        CoreError::Smtp(e.to_string())
    }
}

impl From<courier_fetch::FetchError> for CoreError {
    fn from(e: courier_fetch::FetchError) -> Self {
        CoreError::Fetch(e.to_string())
    }
}
