//! Error types for retrieval operations

use thiserror::Error;

/// Result type for retrieval operations
pub type FetchResult<T> = Result<T, FetchError>;

/// Errors that can occur while retrieving messages
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection failed
    #[error("Failed to connect to mail server: {0}")]
    ConnectionFailed(String),

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Server returned an error
    #[error("Server error: {0}")]
    ServerError(String),

    /// Failed to parse a server response
    #[error("Failed to parse server response: {0}")]
    ParseError(String),

    /// TLS error
    #[error("TLS error: {0}")]
    TlsError(String),

    /// Session is not connected
    #[error("Session is not connected")]
    NotConnected,

    /// Retrieval is not available for this account
    #[error("Retrieval unavailable: {0}")]
    Unavailable(String),
}
