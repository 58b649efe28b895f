//! Error types shared across the reconciliation core.

use thiserror::Error;

/// Errors that can occur while converging a resource.
#[derive(Debug, Error)]
pub enum Error {
    /// Credentials were rejected by the backend. Never retried.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Connection-level failure (refused, timeout, TLS).
    #[error("transport failure: {0}")]
    Transport(#[source] reqwest::Error),

    /// The backend rejected a request.
    #[error("API error, status {status}: {body}")]
    Api { status: u16, body: String },

    /// The requested desired state is internally inconsistent.
    #[error("invalid parameters: {0}")]
    Validation(String),
}

/// Result type for reconciliation operations.
pub type Result<T> = std::result::Result<T, Error>;
