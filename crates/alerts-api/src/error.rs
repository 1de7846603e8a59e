//! Error types for alerts-api

/// Result type for alerts-api operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while talking to the remote alerting service
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport failure (connection, timeout, TLS...)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("{method} {url} returned {status}: {body}")]
    Status {
        method: String,
        url: String,
        status: u16,
        body: String,
    },

    /// The response body did not have the expected shape
    #[error("Unexpected response from {url}: {message}")]
    Decode { url: String, message: String },

    /// A created or updated entity came back without an identifier
    #[error("{kind} '{name}' has no identifier")]
    MissingId { kind: String, name: String },

    /// The operation only applies to kinds shared across policies
    #[error("Cannot {operation} {kind}: not shared across policies")]
    NotShared { operation: String, kind: String },

    /// The client could not be constructed
    #[error("Invalid client settings: {0}")]
    InvalidSettings(String),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
