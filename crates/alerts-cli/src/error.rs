//! Error types for alerts-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from alerts-core
    #[error(transparent)]
    Core(#[from] alerts_core::Error),

    /// Error from alerts-config
    #[error(transparent)]
    Config(#[from] alerts_config::Error),

    /// Error from alerts-api
    #[error(transparent)]
    Api(#[from] alerts_api::Error),

    /// JSON output error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
