//! Error types for alerts-core

/// Result type for alerts-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that terminate a synchronization run
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The named policy does not exist remotely
    #[error("Policy {name} does not exist")]
    PolicyNotFound { name: String },

    /// A condition references an application that does not exist remotely
    #[error("Application {name} does not exist (referenced by policy {policy})")]
    ApplicationNotFound { policy: String, name: String },

    /// A remote call failed while working on a policy
    #[error("Policy {policy}: failed to {action}: {source}")]
    Remote {
        policy: String,
        action: String,
        #[source]
        source: alerts_api::Error,
    },

    /// Client error outside the scope of a policy
    #[error(transparent)]
    Api(#[from] alerts_api::Error),

    /// Invalid configuration
    #[error(transparent)]
    Config(#[from] alerts_config::Error),
}

impl Error {
    pub(crate) fn remote(policy: &str, action: impl Into<String>, source: alerts_api::Error) -> Self {
        Self::Remote {
            policy: policy.to_string(),
            action: action.into(),
            source,
        }
    }
}
