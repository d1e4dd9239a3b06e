//! Error types for the DDNS updater
//!
//! Errors fall into two classes. Configuration errors are fatal: they mean
//! the deployment is broken and the process must stop. Everything else is
//! recoverable and only aborts the current check cycle.

use thiserror::Error;

/// Result type alias for DDNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the DDNS updater
#[derive(Error, Debug)]
pub enum Error {
    /// A required setting is absent or empty
    #[error("Environment variable \"{name}\" not set")]
    MissingConfiguration {
        /// Name of the setting
        name: String,
    },

    /// A setting is present but cannot be used
    #[error("Environment variable \"{name}\" is invalid: {reason}")]
    InvalidConfiguration {
        /// Name of the setting
        name: String,
        /// Why the value was rejected
        reason: String,
    },

    /// Public IP discovery failed (network, non-2xx, unreadable body)
    #[error("IP discovery error: {0}")]
    IpDiscovery(String),

    /// The DNS provider rejected the change or could not be reached
    #[error("DNS update error: {0}")]
    Update(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a missing configuration error
    pub fn missing_config(name: impl Into<String>) -> Self {
        Self::MissingConfiguration { name: name.into() }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an IP discovery error
    pub fn ip_discovery(msg: impl Into<String>) -> Self {
        Self::IpDiscovery(msg.into())
    }

    /// Create a DNS update error
    pub fn update(msg: impl Into<String>) -> Self {
        Self::Update(msg.into())
    }

    /// Whether this error must terminate the process
    ///
    /// Only configuration errors are fatal. The control loop re-raises them
    /// and swallows everything else.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::MissingConfiguration { .. } | Self::InvalidConfiguration { .. }
        )
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
