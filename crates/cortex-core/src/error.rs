//! Error types for cortex-core.

use thiserror::Error;

/// Result type alias using cortex-core Error
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for client operations
#[derive(Error, Debug)]
pub enum Error {
    // Transport errors
    /// The backend answered with a non-success status. `message` is the
    /// server-supplied error text when the body carried one, otherwise a
    /// non-empty fallback built from the status.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to parse response: {0}")]
    Deserialize(String),

    // Auth errors
    #[error("Missing authentication")]
    MissingAuth,

    // Config errors
    #[error("Configuration error: {0}")]
    Config(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Generic errors
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an API error from a status code and server message
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// HTTP status code, if this is an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(e: toml::ser::Error) -> Self {
        Error::Config(e.to_string())
    }
}
