//! TCP Client Error Hierarchy
//!
//! Defines the error types used by the client's fallible setup paths
//! (configuration, runtime construction) and by its background tasks.
//! None of these are surfaced to callers of `connect` or `send`: connection
//! tasks turn them into reason strings for the failure notification channel.

use std::time::Duration;

use config::ConfigError;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Infrastructure-level failures (sockets, runtime)
    #[error(transparent)]
    System(#[from] SystemError),

    /// Client configuration validation failures
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Unrecoverable failures
    #[error("Fatal error: {0}")]
    Fatal(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SystemError {
    // Network layer
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Failed to build I/O runtime: {0}")]
    RuntimeBuild(#[source] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    /// TCP handshake did not complete in time
    #[error("Connection timeout to {address} after {duration:?}")]
    ConnectTimeout { address: String, duration: Duration },

    /// TCP handshake failed
    #[error("Failed to connect to {address}: {source}")]
    ConnectFailed {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// Low-level TCP configuration errors
    #[error("TCP nodelay configuration error: {0}")]
    TcpNodelay(#[source] std::io::Error),

    /// Read side of the socket failed
    #[error("Socket read failed: {0}")]
    Read(#[source] std::io::Error),

    /// Write side of the socket failed
    #[error("Socket write failed: {0}")]
    Write(#[source] std::io::Error),
}

// ============== Conversion Implementations ============== //
impl From<NetworkError> for Error {
    fn from(e: NetworkError) -> Self {
        Error::System(SystemError::Network(e))
    }
}

impl Error {
    /// Human readable reason delivered through `on_connection_failed`.
    ///
    /// Uses the innermost I/O message when one exists so consumers see the
    /// socket's own wording ("Connection reset by peer").
    pub fn reason(&self) -> String {
        match self {
            Error::System(SystemError::Network(NetworkError::Read(e)))
            | Error::System(SystemError::Network(NetworkError::Write(e))) => e.to_string(),
            other => other.to_string(),
        }
    }
}
