//! Error handling for ArmKit
//!
//! Error types are grouped by the layer that raises them:
//! - Connection errors (opening and enumerating serial links)
//! - Controller errors (protocol sequencing, writes, response waits)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Connection error type
///
/// Raised while locating or opening the serial link to the arm.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    /// The named port could not be opened or configured
    #[error("Port {port} unavailable: {reason}")]
    PortUnavailable {
        /// The name of the port that failed to open.
        port: String,
        /// The reason reported by the link layer.
        reason: String,
    },

    /// Port discovery found no candidate ports
    #[error("No serial ports available")]
    NoPortsAvailable,

    /// The operating system refused to enumerate ports
    #[error("Failed to enumerate ports: {reason}")]
    Enumeration {
        /// The reason enumeration failed.
        reason: String,
    },

    /// Invalid connection parameters
    #[error("Invalid connection parameters: {reason}")]
    InvalidParameters {
        /// The reason the parameters are invalid.
        reason: String,
    },
}

/// Controller error type
///
/// Raised by transport-dependent operations once a port name is bound.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControllerError {
    /// No live link; connect first or the session was closed
    #[error("Controller not connected")]
    NotConnected,

    /// A live link already exists
    #[error("Controller already connected")]
    AlreadyConnected,

    /// The device did not signal readiness in time
    #[error("No response from device after {timeout_ms}ms")]
    Timeout {
        /// The timeout duration in milliseconds.
        timeout_ms: u64,
    },

    /// The link reported a failure while writing
    #[error("Write failed: {reason}")]
    WriteFailed {
        /// The reason reported by the link.
        reason: String,
    },

    /// The link accepted only part of the command
    #[error("Partial write: {written} of {expected} bytes")]
    PartialWrite {
        /// Bytes accepted by the link.
        written: usize,
        /// Bytes in the command.
        expected: usize,
    },
}

/// Main error type for ArmKit
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Connection error
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// Controller error
    #[error(transparent)]
    Controller(#[from] ControllerError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Controller(ControllerError::Timeout { .. }))
    }

    /// Check if this is a connection error
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Error::Connection(_))
    }

    /// Check if this is a controller error
    pub fn is_controller_error(&self) -> bool {
        matches!(self, Error::Controller(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
