//! Gateway error types

use std::time::Duration;

/// Errors surfaced by a mount protocol gateway
///
/// The state machine never propagates these to its callers; every
/// command folds a gateway failure into a rejected outcome and leaves
/// the mount in its last known good state.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GatewayError {
    /// Transport-level read or write failure
    #[error("I/O error: {0}")]
    Io(String),

    /// Command round trip exceeded the gateway's deadline
    #[error("operation '{operation}' timed out after {duration:?}")]
    Timeout {
        operation: String,
        duration: Duration,
    },

    /// No link to the mount
    #[error("not connected to mount")]
    NotConnected,

    /// The mount answered with an error code
    #[error("mount rejected command: {0}")]
    CommandFailed(String),
}

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;
