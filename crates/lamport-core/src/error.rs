//! Error types for the Lamport clock simulator

use thiserror::Error;

use crate::ProcessId;

/// Core errors
#[derive(Error, Debug)]
pub enum LamportError {
    // Address errors
    #[error("Port number must be an integer, got {0:?}")]
    InvalidPort(String),

    #[error("Port number must be between 1024 and 65535, got {0}")]
    PortOutOfRange(i64),

    #[error("Port {0} is already in use")]
    AddressInUse(ProcessId),

    #[error("Unable to bind to port {port}: {reason}")]
    BindFailed { port: ProcessId, reason: String },

    // Send errors
    #[error("Cannot send a message to the same port ({0})")]
    SelfSend(ProcessId),

    #[error("Connection error to port {port}: {reason}")]
    ConnectionFailed { port: ProcessId, reason: String },

    // Wire errors
    #[error("Invalid wire format: {0}")]
    InvalidWireFormat(String),

    #[error("Frame exceeds {limit} bytes without a line terminator")]
    FrameTooLarge { limit: usize },

    // Transport errors
    #[error("Transport error: {0}")]
    TransportError(String),

    #[error("Listener stopped before it was ready")]
    ListenerUnavailable,
}

impl LamportError {
    /// Startup errors: the process cannot take part without a listening address.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            LamportError::AddressInUse(_)
                | LamportError::BindFailed { .. }
                | LamportError::ListenerUnavailable
        )
    }
}

/// Result type for Lamport operations
pub type LamportResult<T> = Result<T, LamportError>;
