//! Error types for Cadence

use thiserror::Error;

use crate::Tier;

/// Core Cadence errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CadenceError {
    // Rule store errors
    #[error("Capacity exceeded: {tier} tier holds at most {capacity} rules")]
    CapacityExceeded { tier: Tier, capacity: usize },

    // Frame errors
    #[error("Malformed frame: {0}")]
    MalformedFrame(String),

    #[error("Buffer too short: expected {expected}, got {actual}")]
    BufferTooShort { expected: usize, actual: usize },

    #[error("Unknown packet type: {0:#04x}")]
    UnknownPacketType(u8),

    #[error("Parameter length mismatch: declared {declared}, got {actual}")]
    LengthMismatch { declared: usize, actual: usize },

    // Protocol errors
    #[error("Action {action} failed, aborting protocol {protocol}")]
    ActionFailed { action: String, protocol: String },

    #[error("No active protocol")]
    NoActiveProtocol,

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CadenceError {
    /// Errors that leave the system running in a degraded state
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, CadenceError::InvalidConfig(_))
    }
}

/// Result type for Cadence operations
pub type CadenceResult<T> = Result<T, CadenceError>;
