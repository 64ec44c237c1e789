//! Engine error types.
//!
//! Cancellation of a scheduled task is deliberately not represented here: a
//! superseded or revoked task is a normal outcome, never an error.

use plover_core::ChannelId;
use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Result type for user directory operations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// A user directory call failed (data unavailable this cycle).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("user directory error: {message}")]
pub struct DirectoryError {
    message: String,
}

impl DirectoryError {
    /// Creates a directory error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A message could not be delivered to a channel.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("delivery to channel {channel} failed: {message}")]
pub struct DeliveryError {
    /// The channel the delivery was attempted to.
    pub channel: ChannelId,
    message: String,
}

impl DeliveryError {
    /// Creates a delivery error for the given channel.
    pub fn new(channel: ChannelId, message: impl Into<String>) -> Self {
        Self {
            channel,
            message: message.into(),
        }
    }
}

/// Errors that can occur in the engine.
///
/// Delivery failures never appear here: the sender contains them per guild
/// (log and continue) rather than propagating them out of a task.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    /// A user directory call failed.
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_error_display() {
        let err = DirectoryError::new("connection refused");
        assert_eq!(err.to_string(), "user directory error: connection refused");
    }

    #[test]
    fn delivery_error_display() {
        let err = DeliveryError::new(ChannelId(9), "missing permissions");
        assert_eq!(
            err.to_string(),
            "delivery to channel 9 failed: missing permissions"
        );
    }

    #[test]
    fn engine_error_from_directory() {
        let err: EngineError = DirectoryError::new("boom").into();
        assert_eq!(err.to_string(), "user directory error: boom");
    }
}
