//! Driver error types.

use thiserror::Error;

/// Failures surfaced by a [`crate::Transport`] implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The transport cannot provide another transfer resource.
    #[error("transfer resources exhausted")]
    Exhausted,

    /// A bounded synchronous write did not complete in time.
    #[error("transfer timed out after {0} ms")]
    Timeout(u64),

    /// The device is gone.
    #[error("device disconnected")]
    Disconnected,

    /// Any other transport-level I/O failure.
    #[error("transport I/O error: {0}")]
    Io(String),
}

impl TransportError {
    /// Whether retrying the same operation can reasonably succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, TransportError::Timeout(_))
    }

    /// Whether the device is unavailable for good.
    pub fn is_fatal(&self) -> bool {
        matches!(self, TransportError::Disconnected)
    }
}

/// Failures surfaced by the effect-lifecycle calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DriverError {
    /// Effect id outside the wheel's slot table.
    #[error("effect slot {0} out of range")]
    SlotOutOfRange(u8),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// A specialized `Result` for driver operations.
pub type DriverResult<T> = Result<T, DriverError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = TransportError::Timeout(500);
        assert_eq!(err.to_string(), "transfer timed out after 500 ms");
        let err = DriverError::SlotOutOfRange(16);
        assert_eq!(err.to_string(), "effect slot 16 out of range");
    }

    #[test]
    fn test_transport_error_passes_through() {
        let err: DriverError = TransportError::Exhausted.into();
        assert_eq!(err.to_string(), "transfer resources exhausted");
    }

    #[test]
    fn test_classification() {
        assert!(TransportError::Timeout(10).is_retryable());
        assert!(!TransportError::Disconnected.is_retryable());
        assert!(TransportError::Disconnected.is_fatal());
    }
}
