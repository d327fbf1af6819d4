//! Fatal error kinds for the redaction pump.
//!
//! Neither kind is recoverable: once a read or write has failed, or the
//! working buffer filled up without producing a flushable prefix, the stream
//! position cannot be replayed safely.

use thiserror::Error;

/// Errors that terminate a [`StreamPump`](crate::governance::StreamPump).
#[derive(Error, Debug)]
pub enum FilterError {
    /// The byte source or sink failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A pending candidate run filled the whole working buffer.
    #[error("working buffer capacity of {capacity} bytes exceeded by an unresolved digit run")]
    CapacityExceeded { capacity: usize },
}

impl FilterError {
    /// Short machine-readable tag, used in audit events.
    pub fn kind(&self) -> &'static str {
        match self {
            FilterError::Io(_) => "io_failure",
            FilterError::CapacityExceeded { .. } => "capacity_exceeded",
        }
    }
}

pub type Result<T> = std::result::Result<T, FilterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone");
        let err: FilterError = io.into();
        assert!(matches!(err, FilterError::Io(_)));
        assert_eq!(err.kind(), "io_failure");
    }

    #[test]
    fn test_capacity_message() {
        let err = FilterError::CapacityExceeded { capacity: 64 };
        assert!(err.to_string().contains("64"));
        assert_eq!(err.kind(), "capacity_exceeded");
    }
}
