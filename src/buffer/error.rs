//! Errors raised when a producer violates the stream protocol.

use thiserror::Error;

/// Errors returned by [`StreamBuffer::append`](super::StreamBuffer::append).
///
/// Duplicate delivery is not an error; it is reported as
/// [`AppendOutcome::Duplicate`](super::AppendOutcome::Duplicate).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    /// A fragment arrived with a gap in its sequence index.
    ///
    /// The buffer never guesses the missing content.
    #[error("out-of-order fragment: expected index {expected}, received {received}")]
    OutOfOrderFragment {
        /// The index the buffer would have accepted.
        expected: u64,
        /// The index that was delivered.
        received: u64,
    },

    /// A fragment was appended after the stream was finalized.
    #[error("stream buffer is closed")]
    BufferClosed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = StreamError::OutOfOrderFragment {
            expected: 1,
            received: 3,
        };
        assert_eq!(
            err.to_string(),
            "out-of-order fragment: expected index 1, received 3"
        );
        assert_eq!(StreamError::BufferClosed.to_string(), "stream buffer is closed");
    }
}
