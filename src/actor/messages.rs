//! Message types for actor communication.
//!
//! A [`StreamUpdate`] is the unit the writer publishes to the reader. Each
//! one describes a complete, already-validated mutation, so the reader can
//! never observe a half-applied fragment.

/// A mutation published by a [`StreamWriter`](super::StreamWriter).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamUpdate {
    /// A fragment was applied.
    Text {
        /// Sequence index of the fragment.
        index: u64,
        /// The text that was appended.
        text: String,
    },

    /// The producer finalized the stream.
    Finished,

    /// The producer reported an error, which also finalizes the stream.
    Failed {
        /// Reason reported by the producer.
        reason: String,
    },
}

impl StreamUpdate {
    /// Whether this update ends the stream.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Failed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_updates() {
        assert!(!StreamUpdate::Text { index: 0, text: "a".into() }.is_terminal());
        assert!(StreamUpdate::Finished.is_terminal());
        assert!(StreamUpdate::Failed { reason: "x".into() }.is_terminal());
    }
}
