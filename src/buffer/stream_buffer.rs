//! Stream Buffer: accumulates the fragments of one streaming message.
//!
//! The buffer enforces sequence ordering, freezes on finalize and keeps
//! track of what changed since the display last looked at it. It never
//! triggers a render itself; the consumer decides the cadence by checking
//! [`StreamBuffer::is_dirty`] and taking a [`Snapshot`].

use super::error::StreamError;
use super::fragment::Fragment;
use bitflags::bitflags;
use log::{debug, info, warn};

/// How strictly sequence indices must follow one another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderingPolicy {
    /// Every fragment must carry exactly the previous index plus one.
    #[default]
    Strict,
    /// Any index greater than the last applied one is accepted.
    AllowGaps,
}

/// Configuration for a [`StreamBuffer`].
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Ordering rule applied to incoming fragments.
    pub ordering: OrderingPolicy,
    /// Index expected for the first fragment of the message.
    pub first_index: u64,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            ordering: OrderingPolicy::Strict,
            first_index: 0,
        }
    }
}

bitflags! {
    /// What changed since the dirty flags were last cleared.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DirtyFlags: u8 {
        /// New text was appended.
        const TEXT = 0b0000_0001;
        /// The stream left the streaming state.
        const STATE = 0b0000_0010;
    }
}

/// Lifecycle state of a message stream.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StreamState {
    /// More fragments are expected.
    #[default]
    Streaming,
    /// The producer signalled completion (or cancelled).
    Finished,
    /// The producer signalled an error; accumulated text is kept.
    Failed {
        /// Reason reported by the producer.
        reason: String,
    },
}

impl StreamState {
    /// Whether more fragments are still expected.
    #[inline]
    pub const fn is_streaming(&self) -> bool {
        matches!(self, Self::Streaming)
    }
}

/// Render-ready view of a stream buffer at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// All text applied so far.
    pub text: String,
    /// Whether the streaming indicator should be shown.
    pub is_streaming: bool,
    /// Failure reason if the stream ended with an error.
    pub failure: Option<String>,
}

/// Result of a successful append.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// The fragment was applied.
    Applied {
        /// Number of bytes added to the text.
        bytes: usize,
    },
    /// The fragment had already been applied and was ignored.
    Duplicate,
}

/// Accumulates the text of a single streaming message.
///
/// A buffer starts in the streaming state with no text. Fragments are
/// applied in sequence order until [`finalize`](Self::finalize) or
/// [`fail`](Self::fail) freezes it.
#[derive(Debug, Default)]
pub struct StreamBuffer {
    /// Ordering configuration.
    config: StreamConfig,
    /// Concatenated text of all applied fragments.
    text: String,
    /// Current lifecycle state.
    state: StreamState,
    /// Index of the last applied fragment.
    last_index: Option<u64>,
    /// Changes not yet observed by the display.
    dirty: DirtyFlags,
}

impl StreamBuffer {
    /// Create an empty buffer with strict ordering starting at index 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty buffer with custom configuration.
    pub fn with_config(config: StreamConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Get the configuration.
    pub const fn config(&self) -> &StreamConfig {
        &self.config
    }

    /// Index the next fragment must carry under the current policy.
    fn next_expected(&self) -> u64 {
        self.last_index
            .map_or(self.config.first_index, |last| last.saturating_add(1))
    }

    /// Apply a fragment.
    ///
    /// Fragments whose index is at or below the last applied index are
    /// ignored and reported as [`AppendOutcome::Duplicate`].
    ///
    /// # Errors
    ///
    /// - [`StreamError::BufferClosed`] if the buffer has been finalized.
    /// - [`StreamError::OutOfOrderFragment`] if the index skips ahead under
    ///   [`OrderingPolicy::Strict`], or precedes `first_index`.
    pub fn append(&mut self, fragment: impl Into<Fragment>) -> Result<AppendOutcome, StreamError> {
        let (index, text) = fragment.into().into_parts();

        if !self.state.is_streaming() {
            warn!("append of fragment {index} after stream was closed");
            return Err(StreamError::BufferClosed);
        }

        if self.last_index.is_some_and(|last| index <= last) {
            debug!("ignoring duplicate fragment {index}");
            return Ok(AppendOutcome::Duplicate);
        }

        let expected = self.next_expected();
        let in_order = match self.config.ordering {
            OrderingPolicy::Strict => index == expected,
            OrderingPolicy::AllowGaps => index >= expected,
        };
        if !in_order {
            warn!("out-of-order fragment: expected {expected}, received {index}");
            return Err(StreamError::OutOfOrderFragment {
                expected,
                received: index,
            });
        }

        let bytes = text.len();
        self.text.push_str(&text);
        self.last_index = Some(index);
        self.dirty |= DirtyFlags::TEXT;
        debug!("applied fragment {index} ({bytes} bytes)");

        Ok(AppendOutcome::Applied { bytes })
    }

    /// Mark the stream complete.
    ///
    /// Idempotent; also the way to cancel a stream early.
    pub fn finalize(&mut self) {
        self.close(StreamState::Finished);
    }

    /// Finalize the stream because the producer hit an error.
    ///
    /// Text accumulated so far stays visible. Has no effect if the stream
    /// is already closed.
    pub fn fail(&mut self, reason: impl Into<String>) {
        self.close(StreamState::Failed {
            reason: reason.into(),
        });
    }

    fn close(&mut self, terminal: StreamState) {
        if !self.state.is_streaming() {
            return;
        }
        info!(
            "stream closed after {} bytes: {:?}",
            self.text.len(),
            terminal
        );
        self.state = terminal;
        self.dirty |= DirtyFlags::STATE;
    }

    /// Get the current text and streaming flag.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            text: self.text.clone(),
            is_streaming: self.state.is_streaming(),
            failure: match &self.state {
                StreamState::Failed { reason } => Some(reason.clone()),
                _ => None,
            },
        }
    }

    /// Take a snapshot and clear the dirty flags, if anything changed.
    pub fn take_snapshot(&mut self) -> Option<Snapshot> {
        self.take_changes().map(|(_, snapshot)| snapshot)
    }

    /// Like [`take_snapshot`](Self::take_snapshot), but also returns which
    /// kinds of change were pending so the display can skip re-layout when
    /// only the streaming state moved.
    pub fn take_changes(&mut self) -> Option<(DirtyFlags, Snapshot)> {
        if !self.is_dirty() {
            return None;
        }
        let flags = self.dirty;
        self.clear_dirty();
        Some((flags, self.snapshot()))
    }

    /// Check whether anything changed since the last clear.
    #[inline]
    pub const fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Get the pending dirty flags.
    #[inline]
    pub const fn dirty_flags(&self) -> DirtyFlags {
        self.dirty
    }

    /// Clear the dirty flags after rendering.
    #[inline]
    pub fn clear_dirty(&mut self) {
        self.dirty = DirtyFlags::empty();
    }

    /// Get the accumulated text.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length of the accumulated text in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Check if no text has been accumulated.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Whether more fragments are expected.
    #[inline]
    pub const fn is_streaming(&self) -> bool {
        self.state.is_streaming()
    }

    /// Get the lifecycle state.
    pub const fn state(&self) -> &StreamState {
        &self.state
    }

    /// Index of the last applied fragment, if any.
    pub const fn last_index(&self) -> Option<u64> {
        self.last_index
    }
}
