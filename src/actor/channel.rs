//! Stream channel: single-writer, single-reader view of one message.
//!
//! The writer owns the authoritative [`StreamBuffer`] and publishes every
//! successful mutation as one [`StreamUpdate`]. The reader applies those
//! updates to a mirror buffer whenever the display asks for them. Neither
//! side ever waits on the other.

use super::messages::StreamUpdate;
use crate::buffer::{
    AppendOutcome, DirtyFlags, Fragment, Snapshot, StreamBuffer, StreamConfig, StreamError,
};
use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use log::{debug, error};

/// Failure reason recorded when a writer is dropped mid-stream.
const PRODUCER_DROPPED: &str = "producer dropped";

/// Create a writer/reader pair with default configuration.
pub fn stream_channel() -> (StreamWriter, StreamReader) {
    stream_channel_with_config(StreamConfig::default())
}

/// Create a writer/reader pair with custom configuration.
pub fn stream_channel_with_config(config: StreamConfig) -> (StreamWriter, StreamReader) {
    let (tx, rx) = unbounded();

    let writer = StreamWriter {
        buffer: StreamBuffer::with_config(config.clone()),
        tx,
    };
    let reader = StreamReader {
        rx,
        mirror: StreamBuffer::with_config(config),
        received: 0,
    };

    (writer, reader)
}

/// Producer half of a stream channel.
///
/// Not `Clone`: a message has exactly one producer. Dropping a writer
/// that never finalized fails the stream so the display stops its caret.
#[derive(Debug)]
pub struct StreamWriter {
    /// Authoritative buffer used for validation.
    buffer: StreamBuffer,
    /// Update sender.
    tx: Sender<StreamUpdate>,
}

impl StreamWriter {
    /// Apply a fragment and publish it to the reader.
    ///
    /// # Errors
    ///
    /// Same as [`StreamBuffer::append`]. Nothing is published on error.
    pub fn append(&mut self, fragment: impl Into<Fragment>) -> Result<AppendOutcome, StreamError> {
        let fragment = fragment.into();
        let index = fragment.index();
        let start = self.buffer.len();

        let outcome = self.buffer.append(fragment)?;
        if let AppendOutcome::Applied { .. } = outcome {
            let text = self.buffer.text()[start..].to_owned();
            self.publish(StreamUpdate::Text { index, text });
        }

        Ok(outcome)
    }

    /// Convenience wrapper around [`append`](Self::append).
    ///
    /// # Errors
    ///
    /// Same as [`StreamBuffer::append`].
    pub fn append_text(
        &mut self,
        index: u64,
        text: impl Into<String>,
    ) -> Result<AppendOutcome, StreamError> {
        self.append(Fragment::new(index, text))
    }

    /// Finalize the stream. Idempotent.
    pub fn finalize(&mut self) {
        if self.buffer.is_streaming() {
            self.buffer.finalize();
            self.publish(StreamUpdate::Finished);
        }
    }

    /// Finalize the stream with an error reason. No-op once closed.
    pub fn fail(&mut self, reason: impl Into<String>) {
        if self.buffer.is_streaming() {
            let reason = reason.into();
            self.buffer.fail(reason.clone());
            self.publish(StreamUpdate::Failed { reason });
        }
    }

    /// Whether the stream is still open on the producer side.
    pub const fn is_streaming(&self) -> bool {
        self.buffer.is_streaming()
    }

    /// Index of the last applied fragment.
    pub const fn last_index(&self) -> Option<u64> {
        self.buffer.last_index()
    }

    fn publish(&self, update: StreamUpdate) {
        // A reader that has gone away is not the producer's problem.
        if self.tx.send(update).is_err() {
            debug!("stream reader dropped; update discarded");
        }
    }
}

impl Drop for StreamWriter {
    fn drop(&mut self) {
        self.fail(PRODUCER_DROPPED);
    }
}

/// Consumer half of a stream channel.
#[derive(Debug)]
pub struct StreamReader {
    /// Update receiver.
    rx: Receiver<StreamUpdate>,
    /// Mirror of the writer's buffer, as of the last sync.
    mirror: StreamBuffer,
    /// Number of updates applied so far.
    received: u64,
}

impl StreamReader {
    /// Drain all pending updates into the mirror without blocking.
    ///
    /// Returns `true` if at least one update was applied.
    pub fn sync(&mut self) -> bool {
        let mut applied = false;

        loop {
            match self.rx.try_recv() {
                Ok(update) => {
                    self.apply(update);
                    applied = true;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    // The writer publishes a terminal update when dropped,
                    // so this only matters if that update was never sent.
                    if self.mirror.is_streaming() {
                        self.mirror.fail(PRODUCER_DROPPED);
                        applied = true;
                    }
                    break;
                }
            }
        }

        applied
    }

    fn apply(&mut self, update: StreamUpdate) {
        self.received += 1;
        match update {
            StreamUpdate::Text { index, text } => {
                if let Err(e) = self.mirror.append(Fragment::new(index, text)) {
                    // The writer validated this fragment with the same
                    // policy, so the mirror cannot disagree.
                    error!("mirror rejected fragment {index}: {e}");
                }
            }
            StreamUpdate::Finished => self.mirror.finalize(),
            StreamUpdate::Failed { reason } => self.mirror.fail(reason),
        }
    }

    /// Sync, then take a snapshot if anything changed since the last poll.
    ///
    /// This is the call a frame-paced display makes once per frame.
    pub fn poll(&mut self) -> Option<Snapshot> {
        self.sync();
        self.mirror.take_snapshot()
    }

    /// Like [`poll`](Self::poll), also reporting what changed.
    pub fn poll_changes(&mut self) -> Option<(DirtyFlags, Snapshot)> {
        self.sync();
        self.mirror.take_changes()
    }

    /// Snapshot of the mirror as of the last sync.
    pub fn snapshot(&self) -> Snapshot {
        self.mirror.snapshot()
    }

    /// Whether the mirror has changes the display has not taken yet.
    pub const fn is_dirty(&self) -> bool {
        self.mirror.is_dirty()
    }

    /// Whether the stream was still open as of the last sync.
    pub const fn is_streaming(&self) -> bool {
        self.mirror.is_streaming()
    }

    /// Number of updates received from the writer.
    pub const fn received(&self) -> u64 {
        self.received
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_reader_mirrors_writer() {
        let (mut writer, mut reader) = stream_channel();
        writer.append_text(0, "Hel").unwrap();
        writer.append_text(1, "lo").unwrap();

        // Nothing is visible until the reader syncs.
        assert_eq!(reader.snapshot().text, "");

        let snap = reader.poll().unwrap();
        assert_eq!(snap.text, "Hello");
        assert!(snap.is_streaming);
        assert!(reader.poll().is_none());

        writer.finalize();
        let snap = reader.poll().unwrap();
        assert_eq!(snap.text, "Hello");
        assert!(!snap.is_streaming);
    }

    #[test]
    fn test_rejected_fragments_are_not_published() {
        let (mut writer, mut reader) = stream_channel();
        writer.append_text(0, "A").unwrap();
        assert_eq!(writer.append_text(0, "A"), Ok(AppendOutcome::Duplicate));
        assert!(writer.append_text(2, "C").is_err());

        reader.sync();
        assert_eq!(reader.received(), 1);
        assert_eq!(reader.snapshot().text, "A");
    }

    #[test]
    fn test_finalize_publishes_once() {
        let (mut writer, mut reader) = stream_channel();
        writer.finalize();
        writer.finalize();
        writer.fail("late");

        reader.sync();
        assert_eq!(reader.received(), 1);
        assert_eq!(reader.snapshot().failure, None);
        assert_eq!(writer.append_text(0, "x"), Err(StreamError::BufferClosed));
    }

    #[test]
    fn test_dropped_writer_fails_stream() {
        let (mut writer, mut reader) = stream_channel();
        writer.append_text(0, "partial").unwrap();
        drop(writer);

        let snap = reader.poll().unwrap();
        assert_eq!(snap.text, "partial");
        assert!(!snap.is_streaming);
        assert_eq!(snap.failure.as_deref(), Some(PRODUCER_DROPPED));
    }

    #[test]
    fn test_dropped_reader_does_not_break_writer() {
        let (mut writer, reader) = stream_channel();
        drop(reader);
        assert!(writer.append_text(0, "still fine").is_ok());
        writer.finalize();
        assert!(!writer.is_streaming());
    }

    #[test]
    fn test_cross_thread_stream() {
        let (mut writer, mut reader) = stream_channel();
        let words: Vec<String> = (0..500).map(|i| format!("w{i} ")).collect();
        let expected = words.concat();

        let producer = thread::spawn(move || {
            for (i, word) in words.into_iter().enumerate() {
                writer.append_text(i as u64, word).unwrap();
            }
            writer.finalize();
        });

        let mut polls = 0;
        let mut last = None;
        while reader.is_streaming() {
            if let Some(snap) = reader.poll() {
                // Every observed text is a prefix of the final text.
                assert!(expected.starts_with(&snap.text));
                last = Some(snap);
            }
            polls += 1;
            thread::yield_now();
        }
        producer.join().unwrap();

        let last = last.unwrap();
        assert_eq!(last.text, expected);
        assert!(!last.is_streaming);
        assert!(polls > 0);
    }
}
