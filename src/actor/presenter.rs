//! Presenter Actor: Dedicated thread that draws one streaming message.
//!
//! The presenter is the display collaborator: it wakes on every tick,
//! pulls whatever the writer has published since the last frame, and
//! redraws only when the text changed or the caret blinked. It stops
//! right after drawing the first frame that sees the stream closed.

use super::channel::StreamReader;
use super::ticker::TickerActor;
use crate::widget::StreamingMessage;
use log::{debug, info};
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Configuration for the presenter.
#[derive(Debug, Clone)]
pub struct PresenterConfig {
    /// Time between frames.
    pub frame_interval: Duration,
    /// Give up after this many ticks, even if the stream is still open.
    pub max_frames: Option<u64>,
}

impl Default for PresenterConfig {
    fn default() -> Self {
        Self {
            frame_interval: Duration::from_millis(16),
            max_frames: None,
        }
    }
}

/// Counters collected while presenting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PresentStats {
    /// Ticks received.
    pub ticks: u64,
    /// Frames actually drawn.
    pub renders: u64,
    /// Updates received from the writer.
    pub updates: u64,
}

/// Presenter actor handle.
pub struct Presenter<W> {
    /// Handle to the presenter thread.
    handle: Option<JoinHandle<io::Result<(W, PresentStats)>>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
}

impl<W: Write + Send + 'static> Presenter<W> {
    /// Spawn a presenter drawing `message` into `sink`.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS fails to spawn the presenter thread.
    pub fn spawn(
        reader: StreamReader,
        message: StreamingMessage,
        sink: W,
        config: PresenterConfig,
    ) -> io::Result<Self> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let handle = thread::Builder::new()
            .name("flywheel-stream-present".to_string())
            .spawn(move || Self::run_loop(reader, message, sink, &config, &shutdown_clone))?;

        Ok(Self {
            handle: Some(handle),
            shutdown,
        })
    }

    /// Ask the presenter to stop after the current frame.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Wait for the presenter to finish, returning the sink and counters.
    ///
    /// # Errors
    ///
    /// Returns the first write error, or an error if the thread panicked.
    pub fn join(mut self) -> io::Result<(W, PresentStats)> {
        let handle = self
            .handle
            .take()
            .ok_or_else(|| io::Error::other("presenter already joined"))?;
        handle
            .join()
            .map_err(|_| io::Error::other("presenter thread panicked"))?
    }

    fn run_loop(
        mut reader: StreamReader,
        mut message: StreamingMessage,
        mut sink: W,
        config: &PresenterConfig,
        shutdown: &AtomicBool,
    ) -> io::Result<(W, PresentStats)> {
        let ticker = TickerActor::spawn(config.frame_interval)?;
        let wait = config.frame_interval * 4;
        let mut stats = PresentStats::default();
        let mut caret_shown = None;

        while !shutdown.load(Ordering::Relaxed) {
            let Ok(tick) = ticker.receiver().recv_timeout(wait) else {
                continue;
            };
            stats.ticks += 1;

            let mut changed = false;
            if let Some((flags, snapshot)) = reader.poll_changes() {
                message.update(&snapshot, flags);
                changed = true;
            }

            let frame = message.render(tick.frame);
            let caret_visible = frame.caret.is_some();
            if changed || caret_shown != Some(caret_visible) {
                message.write_to(&frame, &mut sink)?;
                stats.renders += 1;
                caret_shown = Some(caret_visible);
                debug!("frame {} drawn ({} lines)", tick.frame, frame.lines.len());
            }

            if !message.is_streaming() {
                break;
            }
            if config.max_frames.is_some_and(|max| stats.ticks >= max) {
                info!("presenter stopped after {} frames with stream open", stats.ticks);
                break;
            }
        }

        ticker.join();
        stats.updates = reader.received();
        Ok((sink, stats))
    }
}

impl<W> Drop for Presenter<W> {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::stream_channel;
    use crate::widget::MessageConfig;

    fn fast_config() -> PresenterConfig {
        PresenterConfig {
            frame_interval: Duration::from_millis(2),
            max_frames: Some(5_000),
        }
    }

    #[test]
    fn test_presents_until_finalized() {
        let (mut writer, reader) = stream_channel();
        let message = StreamingMessage::new(MessageConfig::default());
        let presenter = Presenter::spawn(reader, message, Vec::new(), fast_config()).unwrap();

        for (i, word) in ["Hel", "lo, ", "world"].iter().enumerate() {
            writer.append_text(i as u64, *word).unwrap();
        }
        writer.finalize();

        let (out, stats) = presenter.join().unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Hello, world"));
        assert_eq!(stats.updates, 4);
        assert!(stats.renders >= 1);
        assert!(stats.renders <= stats.ticks);
    }

    #[test]
    fn test_coalesces_burst_into_few_frames() {
        let (mut writer, reader) = stream_channel();
        for i in 0..1_000 {
            writer.append_text(i, "x").unwrap();
        }
        writer.finalize();

        let message = StreamingMessage::new(MessageConfig {
            width: 0,
            ..MessageConfig::default()
        });
        let presenter = Presenter::spawn(reader, message, Vec::new(), fast_config()).unwrap();
        let (out, stats) = presenter.join().unwrap();

        // Everything was already published, so the first tick sees it all.
        assert_eq!(stats.ticks, 1);
        assert_eq!(stats.renders, 1);
        assert_eq!(stats.updates, 1_001);
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains(&"x".repeat(1_000)));
        assert!(!out.contains('▋'));
    }

    #[test]
    fn test_max_frames_stops_open_stream() {
        let (_writer, reader) = stream_channel();
        let message = StreamingMessage::new(MessageConfig::default());
        let config = PresenterConfig {
            frame_interval: Duration::from_millis(1),
            max_frames: Some(3),
        };
        let presenter = Presenter::spawn(reader, message, io::sink(), config).unwrap();
        let (_, stats) = presenter.join().unwrap();
        assert_eq!(stats.ticks, 3);
    }
}
