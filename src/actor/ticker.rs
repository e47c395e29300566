//! Ticker Actor: the frame clock behind stream coalescing.
//!
//! Fragments may arrive hundreds of times per second, but a message is
//! only sampled once per tick, so every fragment published between two
//! ticks collapses into a single snapshot. The tick number also drives
//! the caret blink phase.

use crossbeam_channel::{bounded, Receiver, Sender};
use log::debug;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// One frame of the presenter's clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Frame number; fed to [`Caret::visible_at`](crate::widget::Caret::visible_at).
    pub frame: u64,
    /// Time since the first tick was scheduled.
    pub elapsed: Duration,
}

/// Frame clock running on its own thread.
///
/// At most two ticks wait for the presenter. When it falls behind, the
/// frames it missed are dropped rather than replayed, so a slow terminal
/// costs blink smoothness, never a backlog of redundant stream polls.
pub struct TickerActor {
    /// Handle to the ticker thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
    /// Receiver for tick events.
    tick_rx: Receiver<Tick>,
    /// Time between ticks.
    interval: Duration,
}

impl TickerActor {
    /// Start the clock. `interval` is the time between snapshots of the
    /// stream (16ms samples at ~60 FPS).
    ///
    /// # Errors
    ///
    /// Returns an error if the OS fails to spawn the ticker thread.
    pub fn spawn(interval: Duration) -> io::Result<Self> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        // Two slots: one tick being handled, one pending.
        let (tick_tx, tick_rx) = bounded(2);

        let handle = thread::Builder::new()
            .name("flywheel-stream-ticker".to_string())
            .spawn(move || {
                Self::run_loop(&tick_tx, &shutdown_clone, interval);
            })?;

        Ok(Self {
            handle: Some(handle),
            shutdown,
            tick_rx,
            interval,
        })
    }

    /// Receiver the presenter waits on between frames.
    #[inline]
    pub const fn receiver(&self) -> &Receiver<Tick> {
        &self.tick_rx
    }

    /// Time between ticks.
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Stop emitting ticks.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Stop the ticker and wait for its thread to finish.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    fn run_loop(tick_tx: &Sender<Tick>, shutdown: &AtomicBool, interval: Duration) {
        let start = Instant::now();
        let mut frame = 0u64;
        let mut next_tick = start + interval;
        let mut skipped = 0u64;

        while !shutdown.load(Ordering::Relaxed) {
            let now = Instant::now();
            if now < next_tick {
                thread::sleep((next_tick - now).min(Duration::from_millis(1)));
                continue;
            }

            let tick = Tick {
                frame,
                elapsed: now - start,
            };
            // Presenter is still drawing the previous frame.
            if tick_tx.try_send(tick).is_err() {
                skipped += 1;
            }

            frame += 1;
            next_tick += interval;
            if next_tick < now {
                next_tick = now + interval;
            }
        }

        debug!("ticker stopped after {frame} frames ({skipped} skipped)");
    }
}

impl Drop for TickerActor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_basic() {
        let ticker = TickerActor::spawn(Duration::from_millis(10)).unwrap();

        let tick = ticker.receiver().recv_timeout(Duration::from_millis(500));
        assert_eq!(tick.unwrap().frame, 0);

        let tick2 = ticker.receiver().recv_timeout(Duration::from_millis(500));
        assert!(tick2.unwrap().frame >= 1);

        ticker.join();
    }

    #[test]
    fn test_slow_receiver_does_not_queue() {
        let ticker = TickerActor::spawn(Duration::from_millis(1)).unwrap();
        thread::sleep(Duration::from_millis(50));

        // At most the channel capacity is waiting.
        assert!(ticker.receiver().len() <= 2);
        ticker.join();
    }

    #[test]
    fn test_frames_increase_across_skips() {
        let ticker = TickerActor::spawn(Duration::from_millis(1)).unwrap();
        assert_eq!(ticker.interval(), Duration::from_millis(1));

        let mut last = None;
        for _ in 0..5 {
            // Fall behind so the ticker has to drop frames.
            thread::sleep(Duration::from_millis(10));
            let tick = ticker
                .receiver()
                .recv_timeout(Duration::from_millis(500))
                .unwrap();
            if let Some(prev) = last {
                assert!(tick.frame > prev);
            }
            last = Some(tick.frame);
        }
        ticker.join();
    }
}
