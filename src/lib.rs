//! # Flywheel Stream
//!
//! Coalescing text buffers for streaming chat messages.
//!
//! An LLM response arrives as a sequence of small text deltas, often far
//! faster than a display can refresh. This crate accumulates those deltas
//! per message, rejects gaps and ignores redelivery, and lets the display
//! pull a complete snapshot once per frame instead of rendering per token.
//!
//! ## Core Concepts
//!
//! - **Ordered fragments**: each delta carries a sequence index
//! - **Dirty flags**: the display renders only when something changed
//! - **Single writer**: the producer and display talk over a channel and
//!   never block each other
//! - **Caret**: the streaming indicator vanishes in the frame that sees
//!   the stream end
//!
//! ## Example
//!
//! ```rust
//! use flywheel_stream::StreamBuffer;
//!
//! let mut buffer = StreamBuffer::new();
//! buffer.append((0, "Hel")).unwrap();
//! buffer.append((1, "lo")).unwrap();
//! assert_eq!(buffer.snapshot().text, "Hello");
//!
//! buffer.finalize();
//! assert!(!buffer.snapshot().is_streaming);
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod buffer;
pub mod widget;

// Re-exports for convenience
pub use actor::{
    stream_channel, stream_channel_with_config, PresentStats, Presenter, PresenterConfig,
    StreamReader, StreamUpdate, StreamWriter, Tick, TickerActor,
};
pub use buffer::{
    AppendOutcome, DirtyFlags, Fragment, OrderingPolicy, Snapshot, StreamBuffer, StreamConfig,
    StreamError, StreamState,
};
pub use widget::{Caret, CaretStyle, MessageConfig, RenderedMessage, StreamingMessage};
