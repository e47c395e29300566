//! Buffer module: Ordered accumulation of streamed message text.
//!
//! This module contains:
//! - [`Fragment`]: One sequenced text delta from the producer
//! - [`StreamBuffer`]: The per-message accumulator with dirty tracking
//! - [`Snapshot`]: An immutable render-ready view of a buffer
//! - [`StreamError`]: Protocol violations reported to the producer

mod error;
mod fragment;
mod stream_buffer;

pub use error::StreamError;
pub use fragment::Fragment;
pub use stream_buffer::{
    AppendOutcome, DirtyFlags, OrderingPolicy, Snapshot, StreamBuffer, StreamConfig, StreamState,
};
