//! Display widgets for streaming messages.
//!
//! This module turns [`Snapshot`](crate::buffer::Snapshot)s into terminal
//! output:
//!
//! - [`Caret`]: blink timing for the "still typing" indicator
//! - [`wrap`]: grapheme-aware wrapping by display width
//! - [`StreamingMessage`]: wrapped text plus caret, drawn with crossterm
//!
//! # Example
//!
//! ```rust,ignore
//! use flywheel_stream::widget::{MessageConfig, StreamingMessage};
//!
//! let mut message = StreamingMessage::new(MessageConfig::default());
//! message.update(&buffer.snapshot(), DirtyFlags::all());
//! let frame = message.render(0);
//! ```

mod caret;
mod message;
mod wrap;

pub use caret::{Caret, CaretStyle};
pub use message::{MessageConfig, RenderedMessage, StreamingMessage};
pub use wrap::{display_width, wrap};
