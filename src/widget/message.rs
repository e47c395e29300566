//! Streaming Message: renders a snapshot with its caret.
//!
//! The widget keeps the wrapped lines of the last snapshot it was given
//! and only re-wraps when the text changed. Rendering is a pure function
//! of that state and the frame number; writing to a terminal is separate.
//!
//! ```rust,ignore
//! let mut message = StreamingMessage::new(MessageConfig::default());
//! if let Some((flags, snapshot)) = reader.poll_changes() {
//!     message.update(&snapshot, flags);
//! }
//! let frame = message.render(tick.frame);
//! message.write_to(&frame, &mut std::io::stdout())?;
//! ```

use super::caret::{Caret, CaretStyle};
use super::wrap::{display_width, wrap};
use crate::buffer::{DirtyFlags, Snapshot};
use crossterm::{
    cursor, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use std::io::{self, Write};

/// Configuration for the streaming message widget.
#[derive(Debug, Clone)]
pub struct MessageConfig {
    /// Wrap width in columns (0 disables wrapping).
    pub width: u16,
    /// Caret glyph.
    pub caret: CaretStyle,
    /// Caret blink half-period in frames (0 = steady).
    pub blink_frames: u64,
    /// Caret colour.
    pub caret_fg: Color,
    /// Colour of the failure notice shown under a failed stream.
    pub failure_fg: Color,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            width: 80,
            caret: CaretStyle::Block,
            blink_frames: 30,
            caret_fg: Color::Rgb {
                r: 0,
                g: 200,
                b: 100,
            },
            failure_fg: Color::Rgb {
                r: 220,
                g: 80,
                b: 80,
            },
        }
    }
}

/// One rendered frame of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    /// Wrapped text lines.
    pub lines: Vec<String>,
    /// Caret position as `(column, row)`, present only when drawn.
    pub caret: Option<(u16, u16)>,
    /// Caret glyph.
    pub caret_glyph: char,
    /// Failure reason, if the stream ended with an error.
    pub failure: Option<String>,
}

/// Display-side view of one streaming message.
#[derive(Debug)]
pub struct StreamingMessage {
    /// Configuration.
    config: MessageConfig,
    /// Caret timing.
    caret: Caret,
    /// Last snapshot applied.
    snapshot: Snapshot,
    /// Wrapped lines of `snapshot.text`.
    lines: Vec<String>,
    /// Rows below the first row touched by the previous write.
    drawn_rows: u16,
}

impl StreamingMessage {
    /// Create an empty, streaming message.
    pub fn new(config: MessageConfig) -> Self {
        Self {
            caret: Caret::new(config.caret, config.blink_frames),
            config,
            snapshot: Snapshot {
                text: String::new(),
                is_streaming: true,
                failure: None,
            },
            lines: vec![String::new()],
            drawn_rows: 0,
        }
    }

    /// Apply a snapshot. Lines are re-wrapped only if `flags` has `TEXT`.
    pub fn update(&mut self, snapshot: &Snapshot, flags: DirtyFlags) {
        if flags.contains(DirtyFlags::TEXT) {
            self.lines = wrap(&snapshot.text, self.config.width);
        }
        self.snapshot.clone_from(snapshot);
    }

    /// Change the wrap width, re-wrapping if it differs.
    pub fn set_width(&mut self, width: u16) {
        if width != self.config.width {
            self.config.width = width;
            self.lines = wrap(&self.snapshot.text, width);
        }
    }

    /// Whether the last applied snapshot was still streaming.
    pub const fn is_streaming(&self) -> bool {
        self.snapshot.is_streaming
    }

    /// Wrapped lines of the current text.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Render the message for the given frame.
    pub fn render(&self, frame: u64) -> RenderedMessage {
        let caret = self
            .caret
            .visible_at(frame, self.snapshot.is_streaming)
            .then(|| self.caret_position());

        RenderedMessage {
            lines: self.lines.clone(),
            caret,
            caret_glyph: self.caret.style().glyph(),
            failure: self.snapshot.failure.clone(),
        }
    }

    /// Cell right after the last character; wraps to a new row when the
    /// last line is full.
    fn caret_position(&self) -> (u16, u16) {
        let last_row = self.lines.len().saturating_sub(1);
        let col = self.lines.last().map_or(0, |line| display_width(line));
        let width = usize::from(self.config.width);

        let (col, row) = if width > 0 && col >= width {
            (0, last_row + 1)
        } else {
            (col, last_row)
        };
        (
            u16::try_from(col).unwrap_or(u16::MAX),
            u16::try_from(row).unwrap_or(u16::MAX),
        )
    }

    /// Draw a rendered frame, replacing the previous one in place.
    ///
    /// Assumes the cursor is where the previous call left it.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub fn write_to<W: Write>(&mut self, rendered: &RenderedMessage, out: &mut W) -> io::Result<()> {
        if self.drawn_rows > 0 {
            queue!(out, cursor::MoveToPreviousLine(self.drawn_rows))?;
        } else {
            queue!(out, cursor::MoveToColumn(0))?;
        }
        queue!(out, Clear(ClearType::FromCursorDown))?;

        let mut rows = rendered.lines.len().max(1);
        for (i, line) in rendered.lines.iter().enumerate() {
            if i > 0 {
                queue!(out, Print("\r\n"))?;
            }
            queue!(out, Print(line))?;
        }

        if let Some((_, row)) = rendered.caret {
            if usize::from(row) >= rendered.lines.len() {
                queue!(out, Print("\r\n"))?;
                rows += 1;
            }
            queue!(
                out,
                SetForegroundColor(self.config.caret_fg),
                Print(rendered.caret_glyph),
                ResetColor
            )?;
        }

        if let Some(reason) = &rendered.failure {
            queue!(
                out,
                Print("\r\n"),
                SetForegroundColor(self.config.failure_fg),
                Print(format!("[stream interrupted: {reason}]")),
                ResetColor
            )?;
            rows += 1;
        }

        out.flush()?;
        self.drawn_rows = u16::try_from(rows - 1).unwrap_or(u16::MAX);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(text: &str, is_streaming: bool) -> Snapshot {
        Snapshot {
            text: text.to_string(),
            is_streaming,
            failure: None,
        }
    }

    fn steady(width: u16) -> StreamingMessage {
        StreamingMessage::new(MessageConfig {
            width,
            blink_frames: 0,
            ..MessageConfig::default()
        })
    }

    #[test]
    fn test_caret_follows_text() {
        let mut message = steady(10);
        message.update(&snapshot("Hello", true), DirtyFlags::TEXT);

        let frame = message.render(0);
        assert_eq!(frame.lines, vec!["Hello"]);
        assert_eq!(frame.caret, Some((5, 0)));
        assert_eq!(frame.caret_glyph, '▋');
    }

    #[test]
    fn test_caret_wraps_on_full_line() {
        let mut message = steady(5);
        message.update(&snapshot("Hello", true), DirtyFlags::TEXT);
        assert_eq!(message.render(0).caret, Some((0, 1)));
    }

    #[test]
    fn test_caret_gone_on_finalize_frame() {
        let mut message = steady(10);
        message.update(&snapshot("Hello", true), DirtyFlags::TEXT);
        assert!(message.render(7).caret.is_some());

        message.update(&snapshot("Hello", false), DirtyFlags::STATE);
        let frame = message.render(8);
        assert_eq!(frame.caret, None);
        assert_eq!(frame.lines, vec!["Hello"]);
    }

    #[test]
    fn test_state_only_update_keeps_lines() {
        let mut message = steady(10);
        message.update(&snapshot("abc", true), DirtyFlags::TEXT);
        message.update(&snapshot("abc", false), DirtyFlags::STATE);
        assert_eq!(message.lines(), ["abc"]);
        assert!(!message.is_streaming());
    }

    #[test]
    fn test_set_width_rewraps() {
        let mut message = steady(10);
        message.update(&snapshot("abcdef", true), DirtyFlags::TEXT);
        message.set_width(3);
        assert_eq!(message.lines(), ["abc", "def"]);
    }

    #[test]
    fn test_write_to_emits_text_and_caret() {
        let mut message = steady(20);
        message.update(&snapshot("one\ntwo", true), DirtyFlags::TEXT);
        let frame = message.render(0);

        let mut out = Vec::new();
        message.write_to(&frame, &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("one\r\ntwo"));
        assert!(out.contains('▋'));
        assert_eq!(message.drawn_rows, 1);
    }

    #[test]
    fn test_write_to_shows_failure() {
        let mut message = steady(20);
        message.update(
            &Snapshot {
                text: "par".to_string(),
                is_streaming: false,
                failure: Some("timeout".to_string()),
            },
            DirtyFlags::all(),
        );
        let frame = message.render(0);

        let mut out = Vec::new();
        message.write_to(&frame, &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("par"));
        assert!(out.contains("[stream interrupted: timeout]"));
        assert!(!out.contains('▋'));
    }
}
