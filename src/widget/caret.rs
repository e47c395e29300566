//! Caret: the blinking "still typing" indicator.

/// Glyph drawn for the caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaretStyle {
    /// Left half block: ▋
    #[default]
    Block,
    /// Thin vertical bar: │
    Bar,
    /// ASCII underscore: _
    Underscore,
}

impl CaretStyle {
    /// The character drawn for this style.
    pub const fn glyph(self) -> char {
        match self {
            Self::Block => '▋',
            Self::Bar => '│',
            Self::Underscore => '_',
        }
    }
}

/// Blink timing for the caret, in frames.
///
/// Visibility depends only on the frame number and the streaming flag,
/// so the caret disappears in the very frame that sees the stream end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caret {
    style: CaretStyle,
    /// Frames on, then the same number of frames off. Zero disables blinking.
    blink_frames: u64,
}

impl Caret {
    /// Create a caret with the given style and blink half-period.
    pub const fn new(style: CaretStyle, blink_frames: u64) -> Self {
        Self {
            style,
            blink_frames,
        }
    }

    /// The caret style.
    pub const fn style(&self) -> CaretStyle {
        self.style
    }

    /// Whether the caret is drawn on `frame`.
    pub const fn visible_at(&self, frame: u64, is_streaming: bool) -> bool {
        if !is_streaming {
            return false;
        }
        if self.blink_frames == 0 {
            return true;
        }
        (frame / self.blink_frames) % 2 == 0
    }
}

impl Default for Caret {
    /// Roughly a 500ms blink at 60 FPS.
    fn default() -> Self {
        Self::new(CaretStyle::Block, 30)
    }
}
