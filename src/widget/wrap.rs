//! Line wrapping by terminal display width.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Split `text` into display lines no wider than `width` columns.
///
/// Hard newlines always start a new line. Wrapping happens at grapheme
/// boundaries, so combining sequences and emoji are never split. A
/// grapheme wider than `width` gets a line of its own. With `width == 0`
/// only hard newlines break lines.
pub fn wrap(text: &str, width: u16) -> Vec<String> {
    let width = usize::from(width);
    let mut lines = Vec::new();

    for logical in text.split('\n') {
        let logical = logical.strip_suffix('\r').unwrap_or(logical);
        if width == 0 {
            lines.push(logical.to_owned());
            continue;
        }

        let mut current = String::new();
        let mut current_width = 0;
        for grapheme in logical.graphemes(true) {
            let w = grapheme.width();
            if current_width + w > width && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push_str(grapheme);
            current_width += w;
        }
        lines.push(current);
    }

    lines
}

/// Display width of a line in terminal columns.
#[inline]
pub fn display_width(line: &str) -> usize {
    line.width()
}
