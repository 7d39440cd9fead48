//! Text measurement for layout.
//!
//! Widths come from the renderer's unicode-width based helpers so layout and
//! drawing agree on how many columns a string takes.

use crate::renderer::{char_width, string_width};

/// Column width of a string, saturated to `u16`.
pub fn text_width(s: &str) -> u16 {
    u16::try_from(string_width(s)).unwrap_or(u16::MAX)
}

/// Word-wrap text to `width` columns.
///
/// Breaks at spaces; words longer than the line are split by character.
/// Explicit newlines always break. Empty text yields no lines.
pub fn wrap_text(text: &str, width: u16) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    if width == 0 {
        return vec![text.to_string()];
    }

    let width = width as usize;
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut line_width = 0usize;

        for word in paragraph.split(' ') {
            let word_width = string_width(word);
            let sep = usize::from(!line.is_empty());

            if line_width + sep + word_width <= width {
                if sep == 1 {
                    line.push(' ');
                }
                line.push_str(word);
                line_width += sep + word_width;
                continue;
            }

            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
                line_width = 0;
            }

            // Hard-split words that can't fit on a line of their own
            for c in word.chars() {
                let w = char_width(c);
                if line_width + w > width && !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                    line_width = 0;
                }
                line.push(c);
                line_width += w;
            }
        }

        lines.push(line);
    }

    lines
}

/// Number of lines `text` occupies when wrapped to `width`.
pub fn measure_text_height(text: &str, width: u16) -> u16 {
    u16::try_from(wrap_text(text, width).len()).unwrap_or(u16::MAX)
}

/// Truncate text to `width` columns, ending in an ellipsis when cut.
pub fn truncate_text(text: &str, width: u16) -> String {
    let width = width as usize;
    if string_width(text) <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = char_width(c);
        if used + w > width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_at_spaces() {
        assert_eq!(
            wrap_text("I am working on this website", 12),
            vec!["I am working", "on this", "website"]
        );
    }

    #[test]
    fn test_wrap_fits_on_one_line() {
        assert_eq!(wrap_text("AJClifton", 80), vec!["AJClifton"]);
        assert_eq!(measure_text_height("AJClifton", 80), 1);
    }

    #[test]
    fn test_wrap_splits_long_words() {
        assert_eq!(wrap_text("abcdefgh", 3), vec!["abc", "def", "gh"]);
    }

    #[test]
    fn test_wrap_keeps_newlines() {
        assert_eq!(wrap_text("a\nb", 10), vec!["a", "b"]);
        assert!(wrap_text("", 10).is_empty());
    }

    #[test]
    fn test_wrap_wide_chars() {
        assert_eq!(wrap_text("日本語", 4), vec!["日本", "語"]);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate_text("hello world", 20), "hello world");
        assert_eq!(truncate_text("hello world", 6), "hello…");
        assert_eq!(truncate_text("hello", 0), "");
        assert_eq!(text_width("日本"), 4);
    }
}
