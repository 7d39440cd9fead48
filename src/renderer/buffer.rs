//! FrameBuffer and drawing primitives.
//!
//! The FrameBuffer is a 2D grid of Cells that represents what should be
//! displayed on the terminal. Pages draw into it; renderers read from it.
//!
//! - **Flat storage**: `Vec<Cell>` with row-major indexing.
//! - **Wide characters**: emoji and CJK take two cells; the second is a
//!   continuation marker (`char == 0`).
//! - **Hyperlinks**: cells carry a link id into the buffer's link table so
//!   renderers can wrap runs in OSC 8.

use unicode_width::UnicodeWidthChar;

use crate::types::{Attr, Cell, ClipRect, Rgba};

/// A 2D buffer of terminal cells.
///
/// Uses flat storage with row-major indexing: `index = y * width + x`
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
    links: Vec<String>,
}

impl FrameBuffer {
    /// Create a new buffer filled with default cells.
    pub fn new(width: u16, height: u16) -> Self {
        Self::with_background(width, height, Rgba::TERMINAL_DEFAULT)
    }

    /// Create a new buffer with a specific background color.
    pub fn with_background(width: u16, height: u16, bg: Rgba) -> Self {
        let size = width as usize * height as usize;
        let cell = Cell {
            bg,
            ..Cell::default()
        };
        Self {
            width,
            height,
            cells: vec![cell; size],
            links: Vec::new(),
        }
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Get the full buffer bounds as a ClipRect.
    #[inline]
    pub fn bounds(&self) -> ClipRect {
        ClipRect::new(0, 0, self.width, self.height)
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    #[inline]
    pub fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    /// Get a cell reference (returns None if out of bounds).
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if self.in_bounds(x, y) {
            Some(&self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    #[inline]
    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            Some(&mut self.cells[idx])
        } else {
            None
        }
    }

    /// URL for a cell's link id, if any.
    pub fn link_url(&self, id: u16) -> Option<&str> {
        if id == 0 {
            return None;
        }
        self.links.get(id as usize - 1).map(String::as_str)
    }

    // =========================================================================
    // Drawing Primitives
    // =========================================================================

    /// Set a single cell with optional clipping.
    ///
    /// `bg: None` keeps the cell's existing background. Returns true if the
    /// cell was set.
    pub fn set_cell(
        &mut self,
        x: u16,
        y: u16,
        char: u32,
        fg: Rgba,
        bg: Option<Rgba>,
        attrs: Attr,
        clip: Option<&ClipRect>,
    ) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        if let Some(clip) = clip {
            if !clip.contains(x, y) {
                return false;
            }
        }

        let idx = self.index(x, y);
        let cell = &mut self.cells[idx];
        cell.char = char;
        cell.fg = fg;
        if let Some(bg) = bg {
            cell.bg = bg;
        }
        cell.attrs = attrs;
        cell.link = 0;
        true
    }

    /// Fill a rectangle with a background color, blanking its characters.
    pub fn fill_rect(&mut self, rect: ClipRect, bg: Rgba) {
        let x2 = rect.x.saturating_add(rect.width).min(self.width);
        let y2 = rect.y.saturating_add(rect.height).min(self.height);

        for row in rect.y..y2 {
            for col in rect.x..x2 {
                let idx = self.index(col, row);
                self.cells[idx] = Cell {
                    bg,
                    ..Cell::default()
                };
            }
        }
    }

    /// Draw text at a position.
    ///
    /// Returns the number of columns used (handles wide characters).
    pub fn draw_text(
        &mut self,
        x: u16,
        y: u16,
        text: &str,
        fg: Rgba,
        bg: Option<Rgba>,
        attrs: Attr,
        clip: Option<&ClipRect>,
    ) -> u16 {
        let mut col = x;

        for ch in text.chars() {
            if col >= self.width {
                break;
            }

            let width = char_width(ch);
            if width == 0 {
                continue;
            }

            if self.set_cell(col, y, ch as u32, fg, bg, attrs, clip) && width == 2 {
                let in_clip = clip.is_none_or(|c| c.contains(col + 1, y));
                if in_clip {
                    if let Some(next) = self.get_mut(col + 1, y) {
                        next.char = 0;
                        next.fg = fg;
                        if let Some(bg) = bg {
                            next.bg = bg;
                        }
                        next.attrs = attrs;
                        next.link = 0;
                    }
                }
            }

            col = col.saturating_add(width as u16);
        }

        col.saturating_sub(x)
    }

    /// Draw text centered within `width` columns starting at `x`.
    pub fn draw_text_centered(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        text: &str,
        fg: Rgba,
        bg: Option<Rgba>,
        attrs: Attr,
    ) -> u16 {
        let text_width = string_width(text);
        let offset = (width as usize).saturating_sub(text_width) / 2;
        self.draw_text(x + offset as u16, y, text, fg, bg, attrs, None)
    }

    /// Draw text tagged as a hyperlink to `url`.
    pub fn draw_link(
        &mut self,
        x: u16,
        y: u16,
        text: &str,
        url: &str,
        fg: Rgba,
        attrs: Attr,
    ) -> u16 {
        let id = match self.links.iter().position(|u| u == url) {
            Some(pos) => pos + 1,
            None => {
                self.links.push(url.to_string());
                self.links.len()
            }
        };
        let id = u16::try_from(id).unwrap_or(0);

        let used = self.draw_text(x, y, text, fg, None, attrs, None);
        for col in x..x.saturating_add(used).min(self.width) {
            if let Some(cell) = self.get_mut(col, y) {
                cell.link = id;
            }
        }
        used
    }

    // =========================================================================
    // Plain Text
    // =========================================================================

    /// Row contents as plain text (continuation cells skipped).
    pub fn row_text(&self, y: u16) -> String {
        if y >= self.height {
            return String::new();
        }
        (0..self.width)
            .filter_map(|x| self.get(x, y))
            .filter(|cell| cell.char != 0)
            .filter_map(|cell| char::from_u32(cell.char))
            .collect()
    }

    /// Whole buffer as plain text: trailing spaces trimmed per row, trailing
    /// blank rows dropped.
    pub fn to_plain_text(&self) -> String {
        let rows: Vec<String> = (0..self.height)
            .map(|y| self.row_text(y).trim_end().to_string())
            .collect();
        let last = rows.iter().rposition(|r| !r.is_empty()).map_or(0, |i| i + 1);
        rows[..last].join("\n")
    }

    /// Find the first cell position where `needle` starts on a single row.
    pub fn find_text(&self, needle: &str) -> Option<(u16, u16)> {
        (0..self.height).find_map(|y| {
            let row = self.row_text(y);
            row.find(needle)
                .map(|byte| (string_width(&row[..byte]) as u16, y))
        })
    }
}

// =============================================================================
// Text width
// =============================================================================

/// Display width of a character in terminal columns (0, 1 or 2).
#[inline]
pub fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}

/// Display width of a string in terminal columns.
pub fn string_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_text_and_read_back() {
        let mut buf = FrameBuffer::new(20, 3);
        let used = buf.draw_text(2, 1, "hello", Rgba::WHITE, None, Attr::BOLD, None);

        assert_eq!(used, 5);
        assert_eq!(buf.row_text(1), "  hello             ");
        assert_eq!(buf.get(2, 1).unwrap().attrs, Attr::BOLD);
        assert_eq!(buf.find_text("llo"), Some((4, 1)));
    }

    #[test]
    fn test_draw_text_clips_at_edge() {
        let mut buf = FrameBuffer::new(4, 1);
        let used = buf.draw_text(2, 0, "abcdef", Rgba::WHITE, None, Attr::NONE, None);
        assert_eq!(used, 2);
        assert_eq!(buf.row_text(0), "  ab");
    }

    #[test]
    fn test_wide_char_continuation() {
        let mut buf = FrameBuffer::new(6, 1);
        let used = buf.draw_text(0, 0, "日本", Rgba::WHITE, None, Attr::NONE, None);

        assert_eq!(used, 4);
        assert_eq!(buf.get(1, 0).unwrap().char, 0);
        assert_eq!(buf.row_text(0), "日本  ");
        assert_eq!(buf.find_text("本"), Some((2, 0)));
    }

    #[test]
    fn test_clip_rect_respected() {
        let mut buf = FrameBuffer::new(10, 1);
        let clip = ClipRect::new(0, 0, 3, 1);
        buf.draw_text(0, 0, "abcdef", Rgba::WHITE, None, Attr::NONE, Some(&clip));
        assert_eq!(buf.to_plain_text(), "abc");
    }

    #[test]
    fn test_background_kept_when_none() {
        let bg = Rgba::rgb(39, 39, 42);
        let mut buf = FrameBuffer::with_background(5, 1, bg);
        buf.draw_text(0, 0, "x", Rgba::WHITE, None, Attr::NONE, None);
        assert_eq!(buf.get(0, 0).unwrap().bg, bg);
    }

    #[test]
    fn test_centered_text() {
        let mut buf = FrameBuffer::new(11, 1);
        buf.draw_text_centered(0, 0, 11, "abc", Rgba::WHITE, None, Attr::NONE);
        assert_eq!(buf.find_text("abc"), Some((4, 0)));
    }

    #[test]
    fn test_links_share_ids_per_url() {
        let mut buf = FrameBuffer::new(30, 2);
        buf.draw_link(0, 0, "one", "https://a.example", Rgba::WHITE, Attr::NONE);
        buf.draw_link(0, 1, "two", "https://b.example", Rgba::WHITE, Attr::NONE);
        buf.draw_link(10, 0, "again", "https://a.example", Rgba::WHITE, Attr::NONE);

        let first = buf.get(0, 0).unwrap().link;
        assert_eq!(buf.get(10, 0).unwrap().link, first);
        assert_ne!(buf.get(0, 1).unwrap().link, first);
        assert_eq!(buf.link_url(first), Some("https://a.example"));
        assert_eq!(buf.get(5, 0).unwrap().link, 0);
        assert_eq!(buf.link_url(0), None);
    }

    #[test]
    fn test_plain_text_trims() {
        let mut buf = FrameBuffer::new(8, 4);
        buf.draw_text(0, 1, "ab", Rgba::WHITE, None, Attr::NONE, None);
        assert_eq!(buf.to_plain_text(), "\nab");
    }

    #[test]
    fn test_fill_rect_resets_cells() {
        let mut buf = FrameBuffer::new(4, 2);
        buf.draw_text(0, 0, "abcd", Rgba::WHITE, None, Attr::BOLD, None);
        let bg = Rgba::rgb(1, 2, 3);
        buf.fill_rect(ClipRect::new(1, 0, 2, 5), bg);

        assert_eq!(buf.row_text(0), "a  d");
        assert_eq!(buf.get(1, 0).unwrap().bg, bg);
        assert_eq!(buf.get(1, 1).unwrap().bg, bg);
        assert_eq!(buf.get(1, 0).unwrap().attrs, Attr::NONE);
    }

    #[test]
    fn test_string_width() {
        assert_eq!(string_width("abc"), 3);
        assert_eq!(string_width("日本"), 4);
        assert_eq!(string_width("e\u{301}"), 1);
    }
}
