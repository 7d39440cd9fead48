//! Output buffering and stateful cell rendering.
//!
//! Writes for a frame accumulate in an [`OutputBuffer`] and go out in one
//! flush. [`StatefulCellRenderer`] remembers what the terminal was last told
//! (position, colors, attributes, open hyperlink) and only emits changes.

use std::borrow::Cow;
use std::io::{self, Write};

use super::ansi;
use crate::types::{Attr, Cell, Rgba};

// =============================================================================
// OutputBuffer
// =============================================================================

/// Accumulates a frame's bytes for a single write.
#[derive(Debug, Default)]
pub struct OutputBuffer {
    data: Vec<u8>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self {
            data: Vec::with_capacity(16 * 1024),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    #[inline]
    pub fn write_str(&mut self, s: &str) {
        self.data.extend_from_slice(s.as_bytes());
    }

    #[inline]
    pub fn write_char(&mut self, c: char) {
        let mut buf = [0u8; 4];
        self.data
            .extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
    }

    /// Write a unicode codepoint; invalid codepoints are dropped.
    #[inline]
    pub fn write_codepoint(&mut self, cp: u32) {
        if let Some(c) = char::from_u32(cp) {
            self.write_char(c);
        }
    }

    /// Hand the accumulated bytes to `writer` and clear.
    pub fn flush_to<W: Write>(&mut self, writer: &mut W) -> io::Result<()> {
        if self.data.is_empty() {
            return Ok(());
        }
        writer.write_all(&self.data)?;
        writer.flush()?;
        self.data.clear();
        Ok(())
    }

    pub fn as_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.data)
    }
}

impl Write for OutputBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.data.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// =============================================================================
// StatefulCellRenderer
// =============================================================================

/// Renders cells while tracking terminal state to minimize output.
#[derive(Debug)]
pub struct StatefulCellRenderer {
    last_x: i32,
    last_y: i32,
    last_fg: Option<Rgba>,
    last_bg: Option<Rgba>,
    last_attrs: Attr,
    last_link: u16,
}

impl StatefulCellRenderer {
    pub fn new() -> Self {
        Self {
            last_x: -1,
            last_y: -1,
            last_fg: None,
            last_bg: None,
            last_attrs: Attr::NONE,
            last_link: 0,
        }
    }

    /// Forget tracked state. Call at the start of each frame.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Render a cell at an absolute position.
    ///
    /// `link_url` is the URL behind `cell.link`, resolved by the caller from
    /// the frame's link table.
    pub fn render_cell(
        &mut self,
        output: &mut OutputBuffer,
        x: u16,
        y: u16,
        cell: &Cell,
        link_url: Option<&str>,
    ) -> io::Result<()> {
        // Wide-char continuation: the terminal already advanced
        if cell.char == 0 {
            self.last_x = x as i32;
            self.last_y = y as i32;
            return Ok(());
        }

        if y as i32 != self.last_y || x as i32 != self.last_x + 1 {
            ansi::cursor_to(output, x, y)?;
        }

        self.apply_style(output, cell, link_url)?;
        output.write_codepoint(cell.char);

        self.last_x = x as i32;
        self.last_y = y as i32;
        Ok(())
    }

    /// Render a cell in sequence (inline mode: no cursor positioning).
    pub fn render_cell_inline(
        &mut self,
        output: &mut OutputBuffer,
        cell: &Cell,
        link_url: Option<&str>,
    ) -> io::Result<()> {
        if cell.char == 0 {
            return Ok(());
        }
        self.apply_style(output, cell, link_url)?;
        output.write_codepoint(cell.char);
        Ok(())
    }

    /// Close any open hyperlink and reset SGR state.
    pub fn finish(&mut self, output: &mut OutputBuffer) -> io::Result<()> {
        if self.last_link != 0 {
            ansi::link_close(output)?;
            self.last_link = 0;
        }
        ansi::reset(output)?;
        self.last_fg = None;
        self.last_bg = None;
        self.last_attrs = Attr::NONE;
        Ok(())
    }

    fn apply_style(
        &mut self,
        output: &mut OutputBuffer,
        cell: &Cell,
        link_url: Option<&str>,
    ) -> io::Result<()> {
        let link = if link_url.is_some() { cell.link } else { 0 };
        if link != self.last_link {
            if self.last_link != 0 {
                ansi::link_close(output)?;
            }
            if let Some(url) = link_url {
                ansi::link_open(output, url)?;
            }
            self.last_link = link;
        }

        if cell.attrs != self.last_attrs {
            ansi::reset(output)?;
            ansi::attrs(output, cell.attrs)?;
            // Reset cleared the colors too
            self.last_fg = None;
            self.last_bg = None;
            self.last_attrs = cell.attrs;
        }

        if self.last_fg != Some(cell.fg) {
            ansi::fg(output, cell.fg)?;
            self.last_fg = Some(cell.fg);
        }
        if self.last_bg != Some(cell.bg) {
            ansi::bg(output, cell.bg)?;
            self.last_bg = Some(cell.bg);
        }
        Ok(())
    }
}

impl Default for StatefulCellRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(c: char) -> Cell {
        Cell {
            char: c as u32,
            fg: Rgba::WHITE,
            bg: Rgba::rgb(0, 0, 0),
            ..Cell::default()
        }
    }

    #[test]
    fn test_sequential_cells_skip_cursor_and_colors() {
        let mut renderer = StatefulCellRenderer::new();
        let mut output = OutputBuffer::new();

        renderer.render_cell(&mut output, 0, 0, &cell('A'), None).unwrap();
        output.clear();
        renderer.render_cell(&mut output, 1, 0, &cell('B'), None).unwrap();

        assert_eq!(output.as_str(), "B");
    }

    #[test]
    fn test_jump_emits_cursor_move_only() {
        let mut renderer = StatefulCellRenderer::new();
        let mut output = OutputBuffer::new();

        renderer.render_cell(&mut output, 0, 0, &cell('A'), None).unwrap();
        output.clear();
        renderer.render_cell(&mut output, 5, 2, &cell('C'), None).unwrap();

        assert_eq!(output.as_str(), "\x1b[3;6HC");
    }

    #[test]
    fn test_continuation_cell_writes_nothing() {
        let mut renderer = StatefulCellRenderer::new();
        let mut output = OutputBuffer::new();
        let continuation = Cell {
            char: 0,
            ..cell(' ')
        };

        renderer.render_cell(&mut output, 0, 0, &continuation, None).unwrap();
        renderer.render_cell_inline(&mut output, &continuation, None).unwrap();
        assert!(output.is_empty());
    }

    #[test]
    fn test_link_runs_open_once_and_close() {
        let mut renderer = StatefulCellRenderer::new();
        let mut output = OutputBuffer::new();
        let url = "https://github.com/AJClifton";
        let linked = |c| Cell { link: 1, ..cell(c) };

        renderer.render_cell_inline(&mut output, &cell('>'), None).unwrap();
        output.clear();
        renderer.render_cell_inline(&mut output, &linked('G'), Some(url)).unwrap();
        renderer.render_cell_inline(&mut output, &linked('h'), Some(url)).unwrap();
        renderer.render_cell_inline(&mut output, &cell(' '), None).unwrap();

        assert_eq!(
            output.as_str(),
            "\x1b]8;;https://github.com/AJClifton\x07Gh\x1b]8;;\x07 "
        );
    }

    #[test]
    fn test_finish_closes_open_link() {
        let mut renderer = StatefulCellRenderer::new();
        let mut output = OutputBuffer::new();
        let linked = Cell { link: 1, ..cell('x') };

        renderer.render_cell_inline(&mut output, &linked, Some("u")).unwrap();
        output.clear();
        renderer.finish(&mut output).unwrap();

        assert_eq!(output.as_str(), "\x1b]8;;\x07\x1b[0m");
    }

    #[test]
    fn test_attr_change_reemits_colors() {
        let mut renderer = StatefulCellRenderer::new();
        let mut output = OutputBuffer::new();

        renderer.render_cell_inline(&mut output, &cell('a'), None).unwrap();
        output.clear();
        let bold = Cell {
            attrs: Attr::BOLD,
            ..cell('b')
        };
        renderer.render_cell_inline(&mut output, &bold, None).unwrap();

        assert_eq!(
            output.as_str(),
            "\x1b[0m\x1b[1m\x1b[38;2;255;255;255m\x1b[48;2;0;0;0mb"
        );
    }

    #[test]
    fn test_flush_to_clears() {
        let mut output = OutputBuffer::new();
        output.write_str("hi");
        let mut sink = Vec::new();
        output.flush_to(&mut sink).unwrap();
        assert_eq!(sink, b"hi");
        assert!(output.is_empty());
    }
}
