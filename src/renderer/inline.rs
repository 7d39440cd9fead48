//! Inline renderer for normal terminal mode.
//!
//! Writes into the normal buffer below the prompt, keeping scrollback.
//! Each frame erases what the previous frame printed and rewrites it.

use std::io::{self, Write};

use super::Renderer;
use super::ansi;
use super::buffer::FrameBuffer;
use super::output::{OutputBuffer, StatefulCellRenderer};

pub struct InlineRenderer<W: Write> {
    writer: W,
    output: OutputBuffer,
    cell_renderer: StatefulCellRenderer,
    previous_height: u16,
}

impl<W: Write> InlineRenderer<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            output: OutputBuffer::new(),
            cell_renderer: StatefulCellRenderer::new(),
            previous_height: 0,
        }
    }

    /// Rows printed by the last frame.
    pub fn previous_height(&self) -> u16 {
        self.previous_height
    }

    fn erase_previous(&mut self) -> io::Result<()> {
        if self.previous_height > 0 {
            // Cursor sits on the last printed row
            ansi::cursor_up(&mut self.output, self.previous_height - 1)?;
            ansi::cursor_column_zero(&mut self.output)?;
            ansi::erase_down(&mut self.output)?;
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Renderer for InlineRenderer<W> {
    fn enter(&mut self, title: &str) -> io::Result<()> {
        ansi::cursor_hide(&mut self.output)?;
        ansi::set_title(&mut self.output, title)?;
        self.output.flush_to(&mut self.writer)
    }

    fn set_title(&mut self, title: &str) -> io::Result<()> {
        ansi::set_title(&mut self.output, title)?;
        self.output.flush_to(&mut self.writer)
    }

    fn render(&mut self, frame: &FrameBuffer) -> io::Result<()> {
        ansi::begin_sync(&mut self.output)?;
        self.erase_previous()?;
        self.cell_renderer.reset();

        let height = frame.height();
        for y in 0..height {
            for x in 0..frame.width() {
                if let Some(cell) = frame.get(x, y) {
                    self.cell_renderer.render_cell_inline(
                        &mut self.output,
                        cell,
                        frame.link_url(cell.link),
                    )?;
                }
            }
            if y + 1 < height {
                // Links and colors must not bleed into the line break
                self.cell_renderer.finish(&mut self.output)?;
                self.output.write_str("\r\n");
            }
        }

        self.cell_renderer.finish(&mut self.output)?;
        ansi::end_sync(&mut self.output)?;
        self.output.flush_to(&mut self.writer)?;

        self.previous_height = height;
        Ok(())
    }

    fn resized(&mut self) -> io::Result<()> {
        // Reflowed rows can't be erased reliably; start clean.
        ansi::clear_screen(&mut self.output)?;
        self.output.flush_to(&mut self.writer)?;
        self.previous_height = 0;
        Ok(())
    }

    fn exit(&mut self) -> io::Result<()> {
        ansi::reset(&mut self.output)?;
        ansi::cursor_show(&mut self.output)?;
        self.output.write_str("\r\n");
        self.output.flush_to(&mut self.writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Attr, Rgba};

    #[test]
    fn test_first_render_has_no_erase() {
        let mut renderer = InlineRenderer::new(Vec::new());
        let mut frame = FrameBuffer::new(3, 2);
        frame.draw_text(0, 0, "ab", Rgba::WHITE, None, Attr::NONE, None);

        renderer.render(&frame).unwrap();
        assert_eq!(renderer.previous_height(), 2);

        let out = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(!out.contains("\x1b[J"));
        assert!(out.contains("ab"));
        assert!(out.contains("\r\n"));
    }

    #[test]
    fn test_second_render_erases_previous_rows() {
        let mut renderer = InlineRenderer::new(Vec::new());
        let frame = FrameBuffer::new(3, 4);
        renderer.render(&frame).unwrap();
        renderer.render(&frame).unwrap();

        let out = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(out.contains("\x1b[3A\x1b[G\x1b[J"));
    }

    #[test]
    fn test_resize_resets_height() {
        let mut renderer = InlineRenderer::new(Vec::new());
        renderer.render(&FrameBuffer::new(2, 2)).unwrap();
        renderer.resized().unwrap();
        assert_eq!(renderer.previous_height(), 0);
    }
}
