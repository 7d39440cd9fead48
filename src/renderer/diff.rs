//! Differential renderer for fullscreen mode.
//!
//! Compares each frame to the previous one and only writes cells that
//! changed, inside a synchronized-output block, in one flush.

use std::io::{self, Write};

use super::Renderer;
use super::ansi;
use super::buffer::FrameBuffer;
use super::output::{OutputBuffer, StatefulCellRenderer};

/// Fullscreen renderer on the alternate screen.
pub struct DiffRenderer<W: Write> {
    writer: W,
    output: OutputBuffer,
    cell_renderer: StatefulCellRenderer,
    previous: Option<FrameBuffer>,
}

impl<W: Write> DiffRenderer<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            output: OutputBuffer::new(),
            cell_renderer: StatefulCellRenderer::new(),
            previous: None,
        }
    }

    /// Next render will be a full redraw.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    /// Render a frame, writing only changed cells. Returns the number of
    /// cells written.
    pub fn render_frame(&mut self, frame: &FrameBuffer) -> io::Result<usize> {
        ansi::begin_sync(&mut self.output)?;
        self.cell_renderer.reset();

        let comparable = self
            .previous
            .as_ref()
            .filter(|prev| prev.width() == frame.width() && prev.height() == frame.height());

        let mut changed = 0;
        for y in 0..frame.height() {
            for x in 0..frame.width() {
                let Some(cell) = frame.get(x, y) else {
                    continue;
                };
                let prev_cell = comparable.and_then(|prev| prev.get(x, y));
                if prev_cell == Some(cell) {
                    continue;
                }

                changed += 1;
                self.cell_renderer
                    .render_cell(&mut self.output, x, y, cell, frame.link_url(cell.link))?;
            }
        }

        self.cell_renderer.finish(&mut self.output)?;
        ansi::end_sync(&mut self.output)?;
        self.output.flush_to(&mut self.writer)?;

        self.previous = Some(frame.clone());
        Ok(changed)
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Renderer for DiffRenderer<W> {
    fn enter(&mut self, title: &str) -> io::Result<()> {
        ansi::enter_alt_screen(&mut self.output)?;
        ansi::cursor_hide(&mut self.output)?;
        ansi::clear_screen(&mut self.output)?;
        ansi::set_title(&mut self.output, title)?;
        self.output.flush_to(&mut self.writer)?;
        self.invalidate();
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> io::Result<()> {
        ansi::set_title(&mut self.output, title)?;
        self.output.flush_to(&mut self.writer)
    }

    fn render(&mut self, frame: &FrameBuffer) -> io::Result<()> {
        let changed = self.render_frame(frame)?;
        tracing::trace!(changed, "diff frame rendered");
        Ok(())
    }

    fn resized(&mut self) -> io::Result<()> {
        ansi::clear_screen(&mut self.output)?;
        self.output.flush_to(&mut self.writer)?;
        self.invalidate();
        Ok(())
    }

    fn exit(&mut self) -> io::Result<()> {
        ansi::reset(&mut self.output)?;
        ansi::cursor_show(&mut self.output)?;
        ansi::exit_alt_screen(&mut self.output)?;
        self.output.flush_to(&mut self.writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Attr, Rgba};

    fn frame_with(text: &str) -> FrameBuffer {
        let mut frame = FrameBuffer::new(10, 2);
        frame.draw_text(0, 0, text, Rgba::WHITE, None, Attr::NONE, None);
        frame
    }

    #[test]
    fn test_first_frame_writes_everything() {
        let mut renderer = DiffRenderer::new(Vec::new());
        let written = renderer.render_frame(&frame_with("hi")).unwrap();
        assert_eq!(written, 20);
        assert!(renderer.has_previous());
    }

    #[test]
    fn test_second_frame_writes_only_changes() {
        let mut renderer = DiffRenderer::new(Vec::new());
        renderer.render_frame(&frame_with("hi")).unwrap();

        assert_eq!(renderer.render_frame(&frame_with("hi")).unwrap(), 0);
        assert_eq!(renderer.render_frame(&frame_with("ho")).unwrap(), 1);

        let out = String::from_utf8(renderer.into_inner()).unwrap();
        let last_frame = out.rsplit("\x1b[?2026h").next().unwrap();
        assert!(last_frame.starts_with("\x1b[1;2H"));
        assert!(last_frame.ends_with("o\x1b[0m\x1b[?2026l"));
    }

    #[test]
    fn test_invalidate_forces_full_redraw() {
        let mut renderer = DiffRenderer::new(Vec::new());
        renderer.render_frame(&frame_with("hi")).unwrap();
        renderer.invalidate();
        assert!(!renderer.has_previous());
        assert_eq!(renderer.render_frame(&frame_with("hi")).unwrap(), 20);
    }

    #[test]
    fn test_size_change_redraws() {
        let mut renderer = DiffRenderer::new(Vec::new());
        renderer.render_frame(&frame_with("hi")).unwrap();
        let bigger = FrameBuffer::new(12, 2);
        assert_eq!(renderer.render_frame(&bigger).unwrap(), 24);
    }

    #[test]
    fn test_enter_sets_title_and_exit_restores() {
        let mut renderer = DiffRenderer::new(Vec::new());
        renderer.enter("AJClifton").unwrap();
        renderer.exit().unwrap();

        let out = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(out.starts_with("\x1b[?1049h"));
        assert!(out.contains("\x1b]0;AJClifton\x07"));
        assert!(out.ends_with("\x1b[?25h\x1b[?1049l"));
    }
}
