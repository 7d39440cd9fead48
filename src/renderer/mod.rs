//! Rendering: frame buffer to terminal.
//!
//! Pages draw into a [`FrameBuffer`]; a [`Renderer`] turns it into escape
//! sequences. Two modes:
//!
//! - [`DiffRenderer`]: fullscreen on the alternate screen, writes only
//!   changed cells.
//! - [`InlineRenderer`]: normal buffer below the prompt, rewrites the
//!   whole frame.

pub mod ansi;
mod buffer;
mod diff;
mod inline;
mod output;

use std::io;

pub use buffer::{FrameBuffer, char_width, string_width};
pub use diff::DiffRenderer;
pub use inline::InlineRenderer;
pub use output::{OutputBuffer, StatefulCellRenderer};

/// A terminal output strategy.
pub trait Renderer {
    /// Prepare the terminal (screen mode, cursor, window title).
    fn enter(&mut self, title: &str) -> io::Result<()>;

    /// Change the terminal window title.
    fn set_title(&mut self, title: &str) -> io::Result<()>;

    /// Present a frame.
    fn render(&mut self, frame: &FrameBuffer) -> io::Result<()>;

    /// The terminal changed size; drop any assumptions about its contents.
    fn resized(&mut self) -> io::Result<()>;

    /// Restore the terminal.
    fn exit(&mut self) -> io::Result<()>;
}
