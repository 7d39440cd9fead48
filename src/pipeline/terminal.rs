//! Terminal state signals.
//!
//! Terminal size is the root of the render pipeline: the frame derived
//! reads these signals, so a resize re-lays out and re-renders the page.

use std::cell::RefCell;

use spark_signals::{Signal, signal};

/// How frames reach the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum RenderMode {
    /// Alternate screen, differential rendering.
    #[default]
    Fullscreen,
    /// Normal buffer below the prompt; frames are as tall as the page.
    Inline,
}

impl RenderMode {
    #[inline]
    pub fn is_fullscreen(self) -> bool {
        self == RenderMode::Fullscreen
    }
}

thread_local! {
    static TERMINAL_WIDTH: RefCell<Signal<u16>> = RefCell::new(signal(80));
    static TERMINAL_HEIGHT: RefCell<Signal<u16>> = RefCell::new(signal(24));
}

pub fn terminal_width() -> u16 {
    TERMINAL_WIDTH.with(|w| w.borrow().get())
}

pub fn terminal_height() -> u16 {
    TERMINAL_HEIGHT.with(|h| h.borrow().get())
}

/// Set the terminal size (startup and resize events).
pub fn set_terminal_size(width: u16, height: u16) {
    TERMINAL_WIDTH.with(|w| w.borrow().set(width));
    TERMINAL_HEIGHT.with(|h| h.borrow().set(height));
}

pub fn terminal_width_signal() -> Signal<u16> {
    TERMINAL_WIDTH.with(|w| w.borrow().clone())
}

pub fn terminal_height_signal() -> Signal<u16> {
    TERMINAL_HEIGHT.with(|h| h.borrow().clone())
}

/// Query crossterm for the real size and publish it. Keeps the previous
/// value when the query fails (not a tty).
pub fn detect_terminal_size() {
    match crossterm::terminal::size() {
        Ok((width, height)) => set_terminal_size(width, height),
        Err(err) => tracing::debug!(%err, "terminal size unavailable"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_size() {
        set_terminal_size(120, 40);
        assert_eq!(terminal_width(), 120);
        assert_eq!(terminal_height(), 40);
        assert_eq!(terminal_width_signal().get(), 120);
    }

    #[test]
    fn test_render_mode_default() {
        assert!(RenderMode::default().is_fullscreen());
        assert!(!RenderMode::Inline.is_fullscreen());
    }
}
