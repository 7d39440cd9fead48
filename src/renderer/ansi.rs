//! ANSI escape sequences used by the renderers.
//!
//! Only what folio emits: cursor placement and visibility, screen and
//! alternate-buffer control, synchronized output, SGR colors/attributes,
//! the window title, and OSC 8 hyperlinks.

use std::io::{self, Write};

use crate::types::{Attr, Rgba};

// =============================================================================
// Cursor
// =============================================================================

/// Move cursor to absolute position (0-indexed in, 1-indexed on the wire).
#[inline]
pub fn cursor_to<W: Write>(w: &mut W, x: u16, y: u16) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", y as u32 + 1, x as u32 + 1)
}

/// Move cursor up by n rows.
#[inline]
pub fn cursor_up<W: Write>(w: &mut W, n: u16) -> io::Result<()> {
    if n > 0 { write!(w, "\x1b[{}A", n) } else { Ok(()) }
}

#[inline]
pub fn cursor_column_zero<W: Write>(w: &mut W) -> io::Result<()> {
    write!(w, "\x1b[G")
}

#[inline]
pub fn cursor_hide<W: Write>(w: &mut W) -> io::Result<()> {
    write!(w, "\x1b[?25l")
}

#[inline]
pub fn cursor_show<W: Write>(w: &mut W) -> io::Result<()> {
    write!(w, "\x1b[?25h")
}

// =============================================================================
// Screen Control
// =============================================================================

/// Clear from cursor to end of screen.
#[inline]
pub fn erase_down<W: Write>(w: &mut W) -> io::Result<()> {
    write!(w, "\x1b[J")
}

/// Clear screen and scrollback, cursor home.
#[inline]
pub fn clear_screen<W: Write>(w: &mut W) -> io::Result<()> {
    write!(w, "\x1b[2J\x1b[3J\x1b[H")
}

#[inline]
pub fn enter_alt_screen<W: Write>(w: &mut W) -> io::Result<()> {
    write!(w, "\x1b[?1049h")
}

#[inline]
pub fn exit_alt_screen<W: Write>(w: &mut W) -> io::Result<()> {
    write!(w, "\x1b[?1049l")
}

/// Begin synchronized output (terminal buffers until end_sync).
#[inline]
pub fn begin_sync<W: Write>(w: &mut W) -> io::Result<()> {
    write!(w, "\x1b[?2026h")
}

#[inline]
pub fn end_sync<W: Write>(w: &mut W) -> io::Result<()> {
    write!(w, "\x1b[?2026l")
}

// =============================================================================
// Colors and Attributes
// =============================================================================

/// Reset all attributes and colors.
#[inline]
pub fn reset<W: Write>(w: &mut W) -> io::Result<()> {
    write!(w, "\x1b[0m")
}

/// Set foreground color.
pub fn fg<W: Write>(w: &mut W, color: Rgba) -> io::Result<()> {
    if color.is_terminal_default() {
        write!(w, "\x1b[39m")
    } else if color.is_ansi() {
        match color.ansi_index() {
            i @ 0..=7 => write!(w, "\x1b[{}m", 30 + i),
            i @ 8..=15 => write!(w, "\x1b[{}m", 90 + i - 8),
            i => write!(w, "\x1b[38;5;{}m", i),
        }
    } else {
        write!(w, "\x1b[38;2;{};{};{}m", color.r, color.g, color.b)
    }
}

/// Set background color.
pub fn bg<W: Write>(w: &mut W, color: Rgba) -> io::Result<()> {
    if color.is_terminal_default() {
        write!(w, "\x1b[49m")
    } else if color.is_ansi() {
        match color.ansi_index() {
            i @ 0..=7 => write!(w, "\x1b[{}m", 40 + i),
            i @ 8..=15 => write!(w, "\x1b[{}m", 100 + i - 8),
            i => write!(w, "\x1b[48;5;{}m", i),
        }
    } else {
        write!(w, "\x1b[48;2;{};{};{}m", color.r, color.g, color.b)
    }
}

/// Set text attributes from bitflags as a single SGR sequence.
pub fn attrs<W: Write>(w: &mut W, attr: Attr) -> io::Result<()> {
    const CODES: [(Attr, u8); 8] = [
        (Attr::BOLD, 1),
        (Attr::DIM, 2),
        (Attr::ITALIC, 3),
        (Attr::UNDERLINE, 4),
        (Attr::BLINK, 5),
        (Attr::INVERSE, 7),
        (Attr::HIDDEN, 8),
        (Attr::STRIKETHROUGH, 9),
    ];

    if attr.is_empty() {
        return Ok(());
    }

    let codes: Vec<String> = CODES
        .iter()
        .filter(|(flag, _)| attr.contains(*flag))
        .map(|(_, code)| code.to_string())
        .collect();
    write!(w, "\x1b[{}m", codes.join(";"))
}

// =============================================================================
// Window Title and Hyperlinks
// =============================================================================

/// Set terminal window title.
#[inline]
pub fn set_title<W: Write>(w: &mut W, title: &str) -> io::Result<()> {
    write!(w, "\x1b]0;{}\x07", title)
}

/// Start an OSC 8 hyperlink; following text is the link label.
#[inline]
pub fn link_open<W: Write>(w: &mut W, url: &str) -> io::Result<()> {
    write!(w, "\x1b]8;;{}\x07", url)
}

/// End the current OSC 8 hyperlink.
#[inline]
pub fn link_close<W: Write>(w: &mut W) -> io::Result<()> {
    write!(w, "\x1b]8;;\x07")
}
