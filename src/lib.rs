//! # folio
//!
//! A personal landing page for the terminal, built on
//! [spark-signals](https://github.com/RLabs-Inc/spark-signals) for reactivity.
//!
//! ## Architecture
//!
//! Two small animated components drive everything that moves:
//!
//! - [`TypeEffect`] reveals a string one grapheme per tick.
//! - [`Cursor`] blinks a glyph a fixed number of times, then hides it.
//!
//! Each owns at most one pending timer on a [`TimerQueue`], a virtual clock
//! that the event loop advances with wall-clock time and tests advance by
//! hand. Component output is a `Signal<String>`; the render pipeline is
//! purely derived-based:
//!
//! ```text
//! timer tick → component signal → frame derived (taffy layout + paint) → render effect
//! ```
//!
//! ## Modules
//!
//! - [`timer`] - Virtual-clock timer queue
//! - [`components`] - TypeEffect and Cursor
//! - [`pages`] - Home and list pages
//! - [`layout`] - Taffy flexbox layout and text measurement
//! - [`renderer`] - Frame buffer and terminal output (diff and inline)
//! - [`pipeline`] - Terminal signals, input, mount loop, snapshots
//! - [`config`] / [`theme`] - Site content and colours

pub mod components;
pub mod config;
pub mod error;
pub mod layout;
pub mod logging;
pub mod pages;
pub mod pipeline;
pub mod renderer;
pub mod theme;
pub mod timer;
pub mod types;

pub use components::{
    AnimationPhase, Cursor, CursorProps, DEFAULT_CURSOR_GLYPH, TypeEffect, TypeEffectProps,
};
pub use config::SiteConfig;
pub use error::{FolioError, Result};
pub use pages::{HomePage, ListPage, Page, PageKind};
pub use pipeline::{MountHandle, MountOptions, RenderMode, mount, run, snapshot};
pub use renderer::FrameBuffer;
pub use theme::{Theme, ThemeName};
pub use timer::{TimerHandle, TimerQueue};
