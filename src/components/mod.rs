//! Animated Components - Timer-driven text effects
//!
//! Two independent components, each owning its state and a single pending
//! timer on the shared [`TimerQueue`](crate::timer::TimerQueue):
//!
//! - [`TypeEffect`] - reveals a string one character per tick
//! - [`Cursor`] - blinks a glyph a fixed number of times, then hides it
//!
//! # Lifecycle
//!
//! ```text
//! new() ──► Idle ──mount()──► Running ──bound exceeded──► Terminal
//!                               │  ▲
//!                               └──┘ tick
//! ```
//!
//! Output is exposed as a `Signal<String>` so pages can bind it directly.
//! Unmounting (or dropping) cancels the pending timer; a fired callback for
//! an unmounted component is a no-op.

mod cursor;
mod ticker;
mod type_effect;

pub use cursor::{Cursor, CursorProps, DEFAULT_CURSOR_GLYPH};
pub use type_effect::{TypeEffect, TypeEffectProps};

/// Animation state shared by both components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationPhase {
    /// Created but not mounted yet - no timer scheduled.
    #[default]
    Idle,
    /// A tick is scheduled.
    Running,
    /// Bound exceeded or unmounted - nothing will be scheduled again.
    Terminal,
}

/// Mount state of a component instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum Lifecycle {
    #[default]
    Created,
    Mounted,
    Unmounted,
}
