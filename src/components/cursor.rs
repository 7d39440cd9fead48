//! Cursor - A glyph that blinks a fixed number of times
//!
//! Starts visible. Every `blink_time` the glyph is set from the parity of
//! the blink counter (even → hidden, odd → visible) and the counter
//! advances. Once the counter passes `blinks` the glyph is forced hidden and
//! no further timer is scheduled.
//!
//! ```text
//! blinks = 2:   "|"  ──tick──►  ""  ──tick──►  "|"  ──tick──►  ""  (terminal)
//! ```
//!
//! Unlike the shared blink clocks used for input carets, each Cursor owns
//! its own timer: the sequence is finite and per-instance.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use spark_signals::{signal, Signal};

use super::ticker::Ticker;
use super::{AnimationPhase, Lifecycle};
use crate::timer::TimerQueue;

/// Glyph shown in the visible phase unless configured otherwise.
pub const DEFAULT_CURSOR_GLYPH: &str = "|";

// =============================================================================
// PROPS
// =============================================================================

/// Inputs for a [`Cursor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorProps {
    /// Number of blink ticks before the cursor settles hidden.
    pub blinks: u32,
    /// Time between blink ticks.
    pub blink_time: Duration,
    /// Glyph for the visible phase.
    pub glyph: String,
}

impl CursorProps {
    pub fn new(blinks: u32, blink_time: Duration) -> Self {
        Self {
            blinks,
            blink_time,
            glyph: DEFAULT_CURSOR_GLYPH.to_string(),
        }
    }

    pub fn with_glyph(mut self, glyph: impl Into<String>) -> Self {
        self.glyph = glyph.into();
        self
    }
}

// =============================================================================
// STATE
// =============================================================================

struct CursorState {
    props: CursorProps,
    blink_count: u32,
    phase: AnimationPhase,
    lifecycle: Lifecycle,
    ticker: Ticker,
}

/// What the scheduling step decided, applied after the state borrow ends.
enum Step {
    Scheduled,
    Settle,
    Nothing,
}

// =============================================================================
// COMPONENT
// =============================================================================

/// Blinking cursor component.
///
/// Owns its state and at most one pending timer. Dropping it unmounts it.
pub struct Cursor {
    state: Rc<RefCell<CursorState>>,
    glyph: Signal<String>,
}

impl Cursor {
    /// Create the cursor in the `Idle` phase, glyph visible.
    pub fn new(props: CursorProps, timers: &TimerQueue) -> Self {
        let glyph = signal(props.glyph.clone());
        let state = CursorState {
            props,
            blink_count: 0,
            phase: AnimationPhase::Idle,
            lifecycle: Lifecycle::Created,
            ticker: Ticker::new(timers),
        };

        Self {
            state: Rc::new(RefCell::new(state)),
            glyph,
        }
    }

    /// Create and mount in one step.
    pub fn mounted(props: CursorProps, timers: &TimerQueue) -> Self {
        let cursor = Self::new(props, timers);
        cursor.mount();
        cursor
    }

    /// Start blinking. Only the first call has an effect.
    pub fn mount(&self) {
        {
            let mut state = self.state.borrow_mut();
            if state.lifecycle != Lifecycle::Created {
                return;
            }
            state.lifecycle = Lifecycle::Mounted;
            tracing::debug!(
                blinks = state.props.blinks,
                blink_time = ?state.props.blink_time,
                "cursor mounted"
            );
        }
        schedule(&self.state, &self.glyph);
    }

    /// Cancel the pending timer and settle in `Terminal`. The glyph keeps
    /// whatever it showed last.
    pub fn unmount(&self) {
        let mut state = self.state.borrow_mut();
        if state.lifecycle == Lifecycle::Unmounted {
            return;
        }
        state.lifecycle = Lifecycle::Unmounted;
        state.phase = AnimationPhase::Terminal;
        state.ticker.cancel();
        tracing::debug!(blink_count = state.blink_count, "cursor unmounted");
    }

    /// Current glyph: the cursor character or empty.
    pub fn glyph(&self) -> String {
        self.glyph.get()
    }

    /// Signal carrying the current glyph, for reactive binding.
    pub fn glyph_signal(&self) -> Signal<String> {
        self.glyph.clone()
    }

    pub fn is_visible(&self) -> bool {
        !self.glyph.get().is_empty()
    }

    pub fn blink_count(&self) -> u32 {
        self.state.borrow().blink_count
    }

    pub fn phase(&self) -> AnimationPhase {
        self.state.borrow().phase
    }

    pub fn has_pending_timer(&self) -> bool {
        self.state.borrow().ticker.is_armed()
    }

    pub fn is_mounted(&self) -> bool {
        self.state.borrow().lifecycle == Lifecycle::Mounted
    }

    pub fn props(&self) -> CursorProps {
        self.state.borrow().props.clone()
    }
}

impl Drop for Cursor {
    fn drop(&mut self) {
        self.unmount();
    }
}

// =============================================================================
// SCHEDULING
// =============================================================================

/// Schedule the next blink tick, or hide the glyph for good once the
/// counter has passed the configured number of blinks.
fn schedule(state: &Rc<RefCell<CursorState>>, glyph: &Signal<String>) {
    let weak = Rc::downgrade(state);
    let step = {
        let mut s = state.borrow_mut();
        if s.lifecycle != Lifecycle::Mounted {
            Step::Nothing
        } else if s.blink_count <= s.props.blinks {
            let glyph = glyph.clone();
            let delay = s.props.blink_time;
            s.phase = AnimationPhase::Running;
            s.ticker.rearm(delay, move || on_tick(&weak, &glyph));
            Step::Scheduled
        } else {
            s.ticker.cancel();
            if s.phase != AnimationPhase::Terminal {
                tracing::debug!(blink_count = s.blink_count, "cursor settled");
            }
            s.phase = AnimationPhase::Terminal;
            Step::Settle
        }
    };

    match step {
        Step::Settle => {
            glyph.set(String::new());
        }
        Step::Scheduled | Step::Nothing => {}
    }
}

/// Blink tick: pick the glyph from the counter's parity, then advance it.
fn on_tick(weak: &Weak<RefCell<CursorState>>, glyph: &Signal<String>) {
    let Some(state) = weak.upgrade() else {
        return;
    };

    let next = {
        let mut s = state.borrow_mut();
        s.ticker.fired();
        if s.lifecycle != Lifecycle::Mounted {
            return;
        }
        let next = if s.blink_count % 2 == 0 {
            String::new()
        } else {
            s.props.glyph.clone()
        };
        s.blink_count += 1;
        tracing::trace!(blink_count = s.blink_count, "blink tick");
        next
    };

    glyph.set(next);
    schedule(&state, glyph);
}

// =============================================================================
// TESTS
// =============================================================================
