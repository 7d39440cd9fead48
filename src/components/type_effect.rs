//! TypeEffect - Typewriter reveal of a fixed string
//!
//! Starts by showing `text` truncated to `starting_index` characters, then
//! every `delay` reveals one more character until the whole string is shown.
//! A character is an extended grapheme cluster, so combining marks and emoji
//! sequences appear whole.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use folio::components::{TypeEffect, TypeEffectProps};
//! use folio::timer::TimerQueue;
//!
//! let timers = TimerQueue::new();
//! let effect = TypeEffect::mounted(
//!     TypeEffectProps::new("hi", Duration::from_millis(100)),
//!     &timers,
//! );
//!
//! timers.advance(Duration::from_millis(100));
//! assert_eq!(effect.visible_text(), "h");
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use spark_signals::{signal, Signal};
use unicode_segmentation::UnicodeSegmentation;

use super::ticker::Ticker;
use super::{AnimationPhase, Lifecycle};
use crate::timer::TimerQueue;

// =============================================================================
// PROPS
// =============================================================================

/// Inputs for a [`TypeEffect`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeEffectProps {
    /// Text to reveal. May be empty.
    pub text: String,
    /// Time between reveal ticks.
    pub delay: Duration,
    /// Characters visible before the first tick. May exceed the text length.
    pub starting_index: usize,
    /// Pre-roll before revealing starts. Recorded but does not gate the
    /// reveal timer.
    pub initial_delay: Duration,
}

impl TypeEffectProps {
    /// Props revealing `text` from the start with no pre-roll.
    pub fn new(text: impl Into<String>, delay: Duration) -> Self {
        Self {
            text: text.into(),
            delay,
            starting_index: 0,
            initial_delay: Duration::ZERO,
        }
    }

    pub fn with_starting_index(mut self, index: usize) -> Self {
        self.starting_index = index;
        self
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }
}

// =============================================================================
// STATE
// =============================================================================

struct TypeEffectState {
    props: TypeEffectProps,
    /// Byte offset after each grapheme; `boundaries[0] == 0`.
    boundaries: Vec<usize>,
    revealed_count: usize,
    phase: AnimationPhase,
    lifecycle: Lifecycle,
    ticker: Ticker,
}

impl TypeEffectState {
    fn char_len(&self) -> usize {
        self.boundaries.len() - 1
    }

    fn prefix(&self, count: usize) -> &str {
        let end = self.boundaries[count.min(self.char_len())];
        &self.props.text[..end]
    }

    fn set_text(&mut self, text: String) {
        self.boundaries = grapheme_boundaries(&text);
        self.props.text = text;
    }
}

fn grapheme_boundaries(text: &str) -> Vec<usize> {
    std::iter::once(0)
        .chain(text.grapheme_indices(true).map(|(i, g)| i + g.len()))
        .collect()
}

// =============================================================================
// COMPONENT
// =============================================================================

/// Typewriter reveal component.
///
/// Owns its state and at most one pending timer. Dropping it unmounts it.
pub struct TypeEffect {
    state: Rc<RefCell<TypeEffectState>>,
    visible: Signal<String>,
}

impl TypeEffect {
    /// Create the component in the `Idle` phase. Nothing is scheduled until
    /// [`mount`](Self::mount).
    pub fn new(props: TypeEffectProps, timers: &TimerQueue) -> Self {
        let boundaries = grapheme_boundaries(&props.text);
        // One past the end already means "finished"
        let revealed_count = props.starting_index.min(boundaries.len());

        let state = TypeEffectState {
            boundaries,
            revealed_count,
            phase: AnimationPhase::Idle,
            lifecycle: Lifecycle::Created,
            ticker: Ticker::new(timers),
            props,
        };
        let visible = signal(state.prefix(revealed_count).to_string());

        Self {
            state: Rc::new(RefCell::new(state)),
            visible,
        }
    }

    /// Create and mount in one step.
    pub fn mounted(props: TypeEffectProps, timers: &TimerQueue) -> Self {
        let effect = Self::new(props, timers);
        effect.mount();
        effect
    }

    /// Start revealing. Only the first call has an effect.
    pub fn mount(&self) {
        {
            let mut state = self.state.borrow_mut();
            if state.lifecycle != Lifecycle::Created {
                tracing::debug!(lifecycle = ?state.lifecycle, "type effect already mounted");
                return;
            }
            state.lifecycle = Lifecycle::Mounted;
            if !state.props.initial_delay.is_zero() {
                // Accepted for compatibility; the reveal timer is not gated on it.
                tracing::debug!(
                    initial_delay = ?state.props.initial_delay,
                    "type effect initial delay does not gate revealing"
                );
            }
            tracing::debug!(
                chars = state.char_len(),
                starting_index = state.revealed_count,
                delay = ?state.props.delay,
                "type effect mounted"
            );
        }
        schedule(&self.state, &self.visible);
    }

    /// Cancel the pending timer and settle in `Terminal`. No state changes
    /// after this.
    pub fn unmount(&self) {
        let mut state = self.state.borrow_mut();
        if state.lifecycle == Lifecycle::Unmounted {
            return;
        }
        state.lifecycle = Lifecycle::Unmounted;
        state.phase = AnimationPhase::Terminal;
        state.ticker.cancel();
        tracing::debug!(revealed = state.revealed_count, "type effect unmounted");
    }

    /// Replace the text being revealed.
    ///
    /// The reveal index is kept; the visible prefix is re-derived and the
    /// pending tick is cancelled and rescheduled. Ignored once unmounted.
    pub fn set_text(&self, text: impl Into<String>) {
        let visible = {
            let mut state = self.state.borrow_mut();
            if state.lifecycle == Lifecycle::Unmounted {
                return;
            }
            state.set_text(text.into());
            state.prefix(state.revealed_count).to_string()
        };
        self.visible.set(visible);
        schedule(&self.state, &self.visible);
    }

    /// Change the reveal interval; the pending tick is rescheduled. Ignored
    /// once unmounted.
    pub fn set_delay(&self, delay: Duration) {
        {
            let mut state = self.state.borrow_mut();
            if state.lifecycle == Lifecycle::Unmounted {
                return;
            }
            state.props.delay = delay;
        }
        schedule(&self.state, &self.visible);
    }

    /// Currently revealed prefix.
    pub fn visible_text(&self) -> String {
        self.visible.get()
    }

    /// Signal carrying the revealed prefix, for reactive binding.
    pub fn text_signal(&self) -> Signal<String> {
        self.visible.clone()
    }

    pub fn revealed_count(&self) -> usize {
        self.state.borrow().revealed_count
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

    pub fn props(&self) -> TypeEffectProps {
        self.state.borrow().props.clone()
    }
}

impl Drop for TypeEffect {
    fn drop(&mut self) {
        self.unmount();
    }
}

// =============================================================================
// SCHEDULING
// =============================================================================

/// Schedule the next reveal tick, or settle into `Terminal` once every
/// character is out. Re-run after every tick and every dependency change.
fn schedule(state: &Rc<RefCell<TypeEffectState>>, visible: &Signal<String>) {
    let weak = Rc::downgrade(state);
    let mut s = state.borrow_mut();
    if s.lifecycle != Lifecycle::Mounted {
        return;
    }

    if s.revealed_count <= s.char_len() {
        let visible = visible.clone();
        let delay = s.props.delay;
        s.phase = AnimationPhase::Running;
        s.ticker.rearm(delay, move || on_tick(&weak, &visible));
    } else {
        s.ticker.cancel();
        if s.phase != AnimationPhase::Terminal {
            tracing::debug!(text = %s.props.text, "type effect finished");
        }
        s.phase = AnimationPhase::Terminal;
    }
}

/// Reveal tick: advance the count by one and publish the new prefix.
fn on_tick(weak: &Weak<RefCell<TypeEffectState>>, visible: &Signal<String>) {
    let Some(state) = weak.upgrade() else {
        return;
    };

    let text = {
        let mut s = state.borrow_mut();
        s.ticker.fired();
        if s.lifecycle != Lifecycle::Mounted {
            return;
        }
        s.revealed_count += 1;
        tracing::trace!(revealed = s.revealed_count, "reveal tick");
        s.prefix(s.revealed_count).to_string()
    };

    visible.set(text);
    schedule(&state, visible);
}

// =============================================================================
// TESTS
// =============================================================================
