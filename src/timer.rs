//! Timer Queue - Single-threaded timers on a virtual clock
//!
//! Plays the role of the host event loop's task queue for the animation
//! components. Timers are one-shot callbacks keyed by deadline; the clock
//! only moves when the owner advances it.
//!
//! # Pattern
//!
//! - `schedule(delay, callback)` returns a [`TimerHandle`]
//! - `cancel(handle)` drops a pending callback without running it
//! - `advance(elapsed)` fires every timer that falls due, in deadline order
//! - Callbacks may schedule or cancel timers while they run
//!
//! The queue is `Rc`-shared and never crosses threads. At runtime the mount
//! loop advances it by wall-clock time; tests advance it by hand.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use std::rc::Rc;
//! use std::cell::Cell;
//! use folio::timer::TimerQueue;
//!
//! let timers = TimerQueue::new();
//! let fired = Rc::new(Cell::new(false));
//! let flag = fired.clone();
//! timers.schedule(Duration::from_millis(100), move || flag.set(true));
//!
//! timers.advance(Duration::from_millis(99));
//! assert!(!fired.get());
//! timers.advance(Duration::from_millis(1));
//! assert!(fired.get());
//! ```

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

/// Opaque handle to a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

type Callback = Box<dyn FnOnce()>;

#[derive(Default)]
struct QueueInner {
    now: Duration,
    next_id: u64,
    /// Pending callbacks ordered by (deadline, id) - ids are monotonic so
    /// equal deadlines fire in scheduling order.
    entries: BTreeMap<(Duration, u64), Callback>,
    /// id -> deadline, for O(log n) cancellation.
    deadlines: HashMap<u64, Duration>,
}

/// Shared single-threaded timer queue.
///
/// Cloning gives another handle to the same queue.
#[derive(Clone, Default)]
pub struct TimerQueue {
    inner: Rc<RefCell<QueueInner>>,
}

impl fmt::Debug for TimerQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("TimerQueue")
            .field("now", &inner.now)
            .field("pending", &inner.entries.len())
            .finish()
    }
}

impl TimerQueue {
    /// Create an empty queue with the clock at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    /// Schedule `callback` to run once `delay` has elapsed.
    pub fn schedule<F>(&self, delay: Duration, callback: F) -> TimerHandle
    where
        F: FnOnce() + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        let deadline = inner.now + delay;
        inner.entries.insert((deadline, id), Box::new(callback));
        inner.deadlines.insert(id, deadline);
        tracing::trace!(id, ?deadline, "timer scheduled");
        TimerHandle(id)
    }

    /// Cancel a pending timer.
    ///
    /// Returns false if the timer already fired or was cancelled.
    pub fn cancel(&self, handle: TimerHandle) -> bool {
        let mut inner = self.inner.borrow_mut();
        match inner.deadlines.remove(&handle.0) {
            Some(deadline) => {
                inner.entries.remove(&(deadline, handle.0));
                tracing::trace!(id = handle.0, "timer cancelled");
                true
            }
            None => false,
        }
    }

    /// Check whether a timer is still waiting to fire.
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.inner.borrow().deadlines.contains_key(&handle.0)
    }

    /// Number of timers waiting to fire.
    pub fn pending_count(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    /// Check if no timers are pending.
    pub fn is_idle(&self) -> bool {
        self.inner.borrow().entries.is_empty()
    }

    /// Deadline of the earliest pending timer.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.inner
            .borrow()
            .entries
            .keys()
            .next()
            .map(|(deadline, _)| *deadline)
    }

    /// Time left until the earliest pending timer is due (zero if overdue).
    pub fn time_until_next(&self) -> Option<Duration> {
        let inner = self.inner.borrow();
        inner
            .entries
            .keys()
            .next()
            .map(|(deadline, _)| deadline.saturating_sub(inner.now))
    }

    /// Advance the clock by `elapsed`, firing every timer that falls due.
    ///
    /// Timers scheduled by callbacks during the advance also fire if their
    /// deadline lands inside the window. Returns the number of callbacks run.
    pub fn advance(&self, elapsed: Duration) -> usize {
        let target = self.now() + elapsed;
        let mut fired = 0;

        while let Some(callback) = self.pop_due(target) {
            callback();
            fired += 1;
        }

        self.inner.borrow_mut().now = target;
        fired
    }

    /// Jump the clock to the earliest deadline and fire that one timer.
    ///
    /// Returns false when nothing is pending.
    pub fn fire_next(&self) -> bool {
        let callback = {
            let mut inner = self.inner.borrow_mut();
            let Some(((deadline, id), callback)) = inner.entries.pop_first() else {
                return false;
            };
            inner.deadlines.remove(&id);
            inner.now = inner.now.max(deadline);
            callback
        };
        callback();
        true
    }

    /// Fire timers one by one until the queue is empty or `limit` callbacks
    /// have run. Returns the number of callbacks run.
    pub fn run_until_idle(&self, limit: usize) -> usize {
        let mut fired = 0;
        while fired < limit && self.fire_next() {
            fired += 1;
        }
        fired
    }

    /// Drop every pending timer without running it.
    pub fn clear(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.entries.clear();
        inner.deadlines.clear();
    }

    /// Pop the earliest callback due at or before `target`, moving the clock
    /// to its deadline. The borrow is released before the callback runs.
    fn pop_due(&self, target: Duration) -> Option<Callback> {
        let mut inner = self.inner.borrow_mut();
        let (&(deadline, id), _) = inner.entries.first_key_value()?;
        if deadline > target {
            return None;
        }
        let callback = inner.entries.remove(&(deadline, id))?;
        inner.deadlines.remove(&id);
        inner.now = inner.now.max(deadline);
        Some(callback)
    }
}

// =============================================================================
// TESTS
// =============================================================================
