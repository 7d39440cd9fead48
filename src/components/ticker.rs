//! Single-slot timer ownership for a component instance.

use std::time::Duration;

use crate::timer::{TimerHandle, TimerQueue};

/// Holds at most one pending timer.
///
/// `rearm` always cancels the previous timer before scheduling, so a
/// component can never have two ticks in flight.
pub(crate) struct Ticker {
    timers: TimerQueue,
    pending: Option<TimerHandle>,
}

impl Ticker {
    pub(crate) fn new(timers: &TimerQueue) -> Self {
        Self {
            timers: timers.clone(),
            pending: None,
        }
    }

    /// Cancel any pending timer, then schedule `callback` after `delay`.
    pub(crate) fn rearm<F>(&mut self, delay: Duration, callback: F)
    where
        F: FnOnce() + 'static,
    {
        self.cancel();
        self.pending = Some(self.timers.schedule(delay, callback));
    }

    /// Cancel the pending timer, if any. Returns true if one was cancelled.
    pub(crate) fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) => self.timers.cancel(handle),
            None => false,
        }
    }

    /// Forget the handle of a timer that has just fired.
    pub(crate) fn fired(&mut self) {
        self.pending = None;
    }

    pub(crate) fn is_armed(&self) -> bool {
        self.pending.is_some_and(|h| self.timers.is_pending(h))
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rearm_replaces_pending() {
        let timers = TimerQueue::new();
        let mut ticker = Ticker::new(&timers);

        ticker.rearm(Duration::from_millis(10), || panic!("replaced timer fired"));
        ticker.rearm(Duration::from_millis(20), || {});

        assert_eq!(timers.pending_count(), 1);
        assert!(ticker.is_armed());
        timers.advance(Duration::from_millis(20));
        assert!(!ticker.is_armed());
    }

    #[test]
    fn test_drop_cancels() {
        let timers = TimerQueue::new();
        {
            let mut ticker = Ticker::new(&timers);
            ticker.rearm(Duration::from_millis(5), || panic!("dropped ticker fired"));
        }
        assert!(timers.is_idle());
    }
}
