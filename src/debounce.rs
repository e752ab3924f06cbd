//! Coalesces bursts of input into a single trailing update.

use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::clock::Clock;

/// Default quiet period before search text is applied.
pub const DEFAULT_WAIT: Duration = Duration::from_millis(500);

/// Holds the latest value until no new one has arrived for `wait`.
///
/// Every `call` replaces the pending value and restarts the timer, so only
/// the last value of a burst is ever delivered by `poll`.
pub struct Debouncer<T> {
    clock: Rc<dyn Clock>,
    wait: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(clock: Rc<dyn Clock>, wait: Duration) -> Self {
        Self {
            clock,
            wait,
            pending: None,
        }
    }

    pub fn call(&mut self, value: T) {
        let deadline = self.clock.now() + self.wait;
        self.pending = Some((value, deadline));
    }

    /// The pending value, if its quiet period has elapsed.
    pub fn poll(&mut self) -> Option<T> {
        let now = self.clock.now();
        match self.pending.take() {
            Some((value, deadline)) if now >= deadline => Some(value),
            other => {
                self.pending = other;
                None
            }
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
