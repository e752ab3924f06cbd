//! Time source abstraction and fixed-latency values.

use std::time::{Duration, Instant};

pub trait Clock {
    fn now(&self) -> Instant;
}

/// The real monotonic clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Virtual time that only moves when told to. Clones share the same time.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    elapsed: std::rc::Rc<std::cell::Cell<Duration>>,
}

#[cfg(test)]
impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            elapsed: Default::default(),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.elapsed.set(self.elapsed.get() + by);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed.get()
    }
}

/// A value that becomes available once its deadline passes.
///
/// Stands in for every simulated network or speech-recognition round trip.
#[derive(Debug, Clone)]
pub struct Delayed<T> {
    value: T,
    ready_at: Instant,
}

impl<T> Delayed<T> {
    pub fn new(value: T, now: Instant, delay: Duration) -> Self {
        Self {
            value,
            ready_at: now + delay,
        }
    }

    pub fn is_ready(&self, now: Instant) -> bool {
        now >= self.ready_at
    }

    /// Hand back the value if it is ready, otherwise give `self` back unchanged.
    pub fn take_if_ready(self, now: Instant) -> Result<T, Self> {
        if self.is_ready(now) {
            Ok(self.value)
        } else {
            Err(self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new();
        let other = clock.clone();
        let start = clock.now();
        other.advance_ms(250);
        assert_eq!(clock.now() - start, Duration::from_millis(250));
    }

    #[test]
    fn delayed_value_waits_for_deadline() {
        let clock = ManualClock::new();
        let pending = Delayed::new("done", clock.now(), Duration::from_millis(1000));

        clock.advance_ms(999);
        let pending = match pending.take_if_ready(clock.now()) {
            Ok(_) => panic!("ready too early"),
            Err(pending) => pending,
        };

        clock.advance_ms(1);
        assert_eq!(pending.take_if_ready(clock.now()).unwrap(), "done");
    }
}
