//! Debounced value
//!
//! [`Debouncer`] turns a stream of rapid updates into a settled value that
//! only changes once the input has been quiet for the configured delay. It
//! holds no timer thread: callers feed it instants and ask for
//! [`Debouncer::deadline`] to know when to poll next, which keeps it usable
//! from an event loop and testable with a simulated clock.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Pending<T> {
    value: T,
    deadline: Instant,
}

/// Cancellable delayed emission of the latest input value
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    settled: T,
    pending: Option<Pending<T>>,
}

impl<T: Clone + PartialEq> Debouncer<T> {
    pub fn new(initial: T, delay: Duration) -> Self {
        Self {
            delay,
            settled: initial,
            pending: None,
        }
    }

    /// The last emitted (settled) value.
    pub fn value(&self) -> &T {
        &self.settled
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record a new input at `now`, discarding any pending emission and
    /// re-arming the timer. Returning to the settled value disarms it.
    pub fn arm(&mut self, value: T, now: Instant) {
        if value == self.settled {
            self.pending = None;
            return;
        }
        self.pending = Some(Pending {
            value,
            deadline: now + self.delay,
        });
    }

    /// Drop the pending emission, if any.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending value becomes due.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Time left before the pending value is due, zero if overdue.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.deadline().map(|d| d.saturating_duration_since(now))
    }

    /// Emit the pending value once its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some(p) if now >= p.deadline => {}
            _ => return None,
        }
        let pending = self.pending.take()?;
        self.settled = pending.value.clone();
        Some(pending.value)
    }
}
