use std::time::Duration;

use tokio::time::Instant;

/// Settles a rapidly changing value
///
/// Every `push` restarts the quiet period. Once the period elapses without a
/// new push, `fire` yields the pending value, but only if it differs from the
/// last value it settled on. The timer itself is driven by the owner, which
/// sleeps until `deadline()`.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
    settled: T,
}

impl<T: Clone + PartialEq> Debouncer<T> {
    pub fn new(initial: T, delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            settled: initial,
        }
    }

    /// Records a new input value and restarts the quiet period from `now`
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    /// When the pending value settles, if any
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    /// Returns the newly settled value once its deadline has passed
    ///
    /// Returns `None` while the quiet period is still running, when nothing is
    /// pending, or when the settled value did not change.
    pub fn fire(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, deadline)) if *deadline <= now => {}
            _ => return None,
        }

        let (value, _) = self.pending.take()?;
        if value == self.settled {
            return None;
        }

        self.settled = value.clone();
        Some(value)
    }

    /// Drops any pending value without settling it
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Forces the settled value and drops anything pending
    ///
    /// The next value pushed is compared against `value`, so re-entering what
    /// was settled before the reset fires again.
    pub fn reset(&mut self, value: T) {
        self.pending = None;
        self.settled = value;
    }

    pub fn settled(&self) -> &T {
        &self.settled
    }
}
