//! Single-slot deferred callback for the progress refresh tick.
//!
//! The event loop owns the clock: it asks for the next deadline, sleeps on
//! input until then, and fires the tick with `take_due`.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct TickTimer {
    interval: Duration,
    deadline: Option<Instant>,
}

impl TickTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            deadline: None,
        }
    }

    /// Schedule the tick to run as soon as possible. Replaces any pending tick.
    pub fn post(&mut self, now: Instant) {
        self.deadline = Some(now);
    }

    /// Schedule the tick one interval after `now`. Replaces any pending tick.
    pub fn post_delayed(&mut self, now: Instant) {
        self.deadline = Some(now + self.interval);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Consume the pending tick if it is due at `now`.
    ///
    /// The slot is cleared; the callback must reschedule itself.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_delayed_is_due_after_one_interval() {
        let start = Instant::now();
        let mut timer = TickTimer::new(Duration::from_millis(500));
        timer.post_delayed(start);

        assert!(!timer.take_due(start + Duration::from_millis(499)));
        assert!(timer.is_pending());
        assert!(timer.take_due(start + Duration::from_millis(500)));
        assert!(!timer.is_pending());
        assert!(!timer.take_due(start + Duration::from_secs(5)));
    }

    #[test]
    fn reposting_replaces_the_pending_tick() {
        let start = Instant::now();
        let mut timer = TickTimer::new(Duration::from_millis(500));
        timer.post_delayed(start);
        timer.post(start);
        assert_eq!(timer.deadline(), Some(start));
        assert!(timer.take_due(start));
        assert!(!timer.take_due(start));
    }

    #[test]
    fn cancel_clears_the_slot() {
        let start = Instant::now();
        let mut timer = TickTimer::new(Duration::from_millis(10));
        timer.post(start);
        timer.cancel();
        assert!(timer.deadline().is_none());
        assert!(!timer.take_due(start + Duration::from_secs(1)));
    }
}
