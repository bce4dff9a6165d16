//! Single-slot debounced task, used for autosave.
//!
//! Every `schedule` replaces the pending deadline, so only the most recent
//! request can fire.

use std::time::{Duration, Instant};

/// Default quiet period before an autosave.
pub const AUTOSAVE_DELAY: Duration = Duration::from_secs(3);

#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    due: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, due: None }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// (Re)start the quiet period from `now`, dropping any pending deadline.
    pub fn schedule(&mut self, now: Instant) {
        self.due = Some(now + self.delay);
    }

    /// Drop the pending deadline without firing.
    pub fn cancel(&mut self) {
        self.due = None;
    }

    pub fn is_pending(&self) -> bool {
        self.due.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.due
    }

    /// Returns true exactly once when the deadline has passed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.due {
            Some(due) if now >= due => {
                self.due = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(AUTOSAVE_DELAY)
    }
}
