//! Single-purpose one-shot deadline.
//!
//! Each timer purpose owns exactly one `TimerSlot`. Arming always replaces the
//! previous deadline, so a superseded timer can never fire against newer state.
//! Firing is observed by polling with the current instant; the slot never calls
//! back on its own.

use std::time::{Duration, Instant};

/// One authoritative deadline for one purpose.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimerSlot {
    deadline: Option<Instant>,
}

impl TimerSlot {
    /// Create a disarmed slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the slot to fire `duration` after `now`, cancelling any earlier deadline.
    pub fn arm(&mut self, now: Instant, duration: Duration) {
        self.deadline = Some(now + duration);
    }

    /// Disarm the slot. No-op if already disarmed.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Fire the slot if its deadline has been reached.
    ///
    /// Returns `true` exactly once per arming; the slot is disarmed afterwards.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Current deadline, if armed.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// True while a deadline is set.
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }
}

/// Earliest of two optional deadlines.
pub fn earliest(a: Option<Instant>, b: Option<Instant>) -> Option<Instant> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, None) => a,
        (None, b) => b,
    }
}
