//! One-shot timer slot on a logical clock.
//!
//! A [`TimerSlot`] holds at most one pending deadline. It never fires on its
//! own: the owner checks [`due_at`](TimerSlot::due_at) against the clock
//! and calls [`take_due`](TimerSlot::take_due) to disarm and fire it.
//! Scheduling always replaces the pending deadline, so a slot can never leak
//! an orphaned timer.

use std::time::Duration;

/// A single cancellable deadline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimerSlot {
    deadline: Option<Duration>,
}

impl TimerSlot {
    #[must_use]
    pub const fn new() -> Self {
        Self { deadline: None }
    }

    /// Arm the slot to fire `delay` after `now`, replacing any pending
    /// deadline.
    pub fn schedule(&mut self, now: Duration, delay: Duration) {
        let deadline = now.saturating_add(delay);
        if let Some(previous) = self.deadline {
            tracing::trace!(?previous, ?deadline, "timer rescheduled");
        } else {
            tracing::trace!(?deadline, "timer scheduled");
        }
        self.deadline = Some(deadline);
    }

    /// Disarm the slot. Returns whether a deadline was pending.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Pending deadline, if armed.
    #[must_use]
    pub const fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Pending deadline if it is at or before `now`.
    #[must_use]
    pub fn due_at(&self, now: Duration) -> Option<Duration> {
        self.deadline().filter(|deadline| *deadline <= now)
    }

    /// Disarm and return the deadline if it has passed.
    pub fn take_due(&mut self, now: Duration) -> Option<Duration> {
        let deadline = self.due_at(now)?;
        self.deadline = None;
        Some(deadline)
    }

    /// Time left until the deadline, zero once it has passed.
    #[must_use]
    pub fn remaining(&self, now: Duration) -> Option<Duration> {
        self.deadline.map(|deadline| deadline.saturating_sub(now))
    }
}
