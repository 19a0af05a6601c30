//! Timers: periodic tasks and one-shot deadlines polled from the UI loop.
//!
//! Nothing here sleeps or spawns. Every timer is advanced by passing the
//! current [`Instant`], which keeps the UI thread non-blocking and lets tests
//! drive time explicitly.

use std::time::{Duration, Instant};

/// A cancellable periodic task with explicit start/stop.
///
/// The first fire happens one full interval after [`start`](PeriodicTask::start).
/// If the loop stalls past several intervals, the missed fires are coalesced
/// into one and the schedule resumes from the next interval boundary.
#[derive(Debug, Clone)]
pub struct PeriodicTask {
    interval: Duration,
    next_due: Option<Instant>,
}

impl PeriodicTask {
    /// Create a stopped task. A zero interval is bumped to one millisecond.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            next_due: None,
        }
    }

    /// Schedule the task. Restarting a running task resets its phase.
    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now + self.interval);
    }

    /// Cancel the task. No further fires until the next `start`.
    pub fn stop(&mut self) {
        self.next_due = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// When the task fires next, if running.
    pub fn next_due(&self) -> Option<Instant> {
        self.next_due
    }

    /// Returns `true` if the task was due at `now`, and reschedules it.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(due) = self.next_due else {
            return false;
        };
        if now < due {
            return false;
        }

        let mut next = due + self.interval;
        while next <= now {
            next += self.interval;
        }
        self.next_due = Some(next);
        true
    }
}

/// A self-clearing flag: active from `arm` until its deadline passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Deadline {
    until: Option<Instant>,
}

impl Deadline {
    /// Arm (or re-arm) the flag for `duration` starting at `now`.
    pub fn arm(&mut self, now: Instant, duration: Duration) {
        self.until = Some(now + duration);
    }

    /// Whether the flag is still active at `now`.
    pub fn is_active(&self, now: Instant) -> bool {
        self.until.is_some_and(|until| now < until)
    }

    /// Clear the flag if it has expired. Returns `true` if it just cleared.
    pub fn expire(&mut self, now: Instant) -> bool {
        match self.until {
            Some(until) if now >= until => {
                self.until = None;
                true
            }
            _ => false,
        }
    }
}
