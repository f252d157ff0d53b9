// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Cancellable scheduled tasks.
//!
//! A [`ScheduledTask`] is a one-shot deadline driven by the session's
//! `tick`. Arming an armed task pushes the deadline out again, which is
//! exactly a debounce.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct ScheduledTask {
    delay: Duration,
    deadline: Option<Instant>,
}

impl ScheduledTask {
    pub fn new(delay: Duration) -> Self {
        Self { delay, deadline: None }
    }

    /// Start (or restart) the countdown from `now`.
    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns true exactly once per arming, when `now` reaches the deadline.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
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
    fn test_fires_once_after_delay() {
        let start = Instant::now();
        let mut task = ScheduledTask::new(Duration::from_secs(2));
        task.arm(start);

        assert!(!task.fire_if_due(start + Duration::from_millis(1999)));
        assert!(task.fire_if_due(start + Duration::from_secs(2)));
        assert!(!task.fire_if_due(start + Duration::from_secs(3)));
        assert!(!task.is_armed());
    }

    #[test]
    fn test_rearm_pushes_deadline() {
        let start = Instant::now();
        let mut task = ScheduledTask::new(Duration::from_secs(2));
        task.arm(start);
        task.arm(start + Duration::from_secs(1));

        assert!(!task.fire_if_due(start + Duration::from_secs(2)));
        assert!(task.fire_if_due(start + Duration::from_secs(3)));
    }

    #[test]
    fn test_cancel_prevents_firing() {
        let start = Instant::now();
        let mut task = ScheduledTask::new(Duration::from_millis(10));
        task.arm(start);
        task.cancel();
        assert!(!task.fire_if_due(start + Duration::from_secs(1)));
    }
}
