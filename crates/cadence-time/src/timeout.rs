//! Armed deadlines
//!
//! Timeouts are not a scheduler primitive: a production compares the clock
//! against the stored deadline every time it evaluates completion.

use std::time::Duration;

use cadence_core::Millis;

use crate::Clock;

/// At most one armed deadline
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Timeout {
    deadline: Option<Millis>,
}

impl Timeout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the deadline `duration` after the clock's current reading
    pub fn start(&mut self, clock: &dyn Clock, duration: Duration) -> Millis {
        let deadline = clock.now().saturating_add(duration);
        self.deadline = Some(deadline);
        deadline
    }

    /// Disarm
    pub fn clear(&mut self) {
        self.deadline = None;
    }

    pub fn deadline(&self) -> Option<Millis> {
        self.deadline
    }

    #[inline]
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Deadline reached (inclusive); an unarmed timeout never expires
    pub fn expired(&self, clock: &dyn Clock) -> bool {
        self.expired_at(clock.now())
    }

    pub fn expired_at(&self, now: Millis) -> bool {
        matches!(self.deadline, Some(deadline) if now >= deadline)
    }

    /// Time left before expiry
    pub fn remaining(&self, clock: &dyn Clock) -> Option<Duration> {
        self.deadline.map(|deadline| deadline.since(clock.now()))
    }
}
