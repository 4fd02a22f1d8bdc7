//! Clock implementations for Cadence

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use cadence_core::Millis;

/// Monotonic millisecond clock
/// INVARIANT: successive `now()` readings never decrease
pub trait Clock {
    fn now(&self) -> Millis;
}

/// Clock backed by the OS monotonic clock, zero at construction
#[derive(Clone, Debug)]
pub struct SystemClock {
    reference: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        SystemClock {
            reference: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Millis {
        Millis::from(self.reference.elapsed())
    }
}

/// Hand-driven clock
///
/// Clones share the same reading, so a test can keep one handle while the
/// production owns another.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    value: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start at a given reading
    pub fn starting_at(start: Millis) -> Self {
        ManualClock {
            value: Rc::new(Cell::new(start.as_millis())),
        }
    }

    /// Move forward by `dt`
    pub fn advance(&self, dt: Duration) -> Millis {
        let next = Millis(self.value.get()).saturating_add(dt);
        self.value.set(next.as_millis());
        next
    }

    /// Jump to `target`; only allowed to move forward
    pub fn set(&self, target: Millis) {
        if target.as_millis() > self.value.get() {
            self.value.set(target.as_millis());
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Millis {
        Millis(self.value.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_monotonic() {
        let clock = SystemClock::new();

        let t1 = clock.now();
        std::thread::sleep(Duration::from_millis(5));
        let t2 = clock.now();

        assert!(t2 >= t1);
        assert!(t2.since(t1) >= Duration::from_millis(1));
    }

    #[test]
    fn test_manual_clock_shared() {
        let clock = ManualClock::new();
        let handle = clock.clone();

        handle.advance(Duration::from_millis(250));
        assert_eq!(clock.now(), Millis(250));
    }

    #[test]
    fn test_manual_clock_never_goes_back() {
        let clock = ManualClock::starting_at(Millis(1000));

        clock.set(Millis(500));
        assert_eq!(clock.now(), Millis(1000));

        clock.set(Millis(1500));
        assert_eq!(clock.now(), Millis(1500));
    }
}
