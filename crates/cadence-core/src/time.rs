//! Time primitives for Cadence
//!
//! Target hardware exposes a millisecond tick counter, so every deadline is
//! a [`Millis`] reading of a monotonic clock.

use std::fmt;
use std::ops::{Add, Sub};
use std::time::Duration;

/// Monotonic clock reading in milliseconds
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Millis(pub u64);

impl Millis {
    pub const ZERO: Millis = Millis(0);
    pub const MAX: Millis = Millis(u64::MAX);

    #[inline]
    pub fn new(ms: u64) -> Self {
        Millis(ms)
    }

    #[inline]
    pub fn as_millis(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn saturating_add(self, duration: Duration) -> Self {
        let ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        Millis(self.0.saturating_add(ms))
    }

    /// Time elapsed since an earlier reading (zero if `earlier` is later)
    #[inline]
    pub fn since(self, earlier: Millis) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }
}

impl Add<Duration> for Millis {
    type Output = Millis;

    #[inline]
    fn add(self, rhs: Duration) -> Self::Output {
        self.saturating_add(rhs)
    }
}

impl Sub for Millis {
    type Output = Duration;

    #[inline]
    fn sub(self, rhs: Millis) -> Self::Output {
        self.since(rhs)
    }
}

impl From<Duration> for Millis {
    fn from(d: Duration) -> Self {
        Millis::ZERO.saturating_add(d)
    }
}

impl fmt::Debug for Millis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

impl fmt::Display for Millis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_millis_add_duration() {
        let t = Millis::new(1000) + Duration::from_millis(250);
        assert_eq!(t, Millis(1250));
    }

    #[test]
    fn test_millis_saturates() {
        let t = Millis::MAX + Duration::from_secs(1);
        assert_eq!(t, Millis::MAX);
        assert_eq!(Millis(5).since(Millis(10)), Duration::ZERO);
    }

    proptest! {
        #[test]
        fn prop_add_then_since_recovers_duration(start in 0u64..1_000_000, ms in 0u64..1_000_000) {
            let t0 = Millis(start);
            let t1 = t0 + Duration::from_millis(ms);
            prop_assert_eq!(t1 - t0, Duration::from_millis(ms));
        }
    }
}
