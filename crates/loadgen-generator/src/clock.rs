//! Time sources for entry timestamps.

use chrono::{DateTime, Duration, Utc};

/// Source of the current instant.
///
/// Line timestamps and batch creation times are read through this trait so
/// that tests can pin them.
pub trait Clock {
    fn now(&mut self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&mut self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that starts at a fixed instant and advances by `step` on every read.
#[derive(Debug, Clone)]
pub struct SteppedClock {
    next: DateTime<Utc>,
    step: Duration,
}

impl SteppedClock {
    pub fn new(start: DateTime<Utc>, step: Duration) -> Self {
        Self { next: start, step }
    }

    /// A clock that always returns `instant`.
    pub fn fixed(instant: DateTime<Utc>) -> Self {
        Self::new(instant, Duration::zero())
    }
}

impl Clock for SteppedClock {
    fn now(&mut self) -> DateTime<Utc> {
        let now = self.next;
        self.next += self.step;
        now
    }
}

impl<C: Clock + ?Sized> Clock for &mut C {
    fn now(&mut self) -> DateTime<Utc> {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_stepped_clock_advances() {
        let start = Utc.timestamp_opt(1_000, 0).unwrap();
        let mut clock = SteppedClock::new(start, Duration::milliseconds(5));
        assert_eq!(clock.now(), start);
        assert_eq!(clock.now(), start + Duration::milliseconds(5));
        assert_eq!(clock.now(), start + Duration::milliseconds(10));
    }

    #[test]
    fn test_fixed_clock() {
        let start = Utc.timestamp_opt(42, 0).unwrap();
        let mut clock = SteppedClock::fixed(start);
        assert_eq!(clock.now(), clock.now());
    }
}
