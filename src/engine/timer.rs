//! Scoped auto-advance timer.
//!
//! An [`AutoAdvance`] is acquired when playback starts and owned by the
//! controller while it runs. Dropping it is the only way to cancel it: the
//! pending deadline lives inside the value, so once it is gone no further
//! tick can be reported.

use std::time::Duration;
use tracing::{debug, trace};

/// Shortest period the timer accepts. Anything smaller is raised to this.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Repeating fixed-period deadline.
#[derive(Debug)]
pub struct AutoAdvance {
    period: Duration,
    next_due: Duration,
    fired: u64,
}

impl AutoAdvance {
    /// Start a timer at `now`; the first tick is due one period later.
    #[must_use]
    pub fn start(now: Duration, period: Duration) -> Self {
        let period = period.max(MIN_PERIOD);
        debug!(period_ms = period.as_millis(), "auto-advance acquired");
        Self {
            period,
            next_due: now.saturating_add(period),
            fired: 0,
        }
    }

    /// Tick period.
    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }

    /// Absolute time at which the next tick is due.
    #[must_use]
    pub const fn next_due(&self) -> Duration {
        self.next_due
    }

    /// Ticks reported so far.
    #[must_use]
    pub const fn fired(&self) -> u64 {
        self.fired
    }

    /// Time remaining until the next tick, zero if already due.
    #[must_use]
    pub fn remaining(&self, now: Duration) -> Duration {
        self.next_due.saturating_sub(now)
    }

    /// Consume one due tick, if any.
    ///
    /// Deadlines advance by whole periods from the previous deadline, so a
    /// late poll reports every missed tick one call at a time.
    pub fn take_due(&mut self, now: Duration) -> bool {
        if now < self.next_due {
            return false;
        }
        self.next_due = self.next_due.saturating_add(self.period);
        self.fired += 1;
        trace!(fired = self.fired, "auto-advance tick due");
        true
    }
}

impl Drop for AutoAdvance {
    fn drop(&mut self) {
        debug!(fired = self.fired, "auto-advance released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_first_tick_is_one_period_out() {
        let timer = AutoAdvance::start(ms(100), ms(500));
        assert_eq!(timer.next_due(), ms(600));
        assert_eq!(timer.remaining(ms(100)), ms(500));
    }

    #[test]
    fn test_not_due_before_deadline() {
        let mut timer = AutoAdvance::start(Duration::ZERO, ms(500));
        assert!(!timer.take_due(ms(499)));
        assert_eq!(timer.fired(), 0);
    }

    #[test]
    fn test_due_at_deadline() {
        let mut timer = AutoAdvance::start(Duration::ZERO, ms(500));
        assert!(timer.take_due(ms(500)));
        assert!(!timer.take_due(ms(500)));
        assert_eq!(timer.next_due(), ms(1000));
    }

    #[test]
    fn test_late_poll_reports_each_missed_tick() {
        let mut timer = AutoAdvance::start(Duration::ZERO, ms(100));
        let mut count = 0;
        while timer.take_due(ms(350)) {
            count += 1;
        }
        assert_eq!(count, 3);
        assert_eq!(timer.fired(), 3);
        assert_eq!(timer.remaining(ms(350)), ms(50));
    }

    #[test]
    fn test_zero_period_is_raised() {
        let timer = AutoAdvance::start(Duration::ZERO, Duration::ZERO);
        assert_eq!(timer.period(), MIN_PERIOD);
    }
}
