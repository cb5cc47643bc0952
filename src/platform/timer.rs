//! Single-shot and periodic timers
//!
//! Timers hold deadlines only. The owner polls them with the current time in
//! milliseconds, so nothing fires behind its back and cancelling is a plain
//! state change.

/// Fires once when `now` reaches the deadline
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Timeout {
    deadline: Option<f64>,
}

impl Timeout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm (or re-arm) to fire `delay_ms` after `now`
    pub fn arm(&mut self, now: f64, delay_ms: f64) {
        self.deadline = Some(now + delay_ms.max(0.0));
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<f64> {
        self.deadline
    }

    /// True exactly once, on the first poll at or after the deadline
    pub fn fire(&mut self, now: f64) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Fires every `period_ms` until cancelled
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Interval {
    next: Option<f64>,
    period: f64,
}

impl Interval {
    pub fn new() -> Self {
        Self::default()
    }

    /// First firing happens one full period after `now`
    pub fn arm(&mut self, now: f64, period_ms: f64) {
        self.period = period_ms.max(1.0);
        self.next = Some(now + self.period);
    }

    pub fn cancel(&mut self) {
        self.next = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next.is_some()
    }

    /// Number of periods that elapsed since the last poll
    pub fn ticks(&mut self, now: f64) -> u32 {
        let Some(mut next) = self.next else {
            return 0;
        };
        let mut count = 0;
        while now >= next {
            count += 1;
            next += self.period;
        }
        self.next = Some(next);
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_fires_once() {
        let mut t = Timeout::new();
        assert!(!t.fire(1e9));
        t.arm(1000.0, 500.0);
        assert!(!t.fire(1499.0));
        assert!(t.fire(1500.0));
        assert!(!t.fire(2000.0));
        assert!(!t.is_armed());
    }

    #[test]
    fn test_timeout_cancel() {
        let mut t = Timeout::new();
        t.arm(0.0, 10.0);
        t.cancel();
        assert!(!t.fire(100.0));
    }

    #[test]
    fn test_interval_counts_missed_periods() {
        let mut i = Interval::new();
        i.arm(0.0, 1000.0);
        assert_eq!(i.ticks(999.0), 0);
        assert_eq!(i.ticks(1000.0), 1);
        assert_eq!(i.ticks(3500.0), 2);
        assert_eq!(i.ticks(3600.0), 0);
        assert_eq!(i.ticks(4000.0), 1);
        i.cancel();
        assert_eq!(i.ticks(10_000.0), 0);
    }
}
