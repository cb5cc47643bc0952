//! Click-speed test
//!
//! Count clicks for a fixed number of seconds. The first click starts the
//! countdown and counts as a click.

use crate::platform::Interval;

const SECOND_MS: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickSpeedPhase {
    /// Waiting for the first click
    Ready,
    Running,
    /// Time is up; clicks are ignored until reset
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickSpeedResult {
    pub clicks: u64,
}

#[derive(Debug, Clone)]
pub struct ClickSpeedTest {
    pub phase: ClickSpeedPhase,
    pub clicks: u64,
    /// Whole seconds left on the countdown
    pub time_left: u32,
    duration: u32,
    countdown: Interval,
}

impl ClickSpeedTest {
    pub fn new(duration_secs: u32) -> Self {
        Self {
            phase: ClickSpeedPhase::Ready,
            clicks: 0,
            time_left: duration_secs,
            duration: duration_secs,
            countdown: Interval::new(),
        }
    }

    /// Handle a click on the test button
    pub fn click(&mut self, now: f64) {
        match self.phase {
            ClickSpeedPhase::Ready => {
                self.phase = ClickSpeedPhase::Running;
                self.clicks = 1;
                self.time_left = self.duration;
                self.countdown.arm(now, SECOND_MS);
                log::info!("Click-speed test started ({}s)", self.duration);
            }
            ClickSpeedPhase::Running => self.clicks += 1,
            ClickSpeedPhase::Finished => {}
        }
    }

    /// Advance the countdown. Returns the result once, when time runs out.
    pub fn poll(&mut self, now: f64) -> Option<ClickSpeedResult> {
        if self.phase != ClickSpeedPhase::Running {
            return None;
        }
        let elapsed = self.countdown.ticks(now);
        self.time_left = self.time_left.saturating_sub(elapsed);
        if self.time_left > 0 {
            return None;
        }

        self.countdown.cancel();
        self.phase = ClickSpeedPhase::Finished;
        log::info!("Click-speed test finished: {} clicks", self.clicks);
        Some(ClickSpeedResult {
            clicks: self.clicks,
        })
    }

    /// Stop any countdown and get ready for a new run
    pub fn reset(&mut self) {
        self.countdown.cancel();
        self.phase = ClickSpeedPhase::Ready;
        self.clicks = 0;
        self.time_left = self.duration;
    }

    pub fn is_running(&self) -> bool {
        self.phase == ClickSpeedPhase::Running
    }

    /// The button accepts clicks unless the run just finished
    pub fn accepts_clicks(&self) -> bool {
        self.phase != ClickSpeedPhase::Finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_run() {
        let mut test = ClickSpeedTest::new(10);
        test.click(0.0);
        assert!(test.is_running());
        assert_eq!(test.clicks, 1);

        for i in 1..=30 {
            test.click(i as f64 * 100.0);
        }
        assert_eq!(test.clicks, 31);
        assert_eq!(test.poll(3050.0), None);
        assert_eq!(test.time_left, 7);

        assert_eq!(test.poll(9999.0), None);
        assert_eq!(test.poll(10_000.0), Some(ClickSpeedResult { clicks: 31 }));
        assert_eq!(test.phase, ClickSpeedPhase::Finished);
        assert_eq!(test.poll(20_000.0), None);

        test.click(20_100.0);
        assert_eq!(test.clicks, 31);
        assert!(!test.accepts_clicks());
    }

    #[test]
    fn test_late_poll_still_finishes() {
        let mut test = ClickSpeedTest::new(10);
        test.click(500.0);
        assert_eq!(test.poll(60_000.0), Some(ClickSpeedResult { clicks: 1 }));
        assert_eq!(test.time_left, 0);
    }

    #[test]
    fn test_reset_cancels_countdown() {
        let mut test = ClickSpeedTest::new(10);
        test.click(0.0);
        test.click(10.0);
        test.reset();
        assert_eq!(test.phase, ClickSpeedPhase::Ready);
        assert_eq!(test.time_left, 10);
        assert_eq!(test.poll(50_000.0), None);

        test.click(50_000.0);
        assert_eq!(test.clicks, 1);
        assert_eq!(test.poll(59_999.0), None);
        assert!(test.poll(60_000.0).is_some());
    }
}
