//! Reaction-time test
//!
//! After a random delay the screen turns green; the player clicks as fast as
//! possible. Clicking before the signal forfeits the attempt.

use rand::Rng;

use crate::platform::Timeout;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReactionPhase {
    Idle,
    /// Delay armed, signal not shown yet
    Waiting,
    /// Signal shown at `since` (ms)
    Ready { since: f64 },
    /// Clicked before the signal
    TooSoon,
    Measured { ms: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionOutcome {
    /// Click arrived while no attempt was live
    Ignored,
    TooSoon,
    Measured { ms: u64 },
}

#[derive(Debug, Clone)]
pub struct ReactionTest {
    pub phase: ReactionPhase,
    /// Previous measured time, 0 if none
    pub last_ms: u64,
    delay: Timeout,
    min_delay_ms: f64,
    max_delay_ms: f64,
}

impl ReactionTest {
    pub fn new(min_delay_ms: f64, max_delay_ms: f64) -> Self {
        Self {
            phase: ReactionPhase::Idle,
            last_ms: 0,
            delay: Timeout::new(),
            min_delay_ms,
            max_delay_ms,
        }
    }

    /// Begin an attempt with a random delay in `[min, max)`. Clears the previous time.
    pub fn start(&mut self, now: f64, rng: &mut impl Rng) {
        self.delay.cancel();
        self.last_ms = 0;
        let delay = rng.random_range(self.min_delay_ms..self.max_delay_ms);
        self.delay.arm(now, delay);
        self.phase = ReactionPhase::Waiting;
        log::debug!("Reaction signal in {:.0} ms", delay);
    }

    /// Show the signal once the delay has elapsed. Returns true when it turns green.
    pub fn poll(&mut self, now: f64) -> bool {
        if self.phase == ReactionPhase::Waiting && self.delay.fire(now) {
            self.phase = ReactionPhase::Ready { since: now };
            return true;
        }
        false
    }

    /// Handle a click on the reaction area
    pub fn click(&mut self, now: f64) -> ReactionOutcome {
        // A signal that is due but not yet polled counts from its deadline
        if self.phase == ReactionPhase::Waiting {
            if let Some(deadline) = self.delay.deadline() {
                if now >= deadline {
                    self.delay.cancel();
                    self.phase = ReactionPhase::Ready { since: deadline };
                }
            }
        }

        match self.phase {
            ReactionPhase::Waiting => {
                self.delay.cancel();
                self.phase = ReactionPhase::TooSoon;
                log::info!("Reaction test: clicked too soon");
                ReactionOutcome::TooSoon
            }
            ReactionPhase::Ready { since } => {
                let ms = (now - since).max(0.0).round() as u64;
                self.phase = ReactionPhase::Measured { ms };
                self.last_ms = ms;
                log::info!("Reaction time: {} ms", ms);
                ReactionOutcome::Measured { ms }
            }
            _ => ReactionOutcome::Ignored,
        }
    }

    /// Cancel any pending signal and clear the last result
    pub fn reset(&mut self) {
        self.delay.cancel();
        self.phase = ReactionPhase::Idle;
        self.last_ms = 0;
    }

    pub fn is_pending(&self) -> bool {
        self.delay.is_armed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn test_and_rng() -> (ReactionTest, Pcg32) {
        (ReactionTest::new(2000.0, 5000.0), Pcg32::seed_from_u64(11))
    }

    #[test]
    fn test_delay_within_window() {
        let (mut test, mut rng) = test_and_rng();
        for _ in 0..50 {
            test.start(0.0, &mut rng);
            assert!(!test.poll(1999.0));
            assert!(test.poll(5000.0));
            assert!(matches!(test.phase, ReactionPhase::Ready { .. }));
        }
    }

    #[test]
    fn test_click_too_soon() {
        let (mut test, mut rng) = test_and_rng();
        test.start(0.0, &mut rng);
        assert_eq!(test.click(1000.0), ReactionOutcome::TooSoon);
        assert_eq!(test.phase, ReactionPhase::TooSoon);
        assert!(!test.is_pending());
        assert!(!test.poll(10_000.0));
        assert_eq!(test.click(10_100.0), ReactionOutcome::Ignored);
    }

    #[test]
    fn test_measured_reaction() {
        let (mut test, mut rng) = test_and_rng();
        test.start(0.0, &mut rng);
        assert!(test.poll(6000.0));
        assert_eq!(test.click(6234.0), ReactionOutcome::Measured { ms: 234 });
        assert_eq!(test.last_ms, 234);
        assert_eq!(test.click(6500.0), ReactionOutcome::Ignored);
    }

    #[test]
    fn test_new_attempt_clears_last_time() {
        let (mut test, mut rng) = test_and_rng();
        test.start(0.0, &mut rng);
        test.poll(6000.0);
        test.click(6234.0);
        test.start(7000.0, &mut rng);
        assert_eq!(test.last_ms, 0);
        assert_eq!(test.phase, ReactionPhase::Waiting);
    }

    #[test]
    fn test_unpolled_signal_counts_from_deadline() {
        let (mut test, mut rng) = test_and_rng();
        test.start(0.0, &mut rng);
        let ReactionOutcome::Measured { ms } = test.click(5200.0) else {
            panic!("expected a measurement");
        };
        assert!((200..=3200).contains(&ms));
    }

    #[test]
    fn test_idle_click_ignored_and_reset() {
        let (mut test, mut rng) = test_and_rng();
        assert_eq!(test.click(0.0), ReactionOutcome::Ignored);
        test.start(0.0, &mut rng);
        test.reset();
        assert!(!test.is_pending());
        assert!(!test.poll(10_000.0));
        assert_eq!(test.phase, ReactionPhase::Idle);
    }
}
