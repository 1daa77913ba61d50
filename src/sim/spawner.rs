//! Fixed-interval entity spawn timing
//!
//! The caller only advances a spawner while the session is Playing, so
//! leaving Playing stops emission immediately and nothing fires
//! retroactively on re-entry.

use crate::ms_to_ticks;

/// Counts down ticks between spawns
#[derive(Debug, Clone)]
pub struct Spawner {
    period: u32,
    countdown: u32,
}

impl Spawner {
    /// A spawner firing every `period_ms` of wall-clock time at the nominal tick rate
    pub fn from_millis(period_ms: u32) -> Self {
        let period = ms_to_ticks(period_ms);
        Self {
            period,
            countdown: period,
        }
    }

    /// Advance one tick; true when a spawn is due this tick
    pub fn fire(&mut self) -> bool {
        self.countdown -= 1;
        if self.countdown == 0 {
            self.countdown = self.period;
            true
        } else {
            false
        }
    }

    /// Restart the interval from a full period
    pub fn reset(&mut self) {
        self.countdown = self.period;
    }

    pub fn period_ticks(&self) -> u32 {
        self.period
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_per_period() {
        let mut spawner = Spawner::from_millis(100); // 6 ticks
        let mut fired = 0;
        for _ in 0..60 {
            if spawner.fire() {
                fired += 1;
            }
        }
        assert_eq!(fired, 10);
    }

    #[test]
    fn test_reset_restarts_interval() {
        let mut spawner = Spawner::from_millis(100); // 6 ticks
        for _ in 0..5 {
            assert!(!spawner.fire());
        }
        spawner.reset();
        for _ in 0..5 {
            assert!(!spawner.fire());
        }
        assert!(spawner.fire());
    }
}
