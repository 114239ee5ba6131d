//! Recurring interval timers driven by the simulation clock
//!
//! Replaces wall-clock callbacks: a timer only moves forward when the game
//! advances it, so a stopped timer can never fire.

use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalTimer {
    period: Duration,
    elapsed: Duration,
    running: bool,
}

impl IntervalTimer {
    /// A stopped timer with the given period
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            elapsed: Duration::ZERO,
            running: false,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Start counting from zero
    pub fn start(&mut self) {
        self.elapsed = Duration::ZERO;
        self.running = true;
    }

    /// Stop and discard partial progress
    pub fn stop(&mut self) {
        self.elapsed = Duration::ZERO;
        self.running = false;
    }

    /// Tear down and start again with a new period
    pub fn restart(&mut self, period: Duration) {
        self.period = period;
        self.start();
    }

    /// Advance by `dt`, returning how many times the timer fired
    pub fn advance(&mut self, dt: Duration) -> u32 {
        if !self.running || self.period.is_zero() {
            return 0;
        }
        self.elapsed += dt;
        let mut fired = 0;
        while self.elapsed >= self.period {
            self.elapsed -= self.period;
            fired += 1;
        }
        fired
    }
}
