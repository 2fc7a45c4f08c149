use alloc::vec::Vec;
use core::time::Duration;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LotterySettings {
    pub min_number: i32,
    pub max_number: i32,
    /// Seconds between two cursor moves while the roulette spins.
    pub interval_secs: f32,
}

impl LotterySettings {
    pub const fn pool_size(&self) -> i32 {
        if self.max_number < self.min_number {
            0
        } else {
            self.max_number - self.min_number + 1
        }
    }
}

impl Default for LotterySettings {
    fn default() -> Self {
        Self {
            min_number: 1,
            max_number: 75,
            interval_secs: 0.1,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LotteryOutcome {
    Ignored,
    Resumed,
    Stopped(i32),
}

impl LotteryOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

/// Roulette over the numbers that have not been drawn yet.
///
/// While running, the cursor moves one slot per interval. Stopping draws the number under the
/// cursor and removes it from the pool, so no number comes up twice.
#[derive(Clone, Debug, PartialEq)]
pub struct Lottery {
    settings: LotterySettings,
    pool: Vec<i32>,
    cursor: usize,
    running: bool,
    interval: Interval,
}

impl Lottery {
    pub fn new(settings: LotterySettings) -> Self {
        Self {
            settings,
            pool: Vec::new(),
            cursor: 0,
            running: false,
            interval: Interval::new(seconds(settings.interval_secs)),
        }
    }

    /// Refills and shuffles the pool. On failure the pool stays empty.
    pub fn init<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        self.running = false;
        self.cursor = 0;
        self.interval.reset();
        self.pool.clear();
        self.pool = shuffled_range(rng, self.settings.min_number, self.settings.max_number)?;
        Ok(())
    }

    pub fn run(&mut self) {
        if !self.pool.is_empty() {
            self.running = true;
            self.interval.reset();
        }
    }

    pub fn halt(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn remaining(&self) -> usize {
        self.pool.len()
    }

    /// Number currently under the cursor.
    pub fn current(&self) -> Option<i32> {
        self.pool.get(self.cursor).copied()
    }

    pub fn contains(&self, number: i32) -> bool {
        self.pool.contains(&number)
    }

    /// Button press: stops and draws while running, resumes while stopped if allowed.
    pub fn press(&mut self, can_restart: bool) -> LotteryOutcome {
        if self.pool.is_empty() {
            return LotteryOutcome::Ignored;
        }

        if self.running {
            self.running = false;
            let number = self.pool.remove(self.cursor);
            if self.cursor >= self.pool.len() {
                self.cursor = 0;
            }
            log::debug!("Lottery drew {number}, {} left", self.pool.len());
            LotteryOutcome::Stopped(number)
        } else if can_restart {
            self.run();
            LotteryOutcome::Resumed
        } else {
            LotteryOutcome::Ignored
        }
    }

    /// Advances the cursor when the interval fires. Returns the new number under the cursor.
    pub fn tick(&mut self, delta: Duration) -> Option<i32> {
        if !self.running || !self.interval.tick(delta) {
            return None;
        }
        self.cursor = (self.cursor + 1) % self.pool.len();
        self.current()
    }
}
