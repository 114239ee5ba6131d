//! Data-driven game balance
//!
//! Every number that shapes the feel of a run lives here. Defaults match the
//! shipped game; pages may override them with an inline JSON blob.

use std::ops::Range;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a tuning blob was rejected
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("play area must be positive, got {width}x{height}")]
    PlayArea { width: f32, height: f32 },
    #[error("basket ({width}x{height}) does not fit a {area_width} wide play area")]
    Basket {
        width: f32,
        height: f32,
        area_width: f32,
    },
    #[error("{name} speed range {min}..{max} is empty or negative")]
    SpeedRange {
        name: &'static str,
        min: f32,
        max: f32,
    },
    #[error("{0} interval must be non-zero")]
    ZeroInterval(&'static str),
    #[error("bomb interval floor {floor_ms}ms is above the baseline {baseline_ms}ms")]
    BombFloor { floor_ms: u64, baseline_ms: u64 },
    #[error("difficulty must start positive and never decrease (start {start}, step {step})")]
    Difficulty { start: f32, step: f32 },
}

/// Game balance knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Play area ===
    pub width: f32,
    pub height: f32,

    // === Basket ===
    pub basket_width: f32,
    pub basket_height: f32,
    /// Horizontal speed while a direction key is held (units/frame)
    pub basket_speed: f32,
    /// Gap between the basket's bottom edge and the play area bottom
    pub basket_margin: f32,

    // === Falling entities (units/frame) ===
    pub fruit_speed_min: f32,
    pub fruit_speed_max: f32,
    pub bomb_speed_min: f32,
    pub bomb_speed_max: f32,

    // === Cadences (ms) ===
    pub fruit_interval_ms: u64,
    pub bomb_interval_ms: u64,
    pub bomb_interval_step_ms: u64,
    pub bomb_interval_floor_ms: u64,
    pub difficulty_interval_ms: u64,

    // === Difficulty ===
    pub difficulty_start: f32,
    pub difficulty_step: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,

            basket_width: 80.0,
            basket_height: 20.0,
            basket_speed: 7.0,
            basket_margin: 10.0,

            fruit_speed_min: 2.0,
            fruit_speed_max: 5.0,
            bomb_speed_min: 2.0,
            bomb_speed_max: 4.0,

            fruit_interval_ms: 10_000,
            bomb_interval_ms: 4_000,
            bomb_interval_step_ms: 500,
            bomb_interval_floor_ms: 1_000,
            difficulty_interval_ms: 3_000,

            difficulty_start: 1.0,
            difficulty_step: 0.1,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON blob. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(TuningError::PlayArea {
                width: self.width,
                height: self.height,
            });
        }
        if !(self.basket_width > 0.0 && self.basket_height > 0.0)
            || self.basket_width > self.width
        {
            return Err(TuningError::Basket {
                width: self.basket_width,
                height: self.basket_height,
                area_width: self.width,
            });
        }
        check_speed_range("basket", 0.0, self.basket_speed)?;
        check_speed_range("fruit", self.fruit_speed_min, self.fruit_speed_max)?;
        check_speed_range("bomb", self.bomb_speed_min, self.bomb_speed_max)?;

        if self.fruit_interval_ms == 0 {
            return Err(TuningError::ZeroInterval("fruit"));
        }
        if self.bomb_interval_floor_ms == 0 {
            return Err(TuningError::ZeroInterval("bomb floor"));
        }
        if self.difficulty_interval_ms == 0 {
            return Err(TuningError::ZeroInterval("difficulty"));
        }
        if self.bomb_interval_floor_ms > self.bomb_interval_ms {
            return Err(TuningError::BombFloor {
                floor_ms: self.bomb_interval_floor_ms,
                baseline_ms: self.bomb_interval_ms,
            });
        }
        if !(self.difficulty_start > 0.0 && self.difficulty_step >= 0.0) {
            return Err(TuningError::Difficulty {
                start: self.difficulty_start,
                step: self.difficulty_step,
            });
        }
        Ok(())
    }

    pub fn fruit_speed(&self) -> Range<f32> {
        self.fruit_speed_min..self.fruit_speed_max
    }

    pub fn bomb_speed(&self) -> Range<f32> {
        self.bomb_speed_min..self.bomb_speed_max
    }

    pub fn fruit_interval(&self) -> Duration {
        Duration::from_millis(self.fruit_interval_ms)
    }

    pub fn bomb_interval(&self) -> Duration {
        Duration::from_millis(self.bomb_interval_ms)
    }

    pub fn difficulty_interval(&self) -> Duration {
        Duration::from_millis(self.difficulty_interval_ms)
    }

    /// Bomb cadence after one more escalation, clamped to the floor
    pub fn next_bomb_interval(&self, current: Duration) -> Duration {
        let step = Duration::from_millis(self.bomb_interval_step_ms);
        let floor = Duration::from_millis(self.bomb_interval_floor_ms);
        current.saturating_sub(step).max(floor)
    }
}

fn check_speed_range(name: &'static str, min: f32, max: f32) -> Result<(), TuningError> {
    // `random_range` panics on an empty range, so min == max is rejected too
    if min >= 0.0 && max > min {
        Ok(())
    } else {
        Err(TuningError::SpeedRange { name, min, max })
    }
}
