//! Spawning and difficulty escalation
//!
//! Three recurring timers drive a run: fruit drops, bomb drops, and the
//! difficulty ramp. Each escalation speeds up bombs already in flight (their
//! fall speed is scaled at tick time), shortens the bomb cadence down to a
//! floor, and drops one extra bomb straight away.

use std::time::Duration;

use glam::Vec2;
use rand::Rng;

use super::entity::{EntityKind, FallingEntity};
use super::state::{GameEvent, GameState};
use super::timer::IntervalTimer;
use crate::consts::{BOMB_TAG, ENTITY_RADIUS, FRUIT_TAGS};
use crate::tuning::Tuning;

/// Random x along the top edge that keeps the whole entity on screen
pub fn random_spawn_x(area_width: f32, radius: f32, rng: &mut impl Rng) -> f32 {
    if area_width <= radius * 2.0 {
        return area_width / 2.0;
    }
    rng.random_range(radius..area_width - radius)
}

/// Add a new entity just above the play area. Returns its id.
pub fn spawn(state: &mut GameState, kind: EntityKind, tuning: &Tuning, rng: &mut impl Rng) -> u32 {
    let id = state.next_entity_id();
    let (speed, tag) = match kind {
        EntityKind::Fruit => (
            rng.random_range(tuning.fruit_speed()),
            FRUIT_TAGS[rng.random_range(0..FRUIT_TAGS.len())],
        ),
        EntityKind::Bomb => (rng.random_range(tuning.bomb_speed()), BOMB_TAG),
    };
    let x = random_spawn_x(state.width, ENTITY_RADIUS, rng);

    state.pool_mut(kind).push(FallingEntity {
        id,
        kind,
        pos: Vec2::new(x, -ENTITY_RADIUS),
        radius: ENTITY_RADIUS,
        speed,
        tag,
    });
    state.push_event(GameEvent::Spawned { id, kind });
    log::debug!("Spawned {:?} #{} at x={:.1} speed={:.2}", kind, id, x, speed);
    id
}

/// Send an entity back to the top at a fresh x. Speed and tag are kept.
pub fn recycle(entity: &mut FallingEntity, area_width: f32, rng: &mut impl Rng) {
    entity.pos = Vec2::new(
        random_spawn_x(area_width, entity.radius, rng),
        -entity.radius,
    );
}

/// Owns the run's recurring timers
#[derive(Debug, Clone)]
pub struct Spawner {
    fruit: IntervalTimer,
    bomb: IntervalTimer,
    difficulty: IntervalTimer,
}

impl Spawner {
    /// Stopped timers at baseline cadence
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            fruit: IntervalTimer::new(tuning.fruit_interval()),
            bomb: IntervalTimer::new(tuning.bomb_interval()),
            difficulty: IntervalTimer::new(tuning.difficulty_interval()),
        }
    }

    /// Back to baseline cadence, all timers stopped
    pub fn reset(&mut self, tuning: &Tuning) {
        *self = Self::new(tuning);
    }

    /// Current bomb cadence
    pub fn bomb_interval(&self) -> Duration {
        self.bomb.period()
    }

    /// Start every timer from zero at its current cadence
    pub fn start(&mut self) {
        self.fruit.start();
        self.bomb.start();
        self.difficulty.start();
    }

    pub fn stop(&mut self) {
        self.fruit.stop();
        self.bomb.stop();
        self.difficulty.stop();
    }

    /// Whether any timer can still fire
    pub fn is_active(&self) -> bool {
        self.fruit.is_running() || self.bomb.is_running() || self.difficulty.is_running()
    }

    /// Run every timer forward by `dt`, spawning and escalating as they fire
    pub fn advance(
        &mut self,
        dt: Duration,
        state: &mut GameState,
        tuning: &Tuning,
        rng: &mut impl Rng,
    ) {
        for _ in 0..self.fruit.advance(dt) {
            spawn(state, EntityKind::Fruit, tuning, rng);
        }
        for _ in 0..self.bomb.advance(dt) {
            spawn(state, EntityKind::Bomb, tuning, rng);
        }
        for _ in 0..self.difficulty.advance(dt) {
            self.escalate(state, tuning, rng);
        }
    }

    /// One step up the difficulty curve
    pub fn escalate(&mut self, state: &mut GameState, tuning: &Tuning, rng: &mut impl Rng) {
        state.difficulty += tuning.difficulty_step;

        let interval = tuning.next_bomb_interval(self.bomb.period());
        self.bomb.restart(interval);

        let bomb_interval_ms = interval.as_millis() as u64;
        state.push_event(GameEvent::DifficultyRaised {
            difficulty: state.difficulty,
            bomb_interval_ms,
        });
        log::debug!(
            "Difficulty raised to {:.1}, bombs every {}ms",
            state.difficulty,
            bomb_interval_ms
        );

        spawn(state, EntityKind::Bomb, tuning, rng);
    }
}
