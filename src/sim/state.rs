//! Game state and core simulation types
//!
//! Everything the renderer needs for a frame lives here.

use serde::{Deserialize, Serialize};

use super::entity::{Basket, EntityKind, FallingEntity};
use crate::tuning::Tuning;

/// Lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameMode {
    /// Waiting for the first start
    #[default]
    Idle,
    /// Active gameplay
    Running,
    /// Frozen mid-run
    Paused,
    /// A bomb reached the basket
    Ended,
}

impl GameMode {
    /// Whether ticks and timers should advance
    pub fn is_active(self) -> bool {
        self == GameMode::Running
    }
}

/// Things that happened since the adapter last looked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    Paused,
    Resumed,
    Spawned { id: u32, kind: EntityKind },
    FruitCaught { id: u32 },
    FruitMissed { id: u32 },
    /// A bomb fell out of the play area without hitting the basket
    BombCleared { id: u32 },
    DifficultyRaised { difficulty: f32, bomb_interval_ms: u64 },
    GameOver { score: u32 },
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Seed of the current run's RNG
    pub seed: u64,
    /// Play area size
    pub width: f32,
    pub height: f32,
    pub mode: GameMode,
    pub score: u32,
    /// Bomb fall speed multiplier
    pub difficulty: f32,
    /// Ticks simulated in the current run
    pub time_ticks: u64,
    pub basket: Basket,
    /// Fruit pool (recycled in place, sorted by id)
    pub fruits: Vec<FallingEntity>,
    /// Bomb pool (recycled in place, sorted by id)
    pub bombs: Vec<FallingEntity>,
    /// Pending events for the adapter
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Idle state with an empty play area
    pub fn new(tuning: &Tuning, seed: u64) -> Self {
        Self {
            seed,
            width: tuning.width,
            height: tuning.height,
            mode: GameMode::Idle,
            score: 0,
            difficulty: tuning.difficulty_start,
            time_ticks: 0,
            basket: Basket::new(tuning, tuning.width, tuning.height),
            fruits: Vec::new(),
            bombs: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Wipe the previous run: score, pools, difficulty and basket
    pub fn reset_run(&mut self, tuning: &Tuning) {
        self.score = 0;
        self.difficulty = tuning.difficulty_start;
        self.time_ticks = 0;
        self.basket = Basket::new(tuning, self.width, self.height);
        self.fruits.clear();
        self.bombs.clear();
        self.events.clear();
        self.next_id = 1;
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Pool holding entities of the given kind
    pub fn pool_mut(&mut self, kind: EntityKind) -> &mut Vec<FallingEntity> {
        match kind {
            EntityKind::Fruit => &mut self.fruits,
            EntityKind::Bomb => &mut self.bombs,
        }
    }

    /// All falling entities, fruit first
    pub fn entities(&self) -> impl Iterator<Item = &FallingEntity> {
        self.fruits.iter().chain(self.bombs.iter())
    }

    /// Change the play area, keeping the basket on its margin and in bounds
    pub fn resize(&mut self, width: f32, height: f32, tuning: &Tuning) {
        self.width = width;
        self.height = height;
        self.basket.anchor(height, tuning.basket_margin);
        self.basket.clamp_to(width);
    }

    /// Score line shown by the HUD
    pub fn score_label(&self) -> String {
        format!("Score: {}", self.score)
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Hand pending events to the caller
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
