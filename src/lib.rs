//! Fruit Catch - catch falling fruit, dodge the bombs
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, physics, collisions)
//! - `game`: Lifecycle state machine and simulation clock
//! - `tuning`: Data-driven game balance

pub mod game;
pub mod sim;
pub mod tuning;

pub use game::{Command, Game};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    use std::time::Duration;

    /// Fixed simulation timestep (one display frame at 60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Wall-clock length of one simulation frame, used to advance spawn timers
    pub const FRAME: Duration = Duration::from_nanos(16_666_667);
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest real frame delta fed into the accumulator (seconds)
    pub const MAX_FRAME_DELTA: f32 = 0.1;

    /// Radius shared by every falling entity
    pub const ENTITY_RADIUS: f32 = 15.0;

    /// Display tags for fruit (picked at random on spawn)
    pub const FRUIT_TAGS: [char; 6] = ['🍎', '🍊', '🍌', '🍇', '🍓', '🍉'];
    /// Display tag for bombs
    pub const BOMB_TAG: char = '💣';
}
