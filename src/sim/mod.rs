//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame-stepped physics and timers only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod timer;

pub use collision::{below_play_area, lands_in_basket};
pub use entity::{Basket, Direction, EntityKind, FallingEntity};
pub use spawner::{Spawner, random_spawn_x, recycle, spawn};
pub use state::{GameEvent, GameMode, GameState};
pub use tick::tick;
pub use timer::IntervalTimer;
