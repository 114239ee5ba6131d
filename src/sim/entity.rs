//! Basket and falling entities
//!
//! Plain data. Behaviour lives in `spawner`, `collision` and `tick`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// What a falling entity does when it lands in the basket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Worth one point
    Fruit,
    /// Ends the run
    Bomb,
}

/// A fruit or bomb dropping from the top of the play area
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallingEntity {
    pub id: u32,
    pub kind: EntityKind,
    /// Center of the entity
    pub pos: Vec2,
    pub radius: f32,
    /// Base fall speed (units/frame). Bombs are further scaled by difficulty.
    pub speed: f32,
    /// Emoji drawn by the renderer
    pub tag: char,
}

impl FallingEntity {
    /// Lower edge y
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.radius
    }

    /// Upper edge y
    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y - self.radius
    }
}

/// Which way the player is steering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

/// The player's basket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Basket {
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Horizontal velocity applied each tick
    pub dx: f32,
    pub max_speed: f32,
    /// Direction keys currently held, most recent last
    held: Vec<Direction>,
}

impl Basket {
    /// Basket centered horizontally and resting on the bottom margin
    pub fn new(tuning: &Tuning, area_width: f32, area_height: f32) -> Self {
        let mut basket = Self {
            pos: Vec2::new((area_width - tuning.basket_width) / 2.0, 0.0),
            width: tuning.basket_width,
            height: tuning.basket_height,
            dx: 0.0,
            max_speed: tuning.basket_speed,
            held: Vec::with_capacity(2),
        };
        basket.anchor(area_height, tuning.basket_margin);
        basket
    }

    /// Rest the basket on the bottom margin of a play area of the given height
    pub fn anchor(&mut self, area_height: f32, margin: f32) {
        self.pos.y = area_height - self.height - margin;
    }

    /// Keep the basket fully inside `[0, area_width]`
    pub fn clamp_to(&mut self, area_width: f32) {
        let max_x = (area_width - self.width).max(0.0);
        self.pos.x = self.pos.x.clamp(0.0, max_x);
    }

    /// Right edge x
    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.width
    }

    pub fn press(&mut self, dir: Direction) {
        self.held.retain(|d| *d != dir);
        self.held.push(dir);
        self.sync_velocity();
    }

    pub fn release(&mut self, dir: Direction) {
        self.held.retain(|d| *d != dir);
        self.sync_velocity();
    }

    /// Forget held keys and stop
    pub fn halt(&mut self) {
        self.held.clear();
        self.dx = 0.0;
    }

    fn sync_velocity(&mut self) {
        self.dx = match self.held.last() {
            Some(Direction::Left) => -self.max_speed,
            Some(Direction::Right) => self.max_speed,
            None => 0.0,
        };
    }
}
