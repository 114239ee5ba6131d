//! Basket-vs-entity overlap and play area exit tests
//!
//! The catch test is deliberately not a circle/rectangle intersection. An
//! entity counts as landed when its center is strictly inside the basket's
//! horizontal span and its lower edge has dropped past the basket's top.
//! Nothing checks the basket's bottom, so an entity below the basket still
//! counts if its center lines up. This is the game's feel; keep it.

use super::entity::{Basket, FallingEntity};

/// Whether the entity has landed in the basket
#[inline]
pub fn lands_in_basket(entity: &FallingEntity, basket: &Basket) -> bool {
    entity.pos.x > basket.pos.x && entity.pos.x < basket.right() && entity.bottom() > basket.pos.y
}

/// Whether the entity has fallen completely below the play area
#[inline]
pub fn below_play_area(entity: &FallingEntity, area_height: f32) -> bool {
    entity.top() > area_height
}
