//! Per-frame physics step
//!
//! Order matters for which frame a catch shows up in: basket first, then
//! every fruit, then every bomb.

use rand::Rng;

use super::collision::{below_play_area, lands_in_basket};
use super::spawner::recycle;
use super::state::{GameEvent, GameMode, GameState};

/// Advance the simulation by one frame. Does nothing unless running.
pub fn tick(state: &mut GameState, rng: &mut impl Rng) {
    if !state.mode.is_active() {
        return;
    }
    state.time_ticks += 1;

    update_basket(state);
    update_fruits(state, rng);
    update_bombs(state, rng);
}

fn update_basket(state: &mut GameState) {
    let basket = &mut state.basket;
    basket.pos.x += basket.dx;
    basket.clamp_to(state.width);
}

fn update_fruits(state: &mut GameState, rng: &mut impl Rng) {
    let GameState {
        fruits,
        basket,
        events,
        score,
        width,
        height,
        ..
    } = state;

    for fruit in fruits.iter_mut() {
        fruit.pos.y += fruit.speed;
        if lands_in_basket(fruit, basket) {
            *score += 1;
            events.push(GameEvent::FruitCaught { id: fruit.id });
            recycle(fruit, *width, rng);
        } else if below_play_area(fruit, *height) {
            events.push(GameEvent::FruitMissed { id: fruit.id });
            recycle(fruit, *width, rng);
        }
    }
}

fn update_bombs(state: &mut GameState, rng: &mut impl Rng) {
    let mut hit = false;
    {
        let GameState {
            bombs,
            basket,
            events,
            difficulty,
            width,
            height,
            ..
        } = state;

        for bomb in bombs.iter_mut() {
            // Difficulty applies to bombs already in flight
            bomb.pos.y += bomb.speed * *difficulty;
            if lands_in_basket(bomb, basket) {
                hit = true;
                break;
            } else if below_play_area(bomb, *height) {
                events.push(GameEvent::BombCleared { id: bomb.id });
                recycle(bomb, *width, rng);
            }
        }
    }

    if hit {
        state.mode = GameMode::Ended;
        state.push_event(GameEvent::GameOver { score: state.score });
        log::info!("Bomb hit! Game over with score {}", state.score);
    }
}
