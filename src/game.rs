//! Game lifecycle and simulation clock
//!
//! `Game` owns the state, the spawn timers and the RNG. All time flows
//! through [`Game::step`]: timers advance by one frame, due spawns fire, then
//! physics runs. Every way out of `Running` stops the timers, so nothing can
//! spawn into a paused or finished run.

use std::time::Duration;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::{FRAME, FRAME_DT, MAX_FRAME_DELTA, MAX_SUBSTEPS};
use crate::sim::{
    Direction, EntityKind, GameEvent, GameMode, GameState, Spawner, spawn, tick,
};
use crate::tuning::Tuning;

/// Input and lifecycle commands from the adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Start,
    Restart,
    Pause,
    Resume,
    TogglePause,
    MoveLeftStart,
    MoveLeftStop,
    MoveRightStart,
    MoveRightStop,
}

/// A game session
pub struct Game {
    pub state: GameState,
    tuning: Tuning,
    spawner: Spawner,
    rng: Pcg32,
    accumulator: f32,
}

impl Game {
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        Self {
            state: GameState::new(&tuning, seed),
            spawner: Spawner::new(&tuning),
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            accumulator: 0.0,
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn mode(&self) -> GameMode {
        self.state.mode
    }

    /// Current bomb cadence
    pub fn bomb_interval(&self) -> Duration {
        self.spawner.bomb_interval()
    }

    /// Whether any spawn or difficulty timer is counting
    pub fn timers_active(&self) -> bool {
        self.spawner.is_active()
    }

    /// Dispatch an adapter command. Commands with no transition from the
    /// current mode are ignored.
    pub fn apply(&mut self, command: Command) {
        let handled = match command {
            Command::Start => self.start(),
            Command::Restart => self.restart(),
            Command::Pause => self.pause(),
            Command::Resume => self.resume(),
            Command::TogglePause => self.toggle_pause(),
            Command::MoveLeftStart => self.steer(Direction::Left, true),
            Command::MoveLeftStop => self.steer(Direction::Left, false),
            Command::MoveRightStart => self.steer(Direction::Right, true),
            Command::MoveRightStop => self.steer(Direction::Right, false),
        };
        if !handled {
            log::debug!("Ignoring {:?} while {:?}", command, self.state.mode);
        }
    }

    /// Idle or Ended -> Running
    pub fn start(&mut self) -> bool {
        match self.state.mode {
            GameMode::Idle | GameMode::Ended => {
                self.begin_run();
                true
            }
            _ => false,
        }
    }

    /// Ended -> Running
    pub fn restart(&mut self) -> bool {
        if self.state.mode != GameMode::Ended {
            return false;
        }
        self.begin_run();
        true
    }

    /// Running -> Paused
    pub fn pause(&mut self) -> bool {
        if self.state.mode != GameMode::Running {
            return false;
        }
        self.spawner.stop();
        self.accumulator = 0.0;
        self.state.mode = GameMode::Paused;
        self.state.push_event(GameEvent::Paused);
        log::info!("Paused at score {}", self.state.score);
        true
    }

    /// Paused -> Running, keeping the escalated bomb cadence
    pub fn resume(&mut self) -> bool {
        if self.state.mode != GameMode::Paused {
            return false;
        }
        self.spawner.start();
        self.state.mode = GameMode::Running;
        self.state.push_event(GameEvent::Resumed);
        log::info!("Resumed");
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        match self.state.mode {
            GameMode::Running => self.pause(),
            GameMode::Paused => self.resume(),
            _ => false,
        }
    }

    fn steer(&mut self, dir: Direction, pressed: bool) -> bool {
        if !matches!(self.state.mode, GameMode::Running | GameMode::Paused) {
            return false;
        }
        if pressed {
            self.state.basket.press(dir);
        } else {
            self.state.basket.release(dir);
        }
        true
    }

    fn begin_run(&mut self) {
        self.state.reset_run(&self.tuning);
        self.spawner.reset(&self.tuning);
        self.accumulator = 0.0;

        self.state.mode = GameMode::Running;
        self.state.push_event(GameEvent::Started);
        spawn(&mut self.state, EntityKind::Fruit, &self.tuning, &mut self.rng);
        spawn(&mut self.state, EntityKind::Bomb, &self.tuning, &mut self.rng);
        self.spawner.start();

        log::info!("Run started (seed {})", self.state.seed);
    }

    /// Feed real elapsed time (seconds). Runs whole frames only and carries
    /// the remainder. Returns the number of frames simulated.
    pub fn update(&mut self, dt: f32) -> u32 {
        if !self.state.mode.is_active() {
            self.accumulator = 0.0;
            return 0;
        }
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DELTA);

        let mut substeps = 0;
        while self.accumulator >= FRAME_DT
            && substeps < MAX_SUBSTEPS
            && self.state.mode.is_active()
        {
            self.step();
            self.accumulator -= FRAME_DT;
            substeps += 1;
        }
        substeps
    }

    /// Simulate exactly one frame
    pub fn step(&mut self) {
        if !self.state.mode.is_active() {
            return;
        }
        self.spawner
            .advance(FRAME, &mut self.state, &self.tuning, &mut self.rng);
        tick(&mut self.state, &mut self.rng);

        if self.state.mode == GameMode::Ended {
            self.spawner.stop();
            self.accumulator = 0.0;
        }
    }

    /// Play area changed size (window resize)
    pub fn resize(&mut self, width: f32, height: f32) {
        if !(width > 0.0 && height > 0.0) {
            log::warn!("Ignoring resize to {}x{}", width, height);
            return;
        }
        self.state.resize(width, height, &self.tuning);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::consts::ENTITY_RADIUS;

    fn started(seed: u64) -> Game {
        let mut game = Game::new(Tuning::default(), seed);
        game.apply(Command::Start);
        game
    }

    /// Step while keeping bombs off the field so the run cannot end
    fn step_without_bombs(game: &mut Game, frames: u32) {
        for _ in 0..frames {
            game.state.bombs.clear();
            game.step();
        }
    }

    /// Drop the first bomb right onto the basket
    fn bomb_on_basket(game: &mut Game) {
        let basket = &game.state.basket;
        let x = basket.pos.x + basket.width / 2.0;
        let y = basket.pos.y - ENTITY_RADIUS;
        let bomb = &mut game.state.bombs[0];
        bomb.pos.x = x;
        bomb.pos.y = y;
    }

    fn positions(game: &Game) -> Vec<(u32, f32, f32)> {
        game.state
            .entities()
            .map(|e| (e.id, e.pos.x, e.pos.y))
            .collect()
    }

    #[test]
    fn test_start_spawns_one_of_each() {
        let mut game = started(1);
        assert_eq!(game.mode(), GameMode::Running);
        assert_eq!(game.state.fruits.len(), 1);
        assert_eq!(game.state.bombs.len(), 1);
        assert_eq!(game.state.score, 0);
        assert_eq!(game.state.difficulty, 1.0);
        assert_eq!(game.bomb_interval(), Duration::from_millis(4_000));
        assert!(game.timers_active());

        let events = game.drain_events();
        assert_eq!(events[0], GameEvent::Started);
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn test_commands_in_idle_are_noops() {
        let mut game = Game::new(Tuning::default(), 1);
        for cmd in [
            Command::Pause,
            Command::Resume,
            Command::TogglePause,
            Command::Restart,
            Command::MoveLeftStart,
            Command::MoveRightStart,
        ] {
            game.apply(cmd);
        }
        assert_eq!(game.mode(), GameMode::Idle);
        assert_eq!(game.state.basket.dx, 0.0);
        assert_eq!(game.state.entities().count(), 0);
        assert!(game.drain_events().is_empty());
        assert!(!game.timers_active());

        game.step();
        assert_eq!(game.update(1.0), 0);
        assert_eq!(game.state.time_ticks, 0);
    }

    #[test]
    fn test_start_and_restart_ignored_while_running() {
        let mut game = started(1);
        step_without_bombs(&mut game, 10);
        game.state.score = 3;
        game.apply(Command::Start);
        game.apply(Command::Restart);
        game.apply(Command::Resume);
        assert_eq!(game.mode(), GameMode::Running);
        assert_eq!(game.state.score, 3);
        assert_eq!(game.state.time_ticks, 10);
    }

    #[test]
    fn test_steering() {
        let mut game = started(1);
        let x = game.state.basket.pos.x;
        game.apply(Command::MoveRightStart);
        step_without_bombs(&mut game, 2);
        assert_eq!(game.state.basket.pos.x, x + 14.0);
        game.apply(Command::MoveRightStop);
        step_without_bombs(&mut game, 2);
        assert_eq!(game.state.basket.pos.x, x + 14.0);
        game.apply(Command::MoveLeftStart);
        step_without_bombs(&mut game, 1);
        assert_eq!(game.state.basket.pos.x, x + 7.0);
    }

    #[test]
    fn test_pause_freezes_everything() {
        let mut game = started(7);
        game.apply(Command::MoveLeftStart);
        for _ in 0..30 {
            game.step();
        }
        assert_eq!(game.mode(), GameMode::Running);

        game.apply(Command::Pause);
        assert_eq!(game.mode(), GameMode::Paused);
        assert!(!game.timers_active());

        let before = positions(&game);
        let basket_x = game.state.basket.pos.x;
        let score = game.state.score;
        let difficulty = game.state.difficulty;

        // Well past every timer's period
        for _ in 0..1_200 {
            game.step();
            game.update(0.1);
        }

        assert_eq!(positions(&game), before);
        assert_eq!(game.state.basket.pos.x, basket_x);
        assert_eq!(game.state.score, score);
        assert_eq!(game.state.difficulty, difficulty);
    }

    #[test]
    fn test_resume_keeps_escalated_cadence() {
        let mut game = started(3);
        step_without_bombs(&mut game, 200);
        assert_eq!(game.bomb_interval(), Duration::from_millis(3_500));

        game.apply(Command::TogglePause);
        assert_eq!(game.mode(), GameMode::Paused);
        game.apply(Command::TogglePause);
        assert_eq!(game.mode(), GameMode::Running);
        assert!(game.timers_active());
        assert_eq!(game.bomb_interval(), Duration::from_millis(3_500));
    }

    #[test]
    fn test_timers_restart_from_zero_on_resume() {
        let mut game = started(3);
        // 2.5s into the first 3s ramp
        step_without_bombs(&mut game, 150);
        game.apply(Command::Pause);
        game.apply(Command::Resume);

        // Another second would cross 3s if progress had been kept
        step_without_bombs(&mut game, 60);
        assert_eq!(game.state.difficulty, 1.0);
    }

    #[test]
    fn test_nine_seconds_of_escalation() {
        let mut game = started(11);
        step_without_bombs(&mut game, 540);
        assert_eq!(game.mode(), GameMode::Running);
        assert_eq!(game.bomb_interval(), Duration::from_millis(2_500));
        assert!((game.state.difficulty - 1.3).abs() < 1e-5);
    }

    #[test]
    fn test_cadence_never_below_floor() {
        let mut game = started(11);
        // Five minutes
        step_without_bombs(&mut game, 18_000);
        assert_eq!(game.bomb_interval(), Duration::from_millis(1_000));
        assert!(game.state.difficulty > 10.0);
    }

    #[test]
    fn test_bomb_hit_ends_and_stops_timers() {
        let mut game = started(5);
        game.state.score = 9;
        bomb_on_basket(&mut game);
        game.step();

        assert_eq!(game.mode(), GameMode::Ended);
        assert!(!game.timers_active());
        assert!(game.drain_events().contains(&GameEvent::GameOver { score: 9 }));

        let before = positions(&game);
        for _ in 0..1_200 {
            game.step();
            game.update(0.1);
        }
        assert_eq!(positions(&game), before);
        assert_eq!(game.state.score, 9);
        assert!(game.drain_events().is_empty());

        // Pause and steering mean nothing after the end
        game.apply(Command::Pause);
        game.apply(Command::MoveLeftStart);
        assert_eq!(game.mode(), GameMode::Ended);
        assert_eq!(game.state.basket.dx, 0.0);
    }

    #[test]
    fn test_restart_after_game_over_resets_run() {
        let mut game = started(5);
        step_without_bombs(&mut game, 400);
        game.state.score = 12;
        assert!(game.state.difficulty > 1.0);
        assert!(game.bomb_interval() < Duration::from_millis(4_000));

        game.apply(Command::MoveLeftStart);
        game.state.bombs.clear();
        spawn(
            &mut game.state,
            EntityKind::Bomb,
            &Tuning::default(),
            &mut Pcg32::seed_from_u64(0),
        );
        bomb_on_basket(&mut game);
        game.step();
        assert_eq!(game.mode(), GameMode::Ended);

        game.apply(Command::Restart);
        assert_eq!(game.mode(), GameMode::Running);
        assert_eq!(game.state.score, 0);
        assert_eq!(game.state.fruits.len(), 1);
        assert_eq!(game.state.bombs.len(), 1);
        assert_eq!(game.state.difficulty, 1.0);
        assert_eq!(game.state.time_ticks, 0);
        assert_eq!(game.state.basket.dx, 0.0);
        assert_eq!(game.bomb_interval(), Duration::from_millis(4_000));
        assert!(game.timers_active());
        for e in game.state.entities() {
            assert_eq!(e.pos.y, -ENTITY_RADIUS);
        }
    }

    #[test]
    fn test_update_runs_whole_frames() {
        let mut game = started(2);
        let frames = game.update(1.0);
        assert!(frames >= 1 && frames <= MAX_SUBSTEPS);
        assert_eq!(game.state.time_ticks, frames as u64);

        // Less than a frame is carried, not simulated
        let mut idle = started(2);
        assert_eq!(idle.update(0.001), 0);
        assert_eq!(idle.state.time_ticks, 0);
    }

    #[test]
    fn test_resize_reanchors_basket() {
        let mut game = started(2);
        game.state.basket.pos.x = 700.0;
        game.resize(500.0, 400.0);
        assert_eq!(game.state.basket.pos.x, 420.0);
        assert_eq!(game.state.basket.pos.y, 370.0);

        game.resize(0.0, 400.0);
        assert_eq!(game.state.width, 500.0);
    }

    #[test]
    fn test_same_seed_same_run() {
        let script = [
            (Command::Start, 120),
            (Command::MoveLeftStart, 90),
            (Command::MoveLeftStop, 10),
            (Command::MoveRightStart, 200),
            (Command::TogglePause, 50),
            (Command::TogglePause, 300),
        ];
        let run = |seed| {
            let mut game = Game::new(Tuning::default(), seed);
            for (cmd, frames) in script {
                game.apply(cmd);
                for _ in 0..frames {
                    game.step();
                }
            }
            serde_json::to_string(&game.state).expect("state serializes")
        };
        assert_eq!(run(77), run(77));
    }

    fn command() -> impl Strategy<Value = Command> {
        prop_oneof![
            Just(Command::Start),
            Just(Command::Restart),
            Just(Command::Pause),
            Just(Command::Resume),
            Just(Command::TogglePause),
            Just(Command::MoveLeftStart),
            Just(Command::MoveLeftStop),
            Just(Command::MoveRightStart),
            Just(Command::MoveRightStop),
        ]
    }

    proptest! {
        #[test]
        fn basket_in_bounds_and_score_monotonic(
            seed in any::<u64>(),
            script in prop::collection::vec((command(), 0u32..120), 1..30),
        ) {
            let mut game = Game::new(Tuning::default(), seed);
            let max_x = game.state.width - game.state.basket.width;

            for (cmd, frames) in script {
                game.apply(cmd);
                let mut score = game.state.score;
                for _ in 0..frames {
                    let mode = game.mode();
                    game.step();

                    let x = game.state.basket.pos.x;
                    prop_assert!((0.0..=max_x).contains(&x));
                    prop_assert!(game.state.score >= score);
                    prop_assert!(game.state.score - score <= game.state.fruits.len() as u32);
                    if mode != GameMode::Running {
                        prop_assert_eq!(game.state.score, score);
                    }
                    if game.mode() == GameMode::Ended {
                        prop_assert!(!game.timers_active());
                    }
                    score = game.state.score;
                }
            }
        }
    }
}
