//! The game-state core: the snake, its food, score and speed, and the rules
//! that move them forward one tick at a time.
//!
//! Nothing in here knows about terminals or clocks. A driver calls
//! [`GameState::tick`] every [`GameState::interval`], forwards turns to
//! [`GameState::set_direction`] and redraws from [`GameState::snapshot`].

use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::Rng;
use tracing::{debug, info, instrument, trace};

use crate::config::GameConfig;
use crate::snake::{Direction, Snake};
use crate::Cell;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EndReason {
    HitWall,
    HitSelf,
    /// No free cell was left for the next piece of food. Counts as a win.
    BoardFilled,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Ready,
    Running,
    GameOver(EndReason),
}

/// What a single call to [`GameState::tick`] did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// The game is not running; nothing moved.
    Idle,
    Moved { head: Cell },
    Ate { head: Cell, score: u32 },
    Ended(EndReason),
}

/// Owned copy of everything a renderer needs, taken between mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub body: Vec<Cell>,
    pub food: Option<Cell>,
    pub direction: Direction,
    pub score: u32,
    pub interval: Duration,
    pub status: GameStatus,
}

impl Snapshot {
    pub fn head(&self) -> Option<Cell> {
        self.body.last().copied()
    }
}

#[derive(Debug)]
pub struct GameState<R = StdRng> {
    config: GameConfig,
    snake: Snake,
    food: Option<Cell>,
    score: u32,
    interval_ms: u64,
    status: GameStatus,
    rng: R,
}

impl<R: Rng> GameState<R> {
    /// A game laid out for `config` but not started: ticks do nothing until
    /// [`reset`](Self::reset) or [`restart`](Self::restart).
    pub fn new(config: GameConfig, rng: R) -> Self {
        GameState {
            config,
            snake: starting_snake(&config),
            food: None,
            score: 0,
            interval_ms: config.start_interval_ms(),
            status: GameStatus::Ready,
            rng,
        }
    }

    /// Starts a fresh game on the board and speeds described by `config`.
    pub fn reset(&mut self, config: GameConfig) {
        self.config = config;
        self.restart();
    }

    /// Starts a fresh game with the current configuration.
    pub fn restart(&mut self) {
        self.snake = starting_snake(&self.config);
        self.score = 0;
        self.interval_ms = self.config.start_interval_ms();
        self.status = GameStatus::Running;
        self.food = self.place_food();

        info!(
            width = self.config.width(),
            height = self.config.height(),
            length = self.config.start_length(),
            interval_ms = self.interval_ms,
            "new game"
        );

        if self.food.is_none() {
            self.end(EndReason::BoardFilled);
        }
    }

    /// Turns the snake. A turn onto the current heading or straight back
    /// onto the body is ignored. An accepted turn moves the snake right
    /// away, without waiting for the timer, and returns that tick's outcome.
    pub fn set_direction(&mut self, requested: Direction) -> Option<TickOutcome> {
        if self.status != GameStatus::Running {
            return None;
        }
        if !self.snake.set_direction(requested) {
            trace!(?requested, "turn ignored");
            return None;
        }

        debug!(direction = ?requested, "turned");
        Some(self.tick())
    }

    #[instrument(level = "trace", skip(self))]
    pub fn tick(&mut self) -> TickOutcome {
        if self.status != GameStatus::Running {
            return TickOutcome::Idle;
        }

        let head = self.snake.advance();

        if self.food == Some(head) {
            return self.eat(head);
        }
        if !self.config.contains(head) {
            return self.end(EndReason::HitWall);
        }
        if self.snake.bites_itself() {
            return self.end(EndReason::HitSelf);
        }

        TickOutcome::Moved { head }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            body: self.snake.body().to_vec(),
            food: self.food,
            direction: self.snake.get_direction(),
            score: self.score,
            interval: self.interval(),
            status: self.status,
        }
    }

    pub fn body(&self) -> &[Cell] {
        self.snake.body()
    }

    pub fn food(&self) -> Option<Cell> {
        self.food
    }

    pub fn direction(&self) -> Direction {
        self.snake.get_direction()
    }

    pub fn target_len(&self) -> usize {
        self.snake.target_len()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == GameStatus::Running
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    ///////////////////////////////////////////////////////////////////////////

    fn eat(&mut self, head: Cell) -> TickOutcome {
        self.score += 1;
        self.snake.grow();

        let step = self.config.speed_step_ms().saturating_mul(self.score as u64);
        self.interval_ms = self
            .interval_ms
            .saturating_sub(step)
            .max(self.config.speed_floor_ms());

        debug!(score = self.score, interval_ms = self.interval_ms, "food eaten");

        self.food = self.place_food();
        if self.food.is_none() {
            return self.end(EndReason::BoardFilled);
        }

        TickOutcome::Ate { head, score: self.score }
    }

    fn end(&mut self, reason: EndReason) -> TickOutcome {
        self.status = GameStatus::GameOver(reason);
        info!(?reason, score = self.score, length = self.snake.body().len(), "game over");
        TickOutcome::Ended(reason)
    }

    /// Picks uniformly among the cells the snake does not cover, or `None`
    /// when there are none left.
    fn place_food(&mut self) -> Option<Cell> {
        let (width, height) = (self.config.width(), self.config.height());
        let snake = &self.snake;

        (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .filter(|cell| !snake.occupies(*cell))
            .choose(&mut self.rng)
    }
}

fn starting_snake(config: &GameConfig) -> Snake {
    Snake::new(config.start_tail(), config.start_length(), Direction::Right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use Direction::*;

    fn started(config: GameConfig, seed: u64) -> GameState {
        let mut state = GameState::new(config, StdRng::seed_from_u64(seed));
        state.reset(config);
        state
    }

    /// A running game on `width`x`height` with the food parked out of the way.
    fn running(width: i32, height: i32) -> GameState {
        let mut state = started(GameConfig::new(width, height, 3, 400, 100).unwrap(), 7);
        state.food = Some((0, height - 1));
        state
    }

    /// Puts food right in front of the head and steps onto it.
    fn feed(state: &mut GameState) -> TickOutcome {
        let (x, y) = state.snake.head();
        let (dx, dy) = state.direction().offset();
        state.food = Some((x + dx, y + dy));
        state.tick()
    }

    #[test]
    fn reset_lays_out_a_fresh_game() {
        let state = started(GameConfig::new(10, 10, 3, 400, 100).unwrap(), 1);

        assert_eq!(state.body(), &[(5, 5), (6, 5), (7, 5)]);
        assert_eq!(state.score(), 0);
        assert_eq!(state.interval(), Duration::from_millis(400));
        assert_eq!(state.status(), GameStatus::Running);
        assert_eq!(state.direction(), Right);

        let food = state.food().unwrap();
        assert!(state.config().contains(food));
        assert!(!state.body().contains(&food));
    }

    #[test]
    fn one_tick_moves_right() {
        let mut state = running(10, 10);

        assert_eq!(state.tick(), TickOutcome::Moved { head: (8, 5) });
        assert_eq!(state.body(), &[(6, 5), (7, 5), (8, 5)]);
    }

    #[test]
    fn length_holds_while_not_eating() {
        let mut state = running(20, 20);
        state.set_direction(Down);

        for _ in 0..8 {
            let before = state.body().len();
            assert_eq!(before, state.target_len());
            assert!(matches!(state.tick(), TickOutcome::Moved { .. }));
            assert_eq!(state.body().len(), before);
        }
    }

    #[test]
    fn eating_grows_scores_and_moves_food() {
        let mut state = running(30, 10);

        assert_eq!(feed(&mut state), TickOutcome::Ate { head: (8, 5), score: 1 });
        assert_eq!(state.score(), 1);
        assert_eq!(state.target_len(), 4);

        let food = state.food().unwrap();
        assert!(!state.body().contains(&food));

        state.food = Some((0, 0));
        state.tick();
        assert_eq!(state.body().len(), 4);
    }

    #[test]
    fn interval_shrinks_with_score() {
        let mut state = running(30, 10);

        feed(&mut state);
        assert_eq!(state.interval(), Duration::from_millis(398));
        feed(&mut state);
        assert_eq!(state.interval(), Duration::from_millis(394));
        feed(&mut state);
        assert_eq!(state.interval(), Duration::from_millis(388));
    }

    #[test]
    fn interval_stops_at_floor() {
        let mut state = started(GameConfig::new(30, 10, 3, 110, 100).unwrap(), 3);

        let mut last = state.interval();
        for _ in 0..5 {
            feed(&mut state);
            assert!(state.interval() <= last);
            assert!(state.interval() >= Duration::from_millis(100));
            last = state.interval();
        }
        assert_eq!(last, Duration::from_millis(100));
    }

    #[test]
    fn reversing_is_ignored() {
        let mut state = running(10, 10);

        assert_eq!(state.set_direction(Left), None);
        assert_eq!(state.direction(), Right);
        assert_eq!(state.body(), &[(5, 5), (6, 5), (7, 5)]);
    }

    #[test]
    fn turning_moves_immediately() {
        let mut state = running(10, 10);

        assert_eq!(state.set_direction(Up), Some(TickOutcome::Moved { head: (7, 4) }));
        assert_eq!(state.direction(), Up);

        // Same heading again is not a turn
        assert_eq!(state.set_direction(Up), None);
        assert_eq!(state.snake.head(), (7, 4));
    }

    #[test]
    fn wall_ends_the_game() {
        let mut state = running(10, 10);

        assert_eq!(state.tick(), TickOutcome::Moved { head: (8, 5) });
        assert_eq!(state.tick(), TickOutcome::Moved { head: (9, 5) });
        assert_eq!(state.tick(), TickOutcome::Ended(EndReason::HitWall));
        assert_eq!(state.status(), GameStatus::GameOver(EndReason::HitWall));

        let frozen = state.snapshot();
        assert_eq!(state.tick(), TickOutcome::Idle);
        assert_eq!(state.set_direction(Up), None);
        assert_eq!(state.snapshot(), frozen);
    }

    #[test]
    fn top_wall_ends_the_game() {
        let mut state = running(10, 10);
        state.set_direction(Up);
        for _ in 0..4 {
            state.tick();
        }
        assert_eq!(state.snake.head(), (7, 0));
        assert_eq!(state.tick(), TickOutcome::Ended(EndReason::HitWall));
    }

    #[test]
    fn bottom_wall_ends_the_game() {
        let mut state = running(10, 10);
        state.food = Some((0, 0));
        state.set_direction(Down);
        for _ in 0..3 {
            state.tick();
        }
        assert_eq!(state.snake.head(), (7, 9));
        assert_eq!(state.tick(), TickOutcome::Ended(EndReason::HitWall));
        assert_eq!(state.snake.head(), (7, 10));
        assert_eq!(state.status(), GameStatus::GameOver(EndReason::HitWall));
    }

    #[test]
    fn left_wall_ends_the_game() {
        let mut state = running(10, 10);
        state.set_direction(Up);
        state.set_direction(Left);
        for _ in 0..6 {
            state.tick();
        }
        assert_eq!(state.snake.head(), (0, 4));
        assert_eq!(state.tick(), TickOutcome::Ended(EndReason::HitWall));
        assert_eq!(state.snake.head(), (-1, 4));
        assert_eq!(state.status(), GameStatus::GameOver(EndReason::HitWall));
    }

    #[test]
    fn biting_itself_ends_the_game() {
        let mut state = started(GameConfig::new(20, 20, 5, 400, 100).unwrap(), 11);
        state.food = Some((0, 19));

        state.set_direction(Down);
        state.set_direction(Left);
        assert_eq!(state.set_direction(Up), Some(TickOutcome::Ended(EndReason::HitSelf)));
        assert_eq!(state.status(), GameStatus::GameOver(EndReason::HitSelf));
    }

    #[test]
    fn chasing_the_tail_is_safe() {
        let mut state = started(GameConfig::new(20, 20, 4, 400, 100).unwrap(), 11);
        state.food = Some((0, 19));

        state.set_direction(Down);
        state.set_direction(Left);
        assert_eq!(state.set_direction(Up), Some(TickOutcome::Moved { head: (7, 5) }));
        assert!(state.is_running());
    }

    #[test]
    fn ready_game_ignores_ticks() {
        let config = GameConfig::with_board(10, 10).unwrap();
        let mut state = GameState::new(config, StdRng::seed_from_u64(0));

        assert_eq!(state.status(), GameStatus::Ready);
        assert_eq!(state.tick(), TickOutcome::Idle);
        assert_eq!(state.set_direction(Down), None);
        assert_eq!(state.food(), None);
    }

    #[test]
    fn restart_after_game_over() {
        let mut state = running(10, 10);
        while state.is_running() {
            state.tick();
        }

        state.restart();
        assert_eq!(state.status(), GameStatus::Running);
        assert_eq!(state.body(), &[(5, 5), (6, 5), (7, 5)]);
        assert_eq!(state.score(), 0);
        assert_eq!(state.interval(), Duration::from_millis(400));
    }

    #[test]
    fn reset_takes_a_new_board() {
        let mut state = running(10, 10);
        state.reset(GameConfig::new(40, 20, 6, 300, 50).unwrap());

        assert_eq!(state.body().len(), 6);
        assert_eq!(state.body()[0], (5, 5));
        assert_eq!(state.interval(), Duration::from_millis(300));
        assert_eq!(state.config().width(), 40);
    }

    #[test]
    fn filling_the_board_wins() {
        let mut state = started(GameConfig::new(3, 1, 2, 400, 100).unwrap(), 5);
        state.snake = Snake::new((0, 0), 2, Right);
        state.snake.grow();
        state.food = Some((2, 0));

        assert_eq!(state.tick(), TickOutcome::Ended(EndReason::BoardFilled));
        assert_eq!(state.status(), GameStatus::GameOver(EndReason::BoardFilled));
        assert_eq!(state.score(), 1);
        assert_eq!(state.food(), None);
    }

    #[test]
    fn food_never_lands_on_the_snake() {
        for seed in 0..50 {
            let mut state = started(GameConfig::new(4, 4, 3, 400, 100).unwrap(), seed);
            let food = state.food().unwrap();
            assert!(!state.body().contains(&food), "seed {}", seed);

            // (5,5) clamps to (1,3): body runs along the bottom row
            assert_eq!(state.body(), &[(1, 3), (2, 3), (3, 3)]);
            state.food = Some((1, 2));
            state.set_direction(Up);
            state.set_direction(Left);
            assert_eq!(state.tick(), TickOutcome::Ate { head: (1, 2), score: 1 });

            let food = state.food().unwrap();
            assert!(!state.body().contains(&food), "seed {}", seed);
        }
    }

    #[test]
    fn snapshot_copies_state() {
        let mut state = running(10, 10);
        let before = state.snapshot();

        state.tick();
        let after = state.snapshot();

        assert_eq!(before.head(), Some((7, 5)));
        assert_eq!(after.head(), Some((8, 5)));
        assert_eq!(after.food, Some((0, 9)));
        assert_eq!(after.direction, Right);
        assert_eq!(after.score, 0);
        assert_eq!(after.interval, Duration::from_millis(400));
        assert_eq!(after.status, GameStatus::Running);
    }
}
