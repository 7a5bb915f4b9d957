//! Board and speed settings for a game of snake.

use crate::error::ConfigError;
use crate::Cell;

pub const DEFAULT_START_LENGTH: usize = 3;
pub const DEFAULT_START_INTERVAL_MS: u64 = 400;
pub const DEFAULT_SPEED_FLOOR_MS: u64 = 100;

/// Milliseconds taken off the tick interval per point of score.
pub const DEFAULT_SPEED_STEP_MS: u64 = 2;

/// Where the tail of a fresh snake is placed, before clamping to the board.
pub const DEFAULT_ANCHOR: Cell = (5, 5);

/// Terminal columns used to draw one cell, so cells come out roughly square.
pub const SQUARE_WIDTH: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    width: i32,
    height: i32,
    start_length: usize,
    start_interval_ms: u64,
    speed_floor_ms: u64,
    speed_step_ms: u64,
    anchor: Cell,
}

impl GameConfig {
    pub fn new(
        width: i32,
        height: i32,
        start_length: usize,
        start_interval_ms: u64,
        speed_floor_ms: u64,
    ) -> Result<Self, ConfigError> {
        if width < 1 || height < 1 {
            return Err(ConfigError::EmptyBoard { width, height });
        }
        if start_length == 0 {
            return Err(ConfigError::ZeroLength);
        }
        if start_length > width as usize {
            return Err(ConfigError::SnakeTooLong { length: start_length, width });
        }
        if (width as usize) * (height as usize) <= start_length {
            return Err(ConfigError::NoRoomForFood { width, height, length: start_length });
        }
        if speed_floor_ms == 0 {
            return Err(ConfigError::ZeroFloor);
        }
        if speed_floor_ms > start_interval_ms {
            return Err(ConfigError::FloorAboveStart {
                floor_ms: speed_floor_ms,
                start_ms: start_interval_ms,
            });
        }

        Ok(GameConfig {
            width,
            height,
            start_length,
            start_interval_ms,
            speed_floor_ms,
            speed_step_ms: DEFAULT_SPEED_STEP_MS,
            anchor: DEFAULT_ANCHOR,
        })
    }

    /// Default speeds and starting length on a board of the given size.
    pub fn with_board(width: i32, height: i32) -> Result<Self, ConfigError> {
        Self::new(
            width,
            height,
            DEFAULT_START_LENGTH,
            DEFAULT_START_INTERVAL_MS,
            DEFAULT_SPEED_FLOOR_MS,
        )
    }

    pub fn speed_step(mut self, step_ms: u64) -> Self {
        self.speed_step_ms = step_ms;
        self
    }

    pub fn anchor(mut self, anchor: Cell) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn start_length(&self) -> usize {
        self.start_length
    }

    pub fn start_interval_ms(&self) -> u64 {
        self.start_interval_ms
    }

    pub fn speed_floor_ms(&self) -> u64 {
        self.speed_floor_ms
    }

    pub fn speed_step_ms(&self) -> u64 {
        self.speed_step_ms
    }

    /// Tail cell of a fresh snake. The anchor is pulled back onto the board
    /// far enough for the whole starting body to fit to its right.
    pub fn start_tail(&self) -> Cell {
        let max_x = self.width - self.start_length as i32;
        (self.anchor.0.clamp(0, max_x), self.anchor.1.clamp(0, self.height - 1))
    }

    pub fn contains(&self, (x, y): Cell) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }
}
