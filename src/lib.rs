//! Game-state core for a grid snake game.
//!
//! [`GameState`] owns the snake, the food, the score and the tick interval.
//! Timers, input and drawing live outside: they call [`GameState::tick`],
//! [`GameState::set_direction`] and [`GameState::reset`], and read back a
//! [`Snapshot`] to draw from.

pub mod config;
pub mod error;
pub mod snake;
pub mod state;

pub use config::GameConfig;
pub use error::ConfigError;
pub use snake::{Direction, Snake};
pub use state::{EndReason, GameState, GameStatus, Snapshot, TickOutcome};

/// A board position in cells. Signed so a head that just left the board can still be represented.
pub type Cell = (i32, i32);
