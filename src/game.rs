use std::io;
use std::time::Instant;

use snake::config::SQUARE_WIDTH;
use snake::{Cell, Direction, EndReason, GameState, GameStatus, Snapshot, TickOutcome};

use crate::term::{Coords, TermInt, TermManager};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, info};

const SNAKE_BODY_CHAR: char = '█';
const FOOD_CHARS: [char; 2] = ['(', ')'];
const DEAD_SNAKE_CHAR: char = 'X';

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Turn(Direction),
    Restart,
    TogglePause,
    Quit,
}

/// Maps a key press to what it does in the game. Unmapped keys give `None`.
pub fn command_for(ev: &KeyEvent) -> Option<Command> {
    if is_ctrl_c(ev) {
        return Some(Command::Quit);
    }

    match ev.code {
        KeyCode::Char('w') | KeyCode::Up => Some(Command::Turn(Direction::Up)),
        KeyCode::Char('a') | KeyCode::Left => Some(Command::Turn(Direction::Left)),
        KeyCode::Char('s') | KeyCode::Down => Some(Command::Turn(Direction::Down)),
        KeyCode::Char('d') | KeyCode::Right => Some(Command::Turn(Direction::Right)),
        KeyCode::Char(' ') => Some(Command::Restart),
        KeyCode::Esc => Some(Command::TogglePause),
        KeyCode::Char('q') => Some(Command::Quit),
        _ => None,
    }
}

/// True when a forced tick ate food and so changed the interval the timer runs on.
fn speeds_up(outcome: Option<TickOutcome>) -> bool {
    matches!(outcome, Some(TickOutcome::Ate { .. }))
}

/// How a round of play finished from the player's side.
enum RoundEnd {
    Restart,
    Quit,
}

pub struct SnakeGame {
    term: TermManager,
    state: GameState,
    paused: bool,
    drawn: Option<Snapshot>,
}

impl SnakeGame {
    pub fn new(term: TermManager, state: GameState) -> Self {
        SnakeGame { term, state, paused: false, drawn: None }
    }

    /// Runs rounds until the player quits, then hands the terminal back.
    pub fn run(&mut self) -> io::Result<()> {
        self.term.setup()?;

        if self.show_intro()? {
            while let RoundEnd::Restart = self.play()? {}
        }

        info!(score = self.state.score(), "quitting");
        self.term.restore()
    }

    fn show_intro(&mut self) -> io::Result<bool> {
        let lines = &[
            "Arrow keys or WASD to move",
            "Esc to pause, Space to restart",
            "q or CTRL+C to quit",
            "",
            "Press any key to begin"
        ];

        self.term.show_message(lines)?;

        let key = self.term.read_key_blocking()?;
        self.term.hide_message()?;

        Ok(command_for(&key) != Some(Command::Quit))
    }

    fn play(&mut self) -> io::Result<RoundEnd> {
        self.term.hide_message()?;
        self.term.clear()?;
        self.term.draw_borders(self.frame_size())?;

        self.state.restart();
        self.paused = false;
        self.drawn = None;
        self.redraw()?;

        let mut next_tick = Instant::now() + self.state.interval();

        while self.state.is_running() {
            let key = if self.paused {
                Some(self.term.read_key_blocking()?)
            } else {
                self.term.poll_key(next_tick.saturating_duration_since(Instant::now()))?
            };

            if let Some(key) = key {
                match command_for(&key) {
                    Some(Command::Quit) => return Ok(RoundEnd::Quit),
                    Some(Command::Restart) => return Ok(RoundEnd::Restart),
                    Some(Command::TogglePause) => {
                        self.toggle_pause()?;
                        next_tick = Instant::now() + self.state.interval();
                    },
                    Some(Command::Turn(dir)) if !self.paused => {
                        // An accepted turn steps right away
                        let outcome = self.state.set_direction(dir);
                        if outcome.is_some() {
                            self.redraw()?;
                        }
                        if speeds_up(outcome) {
                            next_tick = Instant::now() + self.state.interval();
                        }
                    },
                    _ => {}
                }
                continue;
            }

            if Instant::now() >= next_tick {
                self.state.tick();
                self.redraw()?;
                // Re-arm with whatever the interval is now, it shrinks as the score grows
                next_tick = Instant::now() + self.state.interval();
            }
        } // Game loop

        self.game_over()?;

        loop {
            match command_for(&self.term.read_key_blocking()?) {
                Some(Command::Restart) => return Ok(RoundEnd::Restart),
                Some(Command::Quit) => return Ok(RoundEnd::Quit),
                _ => {}
            }
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    fn game_over(&mut self) -> io::Result<()> {
        let reason = match self.state.status() {
            GameStatus::GameOver(reason) => reason,
            _ => return Ok(()),
        };

        let (title, cause) = match reason {
            EndReason::BoardFilled => ("You won!", "The board is full"),
            EndReason::HitWall => ("Game over!", "You hit the wall"),
            EndReason::HitSelf => ("Game over!", "You bit yourself"),
        };

        if reason != EndReason::BoardFilled {
            let body = self.state.body().to_vec();
            for cell in body {
                self.print_cell(cell, [DEAD_SNAKE_CHAR; 2])?;
            }
        }

        self.term.show_message(&[
            title,
            cause,
            &*format!("Score: {}", self.state.score()),
            "",
            "Press Space to start a new game,",
            "or q to quit."
        ])
    }

    /// Draws the difference between the last drawn frame and the current state.
    fn redraw(&mut self) -> io::Result<()> {
        let snap = self.state.snapshot();

        if let Some(prev) = self.drawn.take() {
            for &cell in prev.body.iter().chain(prev.food.iter()) {
                if !snap.body.contains(&cell) && snap.food != Some(cell) {
                    self.print_cell(cell, [' '; 2])?;
                }
            }
        }

        if let Some(food) = snap.food {
            self.print_cell(food, FOOD_CHARS)?;
        }

        let head = snap.body.len() - 1;
        for (i, &cell) in snap.body.iter().enumerate() {
            let chars = if i == head {[snap.direction.arrow(); 2]} else {[SNAKE_BODY_CHAR; 2]};
            self.print_cell(cell, chars)?;
        }

        self.print_status(&snap)?;
        self.term.flush()?;

        self.drawn = Some(snap);
        Ok(())
    }

    fn print_status(&mut self, snap: &Snapshot) -> io::Result<()> {
        let (frame_w, frame_h) = self.frame_size();
        let line = format!("Score: {} - Speed: {}ms", snap.score, snap.interval.as_millis());
        let padded = format!("{:<width$}", line, width = frame_w as usize);
        self.term.print_str_at((0, frame_h), &padded)
    }

    fn print_cell(&mut self, cell: Cell, chars: [char; 2]) -> io::Result<()> {
        // The head is off the board for the tick that hits the wall
        let pos = match self.to_screen(cell) {
            Some(pos) => pos,
            None => return Ok(()),
        };

        for (i, ch) in chars.iter().enumerate().take(SQUARE_WIDTH as usize) {
            self.term.print_at((pos.0 + i as TermInt, pos.1), *ch)?;
        }
        Ok(())
    }

    fn to_screen(&self, cell: Cell) -> Option<Coords> {
        if !self.state.config().contains(cell) {
            return None;
        }
        Some((1 + cell.0 as TermInt * SQUARE_WIDTH, 1 + cell.1 as TermInt))
    }

    /// Board plus its border, in terminal columns and rows.
    fn frame_size(&self) -> Coords {
        let config = self.state.config();
        (config.width() as TermInt * SQUARE_WIDTH + 2, config.height() as TermInt + 2)
    }

    fn toggle_pause(&mut self) -> io::Result<()> {
        if !self.paused {
            self.term.show_message(&["Paused", "Press Esc to resume", "or q to quit"])?;
        } else {
            self.term.hide_message()?;
        }

        self.paused = !self.paused;
        debug!(paused = self.paused, "pause toggled");
        Ok(())
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    ev.code == KeyCode::Char('c') && ev.modifiers.contains(KeyModifiers::CONTROL)
}
