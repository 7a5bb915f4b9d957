use crate::Cell;
use Direction::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    /// Glyph for a head moving this way.
    pub fn arrow(self) -> char {
        match self {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }

    pub fn offset(self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }
}

/// Body is ordered tail first, so the head is always the last cell.
#[derive(Clone, Debug)]
pub struct Snake {
    body: Vec<Cell>,
    direction: Direction,
    target_len: usize,
}

impl Snake {
    /// Lays out `size` cells in a straight line from `tail`, heading in `direction`.
    pub fn new(tail: Cell, size: usize, direction: Direction) -> Self {
        let diff = direction.offset();

        let body = (0..size as i32)
            .map(|i| (tail.0 + diff.0 * i, tail.1 + diff.1 * i))
            .collect();
        Snake { body, direction, target_len: size }
    }

    pub fn body(&self) -> &[Cell] {
        &self.body
    }

    pub fn head(&self) -> Cell {
        // Never empty: built with at least one cell and trimmed down to target_len >= 1
        self.body[self.body.len() - 1]
    }

    pub fn target_len(&self) -> usize {
        self.target_len
    }

    /// Pushes a new head one step ahead and trims the tail down to the target
    /// length. Returns the new head; it may be off the board.
    pub fn advance(&mut self) -> Cell {
        let old_head = self.head();
        let diff = self.direction.offset();
        let new_head = (old_head.0 + diff.0, old_head.1 + diff.1);

        self.body.push(new_head);

        let excess = self.body.len().saturating_sub(self.target_len);
        self.body.drain(0..excess);

        new_head
    }

    /// True when the head sits on any other cell of the body.
    pub fn bites_itself(&self) -> bool {
        let head = self.head();
        self.body[..self.body.len() - 1].contains(&head)
    }

    /// Turns unless `new_direction` would reverse the snake onto itself.
    /// Returns whether the heading actually changed.
    pub fn set_direction(&mut self, new_direction: Direction) -> bool {
        if new_direction == self.direction || new_direction == self.direction.opposite() {
            return false;
        }

        self.direction = new_direction;
        true
    }

    pub fn get_direction(&self) -> Direction {
        self.direction
    }

    pub fn grow(&mut self) {
        self.target_len += 1;
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }
}
