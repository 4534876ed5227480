//! Focus and direction transitions.
//!
//! Every move targets a used cell inside the grid; anything else is a no-op
//! that leaves the cursor where it was.

use super::CrosswordState;
use crate::models::Direction;

impl CrosswordState {
    /// Focus `(row, col)`, keeping the current direction (or `direction`)
    /// when the cell has an entry in it and flipping otherwise.
    ///
    /// Returns false, without changing anything, when the target is outside
    /// the grid, a black square, or has no entry in either direction.
    pub(super) fn move_to(&mut self, row: usize, col: usize, direction: Option<Direction>) -> bool {
        let Some(cell) = self.grid.used_cell(row, col) else {
            return false;
        };

        let preferred = direction.unwrap_or(self.cursor.direction);
        let direction = if cell.has_entry(preferred) {
            preferred
        } else if cell.has_entry(preferred.other()) {
            preferred.other()
        } else {
            return false;
        };

        self.cursor.row = row;
        self.cursor.col = col;
        self.cursor.direction = direction;
        true
    }

    /// Move one step and adopt the direction of the axis moved along when
    /// the target belongs to an entry on that axis.
    pub(super) fn move_relative(&mut self, d_row: isize, d_col: isize) -> bool {
        let Some((row, col)) = self
            .grid
            .offset(self.cursor.row, self.cursor.col, d_row, d_col)
        else {
            return false;
        };

        if !self.move_to(row, col, None) {
            return false;
        }

        let axis = match (d_row, d_col) {
            (0, 0) => None,
            (_, 0) => Some(Direction::Down),
            (0, _) => Some(Direction::Across),
            _ => None,
        };

        if let Some(axis) = axis {
            if self.grid.used_cell(row, col).is_some_and(|cell| cell.has_entry(axis)) {
                self.cursor.direction = axis;
            }
        }

        true
    }

    pub(super) fn move_forward(&mut self) -> bool {
        let (d_row, d_col) = self.cursor.direction.step();
        self.move_relative(d_row, d_col)
    }

    pub(super) fn move_backward(&mut self) -> bool {
        let (d_row, d_col) = self.cursor.direction.step();
        self.move_relative(-d_row, -d_col)
    }

    /// Pointer click on a cell.
    ///
    /// Flips direction when the cell has no entry in the current direction,
    /// or when the already-focused cell is clicked again and the other
    /// direction is available.
    pub(super) fn click_cell(&mut self, row: usize, col: usize) -> bool {
        let Some(cell) = self.grid.used_cell(row, col) else {
            tracing::debug!("Ignoring click on unused cell ({}, {})", row, col);
            return false;
        };

        let current = self.cursor.direction;
        let other = current.other();
        let reclick = self.focused && self.cursor.row == row && self.cursor.col == col;

        let direction = if !cell.has_entry(current) || (reclick && cell.has_entry(other)) {
            other
        } else {
            current
        };

        let moved = self.move_to(row, col, Some(direction));
        if moved {
            self.focused = true;
        }
        moved
    }

    /// Pointer click on a clue: jump to its first cell in its direction.
    pub(super) fn click_clue(&mut self, direction: Direction, number: u32) -> bool {
        let Some((row, col)) = self
            .puzzle
            .get(direction, number)
            .map(|entry| (entry.row, entry.col))
        else {
            tracing::debug!("Ignoring click on unknown clue {} {}", number, direction);
            return false;
        };

        let moved = self.move_to(row, col, Some(direction));
        if moved {
            self.focused = true;
        }
        moved
    }

    /// Tab / Space: switch to the other direction if the focused cell has it.
    pub(super) fn toggle_direction(&mut self) -> bool {
        let other = self.cursor.direction.other();
        let available = self
            .grid
            .used_cell(self.cursor.row, self.cursor.col)
            .is_some_and(|cell| cell.has_entry(other));

        if available {
            self.cursor.direction = other;
        }
        available
    }

    /// Home / End: jump to the first or last cell of the highlighted entry.
    pub(super) fn jump_to_entry_edge(&mut self, end: bool) -> bool {
        let direction = self.cursor.direction;
        let Some(entry) = self.current_entry() else {
            return false;
        };

        let (row, col) = if end {
            entry.end(direction)
        } else {
            (entry.row, entry.col)
        };

        self.move_to(row, col, Some(direction))
    }
}
