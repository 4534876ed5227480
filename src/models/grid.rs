use crate::models::puzzle::{
    ClueEntry, Direction, PuzzleData, PuzzleError, SolvedEntry, normalize_letter,
};

/// One square of the grid.
///
/// Unused cells are the black squares: they carry no answer, no entry
/// membership and never accept a guess.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
    pub used: bool,

    /// Start label shown in the corner of the cell
    pub number: Option<u32>,

    /// Across entry passing through this cell
    pub across: Option<u32>,

    /// Down entry passing through this cell
    pub down: Option<u32>,

    pub answer: Option<char>,
    pub guess: Option<char>,
}

impl Cell {
    fn blank(row: usize, col: usize) -> Self {
        Self {
            row,
            col,
            ..Self::default()
        }
    }

    /// Clue number of the entry through this cell in `direction`.
    pub fn entry(&self, direction: Direction) -> Option<u32> {
        match direction {
            Direction::Across => self.across,
            Direction::Down => self.down,
        }
    }

    pub fn has_entry(&self, direction: Direction) -> bool {
        self.entry(direction).is_some()
    }

    pub fn is_correct(&self) -> bool {
        self.used && self.guess.is_some() && self.guess == self.answer
    }

    fn set_entry(&mut self, direction: Direction, number: u32) {
        match direction {
            Direction::Across => self.across = Some(number),
            Direction::Down => self.down = Some(number),
        }
    }
}

/// A clue number and its text, as shown in the clue lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClueLabel {
    pub number: u32,
    pub clue: String,
}

/// Clue lists for both directions, sorted by number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClueListing {
    pub across: Vec<ClueLabel>,
    pub down: Vec<ClueLabel>,
}

impl ClueListing {
    pub fn from_puzzle(puzzle: &PuzzleData) -> Self {
        let list = |direction: Direction| {
            let mut labels: Vec<ClueLabel> = puzzle
                .clues(direction)
                .iter()
                .map(|(number, entry)| ClueLabel {
                    number: *number,
                    clue: entry.clue.clone(),
                })
                .collect();
            labels.sort_by_key(|label| label.number);
            labels
        };

        Self {
            across: list(Direction::Across),
            down: list(Direction::Down),
        }
    }

    pub fn for_direction(&self, direction: Direction) -> &[ClueLabel] {
        match direction {
            Direction::Across => &self.across,
            Direction::Down => &self.down,
        }
    }
}

/// Square grid of cells built from puzzle data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<Vec<Cell>>,
}

impl Grid {
    /// An all-black grid of the given dimension.
    pub fn empty(size: usize) -> Self {
        let cells = (0..size)
            .map(|row| (0..size).map(|col| Cell::blank(row, col)).collect())
            .collect();
        Self { size, cells }
    }

    /// Build the grid and clue lists for a puzzle.
    ///
    /// The grid is the smallest square containing every answer. Letters are
    /// uppercased on placement. Conflicting letters at an intersection,
    /// overlapping entries of one direction and two clue numbers starting on
    /// the same cell are all rejected.
    pub fn build(puzzle: &PuzzleData) -> Result<(Self, ClueListing), PuzzleError> {
        puzzle.validate()?;

        let size = puzzle
            .entries()
            .map(|(direction, _, entry)| {
                let (row, col) = entry.end(direction);
                row.max(col)
            })
            .max()
            .unwrap_or(0)
            + 1;

        let mut grid = Self::empty(size);

        for (direction, number, entry) in puzzle.entries() {
            grid.place(direction, number, entry)?;
        }

        tracing::debug!(
            "Built {}x{} grid with {} across and {} down clues",
            size,
            size,
            puzzle.across.len(),
            puzzle.down.len()
        );

        Ok((grid, ClueListing::from_puzzle(puzzle)))
    }

    fn place(&mut self, direction: Direction, number: u32, entry: &ClueEntry) -> Result<(), PuzzleError> {
        for (i, ((row, col), letter)) in entry
            .cells(direction)
            .zip(entry.answer.chars().map(normalize_letter))
            .enumerate()
        {
            let cell = &mut self.cells[row][col];

            if let Some(other) = cell.entry(direction) {
                return Err(PuzzleError::OverlappingEntries {
                    direction,
                    number,
                    other,
                    row,
                    col,
                });
            }

            if let Some(existing) = cell.answer {
                if existing != letter {
                    return Err(PuzzleError::IntersectionConflict {
                        row,
                        col,
                        existing,
                        incoming: letter,
                        direction,
                        number,
                    });
                }
            }

            if i == 0 {
                match cell.number {
                    Some(existing) if existing != number => {
                        return Err(PuzzleError::NumberConflict {
                            row,
                            col,
                            existing,
                            incoming: number,
                        });
                    }
                    _ => cell.number = Some(number),
                }
            }

            cell.used = true;
            cell.answer = Some(letter);
            cell.set_entry(direction, number);
        }

        Ok(())
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.cells.get(row).and_then(|cells| cells.get(col))
    }

    /// The cell at `(row, col)` if it exists and is not a black square.
    pub fn used_cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.cell(row, col).filter(|cell| cell.used)
    }

    /// Coordinates one step of `(d_row, d_col)` away, if still inside the grid.
    pub fn offset(&self, row: usize, col: usize, d_row: isize, d_col: isize) -> Option<(usize, usize)> {
        let row = row.checked_add_signed(d_row)?;
        let col = col.checked_add_signed(d_col)?;
        (row < self.size && col < self.size).then_some((row, col))
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().flatten()
    }

    pub fn used_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells().filter(|cell| cell.used)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.iter().map(Vec::as_slice)
    }

    /// Write a guess into a used cell. Returns whether the cell changed.
    pub fn set_guess(&mut self, row: usize, col: usize, guess: Option<char>) -> bool {
        let Some(cell) = self
            .cells
            .get_mut(row)
            .and_then(|cells| cells.get_mut(col))
            .filter(|cell| cell.used)
        else {
            return false;
        };

        if cell.guess == guess {
            return false;
        }

        cell.guess = guess;
        true
    }

    /// Whether every cell of an entry holds its answer, ignoring `skip`.
    pub fn entry_is_complete(
        &self,
        direction: Direction,
        entry: &ClueEntry,
        skip: Option<(usize, usize)>,
    ) -> bool {
        entry
            .cells(direction)
            .filter(|position| Some(*position) != skip)
            .all(|(row, col)| self.cell(row, col).is_some_and(Cell::is_correct))
    }

    /// Every entry of the puzzle currently answered correctly.
    pub fn correct_entries(&self, puzzle: &PuzzleData) -> Vec<SolvedEntry> {
        puzzle
            .entries()
            .filter(|(direction, _, entry)| self.entry_is_complete(*direction, entry, None))
            .map(|(direction, number, entry)| SolvedEntry::new(direction, number, entry.answer.clone()))
            .collect()
    }

    /// Set every used cell's guess to its answer.
    pub fn fill_answers(&mut self) {
        for cell in self.cells.iter_mut().flatten().filter(|cell| cell.used) {
            cell.guess = cell.answer;
        }
    }

    /// Clear every guess.
    pub fn clear_guesses(&mut self) {
        for cell in self.cells.iter_mut().flatten() {
            cell.guess = None;
        }
    }

    pub fn is_solved(&self) -> bool {
        self.used_cells().all(Cell::is_correct)
    }
}
