use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Largest grid dimension the builder accepts.
///
/// Clue coordinates come from untrusted data files, so a typo such as
/// `row: 100000` must fail validation instead of allocating a huge grid.
pub const MAX_GRID_SIZE: usize = 256;

/// Orientation of an entry in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Across,
    Down,
}

impl Direction {
    /// Both directions, across first.
    pub const BOTH: [Direction; 2] = [Direction::Across, Direction::Down];

    /// The perpendicular direction.
    pub fn other(self) -> Self {
        match self {
            Direction::Across => Direction::Down,
            Direction::Down => Direction::Across,
        }
    }

    /// Row/column delta of one step forward in this direction.
    pub fn step(self) -> (isize, isize) {
        match self {
            Direction::Across => (0, 1),
            Direction::Down => (1, 0),
        }
    }

    /// Parse `"across"` / `"down"` (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("across") {
            Some(Direction::Across)
        } else if value.eq_ignore_ascii_case("down") {
            Some(Direction::Down)
        } else {
            None
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Across => write!(f, "across"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// A single clue with its answer and starting cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClueEntry {
    pub clue: String,
    pub answer: String,
    pub row: usize,
    pub col: usize,
}

impl ClueEntry {
    pub fn new(clue: impl Into<String>, answer: impl Into<String>, row: usize, col: usize) -> Self {
        Self {
            clue: clue.into(),
            answer: answer.into(),
            row,
            col,
        }
    }

    /// Number of cells the answer spans.
    pub fn len(&self) -> usize {
        self.answer.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.answer.is_empty()
    }

    /// Coordinates of every cell in the span, in reading order.
    pub fn cells(&self, direction: Direction) -> impl Iterator<Item = (usize, usize)> + '_ {
        let (row, col) = (self.row, self.col);
        (0..self.len()).map(move |i| match direction {
            Direction::Across => (row, col + i),
            Direction::Down => (row + i, col),
        })
    }

    /// Last cell of the span. An empty answer reports its start cell.
    ///
    /// Saturates at `usize::MAX` instead of overflowing.
    pub fn end(&self, direction: Direction) -> (usize, usize) {
        let last = self.len().saturating_sub(1);
        match direction {
            Direction::Across => (self.row, self.col.saturating_add(last)),
            Direction::Down => (self.row.saturating_add(last), self.col),
        }
    }
}

/// A clue whose every cell holds the correct letter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolvedEntry {
    pub direction: Direction,
    pub number: u32,
    pub answer: String,
}

impl SolvedEntry {
    pub fn new(direction: Direction, number: u32, answer: impl Into<String>) -> Self {
        Self {
            direction,
            number,
            answer: answer.into(),
        }
    }
}

impl fmt::Display for SolvedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.number, self.direction, self.answer)
    }
}

/// Errors raised while validating puzzle data or building its grid.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PuzzleError {
    #[error("Puzzle has no clues")]
    Empty,

    #[error("{number} {direction} has an empty answer")]
    EmptyAnswer { direction: Direction, number: u32 },

    #[error("{number} {direction} answer {answer:?} contains invalid character {character:?}")]
    InvalidAnswer {
        direction: Direction,
        number: u32,
        answer: String,
        character: char,
    },

    #[error("{number} {direction} extends to index {extent}, beyond the maximum grid size of {MAX_GRID_SIZE}")]
    TooLarge {
        direction: Direction,
        number: u32,
        extent: usize,
    },

    #[error(
        "Letters disagree at ({row}, {col}): {existing:?} already placed, {number} {direction} wants {incoming:?}"
    )]
    IntersectionConflict {
        row: usize,
        col: usize,
        existing: char,
        incoming: char,
        direction: Direction,
        number: u32,
    },

    #[error("{number} {direction} overlaps {other} {direction} at ({row}, {col})")]
    OverlappingEntries {
        direction: Direction,
        number: u32,
        other: u32,
        row: usize,
        col: usize,
    },

    #[error("Clues {existing} and {incoming} both start at ({row}, {col})")]
    NumberConflict {
        row: usize,
        col: usize,
        existing: u32,
        incoming: u32,
    },
}

/// Clue data for a whole puzzle: direction -> clue number -> entry.
///
/// Maps keep the order of the source file so clue lists and batch
/// notifications come out in a predictable order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleData {
    #[serde(default)]
    pub across: IndexMap<u32, ClueEntry>,

    #[serde(default)]
    pub down: IndexMap<u32, ClueEntry>,
}

impl PuzzleData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for tests and fixtures.
    pub fn with_clue(mut self, direction: Direction, number: u32, entry: ClueEntry) -> Self {
        self.clues_mut(direction).insert(number, entry);
        self
    }

    pub fn clues(&self, direction: Direction) -> &IndexMap<u32, ClueEntry> {
        match direction {
            Direction::Across => &self.across,
            Direction::Down => &self.down,
        }
    }

    pub fn clues_mut(&mut self, direction: Direction) -> &mut IndexMap<u32, ClueEntry> {
        match direction {
            Direction::Across => &mut self.across,
            Direction::Down => &mut self.down,
        }
    }

    pub fn get(&self, direction: Direction, number: u32) -> Option<&ClueEntry> {
        self.clues(direction).get(&number)
    }

    /// Every entry, across first, each direction in source order.
    pub fn entries(&self) -> impl Iterator<Item = (Direction, u32, &ClueEntry)> {
        Direction::BOTH.into_iter().flat_map(move |direction| {
            self.clues(direction)
                .iter()
                .map(move |(number, entry)| (direction, *number, entry))
        })
    }

    pub fn len(&self) -> usize {
        self.across.len() + self.down.len()
    }

    pub fn is_empty(&self) -> bool {
        self.across.is_empty() && self.down.is_empty()
    }

    /// Every clue reported as solved, as used by "fill all".
    pub fn all_solved(&self) -> Vec<SolvedEntry> {
        self.entries()
            .map(|(direction, number, entry)| SolvedEntry::new(direction, number, entry.answer.clone()))
            .collect()
    }

    /// The clue focus starts on: lowest across number, else lowest down number.
    pub fn first_entry(&self) -> Option<(Direction, u32, &ClueEntry)> {
        Direction::BOTH.into_iter().find_map(|direction| {
            self.clues(direction)
                .iter()
                .min_by_key(|(number, _)| **number)
                .map(|(number, entry)| (direction, *number, entry))
        })
    }

    /// Check the per-entry shape of the data.
    ///
    /// Cross-entry problems (letter conflicts, overlaps) need the grid and
    /// are reported by [`crate::models::Grid::build`].
    pub fn validate(&self) -> Result<(), PuzzleError> {
        if self.is_empty() {
            return Err(PuzzleError::Empty);
        }

        for (direction, number, entry) in self.entries() {
            if entry.is_empty() {
                return Err(PuzzleError::EmptyAnswer { direction, number });
            }

            if let Some(character) = entry
                .answer
                .chars()
                .find(|c| c.is_whitespace() || c.is_control())
            {
                return Err(PuzzleError::InvalidAnswer {
                    direction,
                    number,
                    answer: entry.answer.clone(),
                    character,
                });
            }

            let start = entry.row.max(entry.col);
            if start >= MAX_GRID_SIZE {
                return Err(PuzzleError::TooLarge {
                    direction,
                    number,
                    extent: start,
                });
            }

            let (end_row, end_col) = entry.end(direction);
            let extent = end_row.max(end_col);
            if extent >= MAX_GRID_SIZE {
                return Err(PuzzleError::TooLarge {
                    direction,
                    number,
                    extent,
                });
            }
        }

        Ok(())
    }
}

/// Uppercase a single letter, keeping characters whose uppercase form
/// is more than one character (such as `ß`) unchanged.
pub fn normalize_letter(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}
