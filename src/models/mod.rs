//! Data models for the crossword.
//!
//! - [`PuzzleData`]: clue data per direction, as loaded from a puzzle file
//! - [`Grid`]: the square of [`Cell`]s built from the puzzle by [`Grid::build`]
//! - [`GuessSnapshot`]: serialized guesses used for persistence and sharing
//! - [`UserConfig`]: user settings loaded from `Crossword Settings.yaml`
//!
//! Models hold no navigation state; that lives in [`crate::state`].

pub mod config;
pub mod grid;
pub mod puzzle;
pub mod snapshot;

pub use config::{CrosswordSettings, UserConfig};
pub use grid::{Cell, ClueLabel, ClueListing, Grid};
pub use puzzle::{
    ClueEntry, Direction, MAX_GRID_SIZE, PuzzleData, PuzzleError, SolvedEntry, normalize_letter,
};
pub use snapshot::GuessSnapshot;
