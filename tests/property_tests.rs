//! Property-based tests for grid building, navigation and guess snapshots

use crossword::models::{ClueEntry, Direction, GuessSnapshot, PuzzleData};
use crossword::state::Key;
use crossword::{CrosswordState, Effect, Event};
use proptest::prelude::*;
use std::collections::{BTreeMap, HashSet};

// C A T .
// O . O .
// W . P A
fn small_puzzle() -> PuzzleData {
    PuzzleData::new()
        .with_clue(Direction::Across, 1, ClueEntry::new("Feline", "CAT", 0, 0))
        .with_clue(Direction::Across, 4, ClueEntry::new("Father", "PA", 2, 2))
        .with_clue(Direction::Down, 1, ClueEntry::new("Bovine", "COW", 0, 0))
        .with_clue(Direction::Down, 3, ClueEntry::new("Summit", "TOP", 0, 2))
}

/// One across entry per row, at a random column.
fn across_puzzle() -> impl Strategy<Value = PuzzleData> {
    prop::collection::vec(("[A-Z]{1,6}", 0usize..5), 1..6).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .fold(PuzzleData::new(), |puzzle, (row, (answer, col))| {
                let number = row as u32 + 1;
                puzzle.with_clue(
                    Direction::Across,
                    number,
                    ClueEntry::new(format!("Clue {}", number), answer, row, col),
                )
            })
    })
}

/// Full rows (across) and full columns (down) cut from one letter square,
/// so every crossing agrees. Numbers follow start cells in reading order;
/// row 0 and column 0 share the number at the corner.
fn crossing_puzzle() -> impl Strategy<Value = PuzzleData> {
    (2usize..5)
        .prop_flat_map(|n| {
            (
                prop::collection::vec(prop::collection::vec("[A-Z]", n), n),
                prop::collection::vec(any::<bool>(), n),
                prop::collection::vec(any::<bool>(), n),
            )
        })
        .prop_filter("at least one entry", |(_, rows, cols)| {
            rows.iter().chain(cols.iter()).any(|&chosen| chosen)
        })
        .prop_map(|(letters, rows, cols)| {
            let n = letters.len();
            let across: Vec<usize> = (0..n).filter(|&r| rows[r]).collect();
            let down: Vec<usize> = (0..n).filter(|&c| cols[c]).collect();

            let mut numbers = BTreeMap::new();
            for &r in &across {
                numbers.insert((r, 0), 0);
            }
            for &c in &down {
                numbers.insert((0, c), 0);
            }
            for (i, number) in numbers.values_mut().enumerate() {
                *number = i as u32 + 1;
            }

            let mut puzzle = PuzzleData::new();
            for r in across {
                let answer: String = letters[r].concat();
                let number = numbers[&(r, 0)];
                puzzle = puzzle.with_clue(
                    Direction::Across,
                    number,
                    ClueEntry::new(format!("Row {}", r), answer, r, 0),
                );
            }
            for c in down {
                let answer: String = letters.iter().map(|row| row[c].as_str()).collect();
                let number = numbers[&(0, c)];
                puzzle = puzzle.with_clue(
                    Direction::Down,
                    number,
                    ClueEntry::new(format!("Column {}", c), answer, 0, c),
                );
            }
            puzzle
        })
}

fn any_puzzle() -> impl Strategy<Value = PuzzleData> {
    prop_oneof![across_puzzle(), crossing_puzzle()]
}

fn arrow() -> impl Strategy<Value = Key> {
    prop_oneof![
        Just(Key::ArrowUp),
        Just(Key::ArrowDown),
        Just(Key::ArrowLeft),
        Just(Key::ArrowRight),
    ]
}

fn delta(key: &Key) -> (isize, isize) {
    match key {
        Key::ArrowUp => (-1, 0),
        Key::ArrowDown => (1, 0),
        Key::ArrowLeft => (0, -1),
        _ => (0, 1),
    }
}

proptest! {
    #[test]
    fn test_every_answer_cell_is_used(puzzle in any_puzzle()) {
        let state = CrosswordState::new(puzzle.clone()).unwrap();
        let grid = state.grid();

        let mut positions = HashSet::new();
        for (direction, number, entry) in puzzle.entries() {
            for ((row, col), letter) in entry.cells(direction).zip(entry.answer.chars()) {
                let cell = grid.cell(row, col).unwrap();
                prop_assert!(cell.used);
                prop_assert_eq!(cell.answer, Some(letter));
                prop_assert_eq!(cell.entry(direction), Some(number));
                positions.insert((row, col));
            }
        }
        prop_assert_eq!(grid.used_cells().count(), positions.len());
    }

    #[test]
    fn test_arrows_stay_on_entries_in_crossing_grids(
        puzzle in crossing_puzzle(),
        keys in prop::collection::vec(arrow(), 0..40),
    ) {
        let mut state = CrosswordState::new(puzzle).unwrap();

        for key in keys {
            state.apply(Event::key(key));
            let after = state.cursor();
            let cell = state.grid().used_cell(after.row, after.col);
            prop_assert!(cell.is_some_and(|cell| cell.has_entry(after.direction)));
        }
    }

    #[test]
    fn test_arrows_never_leave_used_cells(keys in prop::collection::vec(arrow(), 0..40)) {
        let mut state = CrosswordState::new(small_puzzle()).unwrap();

        for key in keys {
            let before = state.cursor();
            let (d_row, d_col) = delta(&key);
            let target = state.grid().offset(before.row, before.col, d_row, d_col);
            let blocked = target.and_then(|(row, col)| state.grid().used_cell(row, col)).is_none();

            state.apply(Event::key(key));
            let after = state.cursor();

            if blocked {
                prop_assert_eq!(after, before);
            }
            let cell = state.grid().used_cell(after.row, after.col);
            prop_assert!(cell.is_some_and(|cell| cell.has_entry(after.direction)));
        }
    }

    #[test]
    fn test_typing_answer_solves_clue_once(puzzle in across_puzzle()) {
        let mut state = CrosswordState::new(puzzle.clone()).unwrap();

        for (direction, number, entry) in puzzle.entries() {
            state.apply(Event::ClickClue { direction, number });

            let solved: Vec<_> = entry
                .answer
                .chars()
                .flat_map(|c| state.apply(Event::char(c)))
                .filter_map(|effect| match effect {
                    Effect::Solved(solved) => Some(solved),
                    _ => None,
                })
                .collect();

            prop_assert_eq!(solved.len(), 1);
            prop_assert_eq!(solved[0].number, number);
            prop_assert_eq!(solved[0].direction, direction);
        }
        prop_assert!(state.is_solved());
    }

    #[test]
    fn test_typing_answer_solves_clue_once_across_crossings(puzzle in crossing_puzzle()) {
        for (direction, number, entry) in puzzle.entries() {
            let mut state = CrosswordState::new(puzzle.clone()).unwrap();
            state.apply(Event::ClickClue { direction, number });

            let solved: Vec<_> = entry
                .answer
                .chars()
                .flat_map(|c| state.apply(Event::char(c)))
                .filter_map(|effect| match effect {
                    Effect::Solved(solved) => Some(solved),
                    _ => None,
                })
                .filter(|solved| solved.direction == direction && solved.number == number)
                .collect();

            prop_assert_eq!(solved.len(), 1);
            prop_assert_eq!(&solved[0].answer, &entry.answer);
            prop_assert!(state.cursor().direction == direction);
        }
    }

    #[test]
    fn test_capture_then_restore(letters in prop::collection::vec(prop::option::of("[A-Z]"), 8)) {
        let mut source = CrosswordState::new(small_puzzle()).unwrap();

        let mut seed = GuessSnapshot::default();
        let positions: Vec<(usize, usize)> = source.grid().used_cells().map(|cell| (cell.row, cell.col)).collect();
        for ((row, col), letter) in positions.into_iter().zip(letters) {
            seed.guesses.insert(format!("{}_{}", row, col), letter.unwrap_or_default());
        }
        source.apply(Event::Restore(seed));

        let blob = source.snapshot().to_blob().unwrap();
        let mut target = CrosswordState::new(small_puzzle()).unwrap();
        target.apply(Event::Restore(GuessSnapshot::from_blob(&blob).unwrap()));

        for cell in source.grid().used_cells() {
            prop_assert_eq!(target.grid().cell(cell.row, cell.col).unwrap().guess, cell.guess);
        }
    }

    #[test]
    fn test_fill_then_reset_clears_everything(text in "[a-z]{0,8}") {
        let mut state = CrosswordState::new(small_puzzle()).unwrap();
        for c in text.chars() {
            state.apply(Event::char(c));
        }

        state.apply(Event::FillAll);
        prop_assert!(state.is_solved());

        let effects = state.apply(Event::Reset);
        prop_assert!(effects.contains(&Effect::ClearPersisted));
        prop_assert!(state.grid().used_cells().all(|cell| cell.guess.is_none()));
    }
}
