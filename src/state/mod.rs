// Crossword state machine
//
// CrosswordState holds the grid plus navigation state and is driven by
// Events. Transitions never call out: they return Effects for the host to
// act on once the new state is in place.

pub mod events;
mod navigation;

pub use events::{Effect, Event, Key, KeyInput, Modifiers};

use crate::models::{
    Cell, ClueEntry, ClueListing, Direction, Grid, GuessSnapshot, PuzzleData, PuzzleError,
    SolvedEntry, normalize_letter,
};

/// Focused cell and typing direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub row: usize,
    pub col: usize,
    pub direction: Direction,
}

impl Cursor {
    pub fn new(row: usize, col: usize, direction: Direction) -> Self {
        Self { row, col, direction }
    }
}

/// Grid, clues and navigation state for one puzzle.
///
/// Build a fresh state whenever the puzzle data changes; there is no way to
/// swap the puzzle under an existing state.
///
/// # Usage
///
/// - [`reduce()`] for a pure `(state, event) -> (state, effects)` step
/// - [`apply()`](Self::apply) to transition in place
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrosswordState {
    puzzle: PuzzleData,
    grid: Grid,
    clues: ClueListing,

    /// Whether the widget has input focus
    focused: bool,

    cursor: Cursor,
}

impl CrosswordState {
    /// Build the grid for `puzzle` and place the cursor on its first clue.
    pub fn new(puzzle: PuzzleData) -> Result<Self, PuzzleError> {
        let (grid, clues) = Grid::build(&puzzle)?;

        let cursor = puzzle
            .first_entry()
            .map(|(direction, _, entry)| Cursor::new(entry.row, entry.col, direction))
            .unwrap_or(Cursor::new(0, 0, Direction::Across));

        Ok(Self {
            puzzle,
            grid,
            clues,
            focused: false,
            cursor,
        })
    }

    pub fn puzzle(&self) -> &PuzzleData {
        &self.puzzle
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn clues(&self) -> &ClueListing {
        &self.clues
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn focused_cell(&self) -> Option<&Cell> {
        self.grid.cell(self.cursor.row, self.cursor.col)
    }

    /// Clue number of the entry through the focused cell in the current
    /// direction.
    pub fn highlight(&self) -> Option<u32> {
        self.focused_cell()
            .and_then(|cell| cell.entry(self.cursor.direction))
    }

    /// The highlighted entry.
    pub fn current_entry(&self) -> Option<&ClueEntry> {
        self.highlight()
            .and_then(|number| self.puzzle.get(self.cursor.direction, number))
    }

    /// Whether `cell` is part of the highlighted entry.
    pub fn is_highlighted(&self, cell: &Cell) -> bool {
        self.highlight()
            .is_some_and(|number| cell.entry(self.cursor.direction) == Some(number))
    }

    pub fn snapshot(&self) -> GuessSnapshot {
        GuessSnapshot::capture(&self.grid)
    }

    pub fn correct_entries(&self) -> Vec<SolvedEntry> {
        self.grid.correct_entries(&self.puzzle)
    }

    pub fn is_solved(&self) -> bool {
        self.grid.is_solved()
    }

    /// Apply one event in place and return its effects.
    pub fn apply(&mut self, event: Event) -> Vec<Effect> {
        let mut effects = Vec::new();

        match event {
            Event::Focus => self.focused = true,
            Event::Blur => self.focused = false,
            Event::ClickCell { row, col } => {
                self.click_cell(row, col);
            }
            Event::ClickClue { direction, number } => {
                self.click_clue(direction, number);
            }
            Event::Key(input) => self.apply_key(input, &mut effects),
            Event::FillAll => {
                self.grid.fill_answers();
                effects.push(Effect::GuessesReplaced);
                effects.push(Effect::LoadedCorrect(self.puzzle.all_solved()));
            }
            Event::Reset => {
                self.grid.clear_guesses();
                effects.push(Effect::GuessesReplaced);
                effects.push(Effect::ClearPersisted);
            }
            Event::Restore(snapshot) => {
                let changed = snapshot.apply_to(&mut self.grid);
                tracing::debug!("Restored snapshot: {} cells changed", changed);
                if changed > 0 {
                    effects.push(Effect::GuessesReplaced);
                }
                effects.push(Effect::LoadedCorrect(self.correct_entries()));
            }
        }

        effects
    }

    fn apply_key(&mut self, input: KeyInput, effects: &mut Vec<Effect>) {
        if input.modifiers.any() {
            tracing::debug!("Ignoring {:?} with modifiers held", input.key);
            return;
        }

        match input.key {
            Key::ArrowUp => {
                self.move_relative(-1, 0);
            }
            Key::ArrowDown => {
                self.move_relative(1, 0);
            }
            Key::ArrowLeft => {
                self.move_relative(0, -1);
            }
            Key::ArrowRight => {
                self.move_relative(0, 1);
            }
            Key::Tab | Key::Space | Key::Char(' ') => {
                self.toggle_direction();
            }
            Key::Backspace => {
                self.write_focused(None, effects);
                self.move_backward();
            }
            Key::Delete => self.write_focused(None, effects),
            Key::Home => {
                self.jump_to_entry_edge(false);
            }
            Key::End => {
                self.jump_to_entry_edge(true);
            }
            Key::Char(c) if c.is_whitespace() || c.is_control() => {
                tracing::debug!("Ignoring non-printable character {:?}", c);
            }
            Key::Char(c) => {
                self.write_focused(Some(normalize_letter(c)), effects);
                self.move_forward();
            }
            Key::Other(name) => {
                tracing::debug!("Ignoring key {}", name);
            }
        }
    }

    fn write_focused(&mut self, guess: Option<char>, effects: &mut Vec<Effect>) {
        let Cursor { row, col, .. } = self.cursor;
        self.write_guess(row, col, guess, effects);
    }

    /// Write a guess and check the entries through the cell.
    ///
    /// Rewriting the letter already in the cell changes nothing and reports
    /// nothing. When the new letter is correct, each entry through the cell
    /// whose other cells already match is reported as solved.
    fn write_guess(&mut self, row: usize, col: usize, guess: Option<char>, effects: &mut Vec<Effect>) {
        let Some(cell) = self.grid.used_cell(row, col) else {
            return;
        };

        let answer = cell.answer;
        let entries = [
            (Direction::Across, cell.across),
            (Direction::Down, cell.down),
        ];

        if !self.grid.set_guess(row, col, guess) {
            return;
        }
        effects.push(Effect::GuessChanged { row, col, guess });

        if guess.is_none() || guess != answer {
            return;
        }

        for (direction, number) in entries {
            let Some(number) = number else { continue };
            let Some(entry) = self.puzzle.get(direction, number) else {
                continue;
            };

            if self.grid.entry_is_complete(direction, entry, Some((row, col))) {
                tracing::info!("Solved {} {}: {}", number, direction, entry.answer);
                effects.push(Effect::Solved(SolvedEntry::new(
                    direction,
                    number,
                    entry.answer.clone(),
                )));
            }
        }
    }
}

/// Pure transition: the next state and the effects to run after it is
/// committed.
pub fn reduce(state: &CrosswordState, event: Event) -> (CrosswordState, Vec<Effect>) {
    let mut next = state.clone();
    let effects = next.apply(event);
    (next, effects)
}
