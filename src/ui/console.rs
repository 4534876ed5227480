use super::commands::{Command, CommandParser, HELP};
use crate::models::Direction;
use crate::services::{CrosswordSession, SessionChange};
use crate::state::CrosswordState;
use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::io::{BufRead, Write};

/// Line-oriented host for a [`CrosswordSession`].
///
/// Reads commands from `input`, applies them to the session and writes the
/// resulting changes and the grid to `output`.
pub struct ConsoleController<R, W> {
    session: CrosswordSession,
    parser: CommandParser,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsoleController<R, W> {
    pub fn new(session: CrosswordSession, input: R, output: W) -> Self {
        Self {
            session,
            parser: CommandParser::new(),
            input,
            output,
        }
    }

    pub fn session(&self) -> &CrosswordSession {
        &self.session
    }

    /// Load the session, then run until `quit` or end of input.
    pub fn run(&mut self) -> Result<()> {
        let changes = self.session.load();
        self.report(&changes)?;
        self.show()?;

        let mut line = String::new();
        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;

            line.clear();
            let read = self
                .input
                .read_line(&mut line)
                .context("Failed to read command")?;
            if read == 0 {
                tracing::info!("End of input, leaving console");
                break;
            }

            match self.parser.parse(&line) {
                Ok(Some(Command::Quit)) => break,
                Ok(Some(command)) => self.execute(command)?,
                Ok(None) => {}
                Err(e) => writeln!(self.output, "error: {}", e)?,
            }
        }

        Ok(())
    }

    fn execute(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Dispatch(events) => {
                let changes: Vec<SessionChange> = events
                    .into_iter()
                    .flat_map(|event| self.session.dispatch(event))
                    .collect();
                self.report(&changes)?;
                self.show()?;
            }
            Command::Remote(blob) => match self.session.apply_remote(&blob) {
                Ok(changes) if changes.is_empty() => writeln!(self.output, "no new guesses")?,
                Ok(changes) => {
                    self.report(&changes)?;
                    self.show()?;
                }
                Err(e) => writeln!(self.output, "error: {}", e)?,
            },
            Command::Show => self.show()?,
            Command::Save => match self.session.persist_now() {
                Ok(()) => writeln!(self.output, "saved")?,
                Err(e) => writeln!(self.output, "error: {}", e)?,
            },
            Command::Help => writeln!(self.output, "{}", HELP)?,
            Command::Quit => {}
        }
        Ok(())
    }

    fn report(&mut self, changes: &[SessionChange]) -> Result<()> {
        for change in changes {
            if let Some(message) = describe_change(change) {
                writeln!(self.output, "{}", message)?;
            }
        }
        Ok(())
    }

    fn show(&mut self) -> Result<()> {
        write!(self.output, "{}", render_text(self.session.state()))?;
        Ok(())
    }
}

/// One-line description of a change, or `None` for changes the grid
/// rendering already shows.
pub fn describe_change(change: &SessionChange) -> Option<String> {
    match change {
        SessionChange::PuzzleLoaded { size } => Some(format!("puzzle loaded ({0}x{0})", size)),
        SessionChange::FocusChanged { .. } => None,
        SessionChange::LetterUpdate(snapshot) => Some(format!(
            "letter update: {} guesses to share",
            snapshot.filled()
        )),
        SessionChange::Solved(entry) => Some(format!("solved {}", entry)),
        SessionChange::LoadedCorrect(entries) if entries.is_empty() => None,
        SessionChange::LoadedCorrect(entries) => {
            let names: Vec<String> = entries.iter().map(ToString::to_string).collect();
            Some(format!("correct: {}", names.join(", ")))
        }
    }
}

/// Plain-text rendering of the grid and clue lists.
///
/// `###` is a black square, `[X]` the cursor cell, `(X)` the rest of the
/// highlighted entry and `.` an empty guess. The highlight and the `>`
/// clue marker are only drawn while the widget has focus.
pub fn render_text(state: &CrosswordState) -> String {
    let mut out = String::new();
    let cursor = state.cursor();
    let focused = state.is_focused();

    for row in state.grid().rows() {
        for cell in row {
            let letter = cell.guess.unwrap_or('.');
            let _ = if !cell.used {
                write!(out, "###")
            } else if cell.row == cursor.row && cell.col == cursor.col {
                write!(out, "[{}]", letter)
            } else if focused && state.is_highlighted(cell) {
                write!(out, "({})", letter)
            } else {
                write!(out, " {} ", letter)
            };
        }
        out.push('\n');
    }

    let solved = state.correct_entries();
    for direction in Direction::BOTH {
        let _ = writeln!(out, "{}:", direction.to_string().to_uppercase());
        for label in state.clues().for_direction(direction) {
            let current =
                focused && direction == cursor.direction && state.highlight() == Some(label.number);
            let done = solved
                .iter()
                .any(|entry| entry.direction == direction && entry.number == label.number);
            let _ = writeln!(
                out,
                "{} {:>3}. {}{}",
                if current { ">" } else { " " },
                label.number,
                label.clue,
                if done { " (solved)" } else { "" }
            );
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClueEntry, PuzzleData};
    use crate::services::{NoopStore, SessionOptions};
    use crate::state::Event;
    use std::io::Cursor;

    fn session() -> CrosswordSession {
        let puzzle = PuzzleData::new()
            .with_clue(Direction::Across, 1, ClueEntry::new("Feline", "CAT", 0, 0))
            .with_clue(Direction::Down, 1, ClueEntry::new("Bovine", "COW", 0, 0));
        CrosswordSession::new(puzzle, Box::new(NoopStore), SessionOptions::default()).unwrap()
    }

    fn run_script(script: &str) -> String {
        let mut output = Vec::new();
        {
            let input = Cursor::new(script.as_bytes());
            let mut console = ConsoleController::new(session(), input, &mut output);
            console.run().unwrap();
        }
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_render_initial_grid() {
        let state = session().state().clone();
        let text = render_text(&state);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "[.] .  . ");
        assert_eq!(lines[1], " . ######");
        assert_eq!(lines[2], " . ######");
        assert_eq!(lines[3], "ACROSS:");
        assert_eq!(lines[4], "    1. Feline");
        assert_eq!(lines[6], "    1. Bovine");
    }

    #[test]
    fn test_render_highlight_follows_focus() {
        let mut state = session().state().clone();

        state.apply(Event::Focus);
        let text = render_text(&state);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "[.](.)(.)");
        assert_eq!(lines[4], ">   1. Feline");
        assert_eq!(lines[6], "    1. Bovine");

        state.apply(Event::Blur);
        let text = render_text(&state);
        assert!(!text.contains('('));
        assert!(!text.contains('>'));
        assert!(text.starts_with("[.]"));
    }

    #[test]
    fn test_console_typing_reports_solved() {
        let output = run_script("type cat\nquit\n");
        assert!(output.contains("puzzle loaded (3x3)"));
        assert!(output.contains("solved 1 across: CAT"));
        assert!(output.contains(" 1. Feline (solved)"));
    }

    #[test]
    fn test_console_reports_errors_and_keeps_going() {
        let output = run_script("bogus\nclick 9\nhelp\n");
        assert!(output.contains("error: Unknown command: bogus"));
        assert!(output.contains("error: Usage: click ROW COL"));
        assert!(output.contains("Commands:"));
    }

    #[test]
    fn test_console_remote_and_fill() {
        let output = run_script(
            "remote {\"date\":1,\"guesses\":{\"1_0\":\"O\"}}\n\
             remote {\"date\":2,\"guesses\":{\"1_0\":\"O\"}}\n\
             fill\n",
        );
        assert!(output.contains("no new guesses"));
        assert!(output.contains("correct: 1 across: CAT, 1 down: COW"));
    }

    #[test]
    fn test_describe_change_skips_focus() {
        let change = SessionChange::FocusChanged {
            row: 0,
            col: 0,
            direction: Direction::Across,
            highlight: Some(1),
        };
        assert_eq!(describe_change(&change), None);
        assert_eq!(describe_change(&SessionChange::LoadedCorrect(Vec::new())), None);
    }
}
