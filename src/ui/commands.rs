use crate::models::Direction;
use crate::state::{Event, Key, KeyInput, Modifiers};
use regex::Regex;
use thiserror::Error;

/// Usage text printed by `help`.
pub const HELP: &str = "\
Commands:
  click R C              focus the cell at row R, column C
  clue across|down N     jump to clue N
  key [ctrl+|alt+|meta+]NAME
                         press a key (ArrowUp, Tab, Space, Backspace, Delete, Home, End, or a letter)
  type TEXT              type each character of TEXT (a space toggles direction)
  remote BLOB            merge a guess snapshot from another player
  focus | blur           give or take input focus
  fill                   fill every answer
  reset                  clear every guess
  show                   print the grid
  save                   write guesses to storage now
  help                   print this text
  quit                   exit";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command: {0} (try 'help')")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Number out of range: {0}")]
    InvalidNumber(String),
}

/// A parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Events for the session, applied in order
    Dispatch(Vec<Event>),

    /// Snapshot blob pushed by another player
    Remote(String),

    Show,
    Save,
    Help,
    Quit,
}

/// Parser for console lines.
pub struct CommandParser {
    click_pattern: Regex,
    clue_pattern: Regex,
    key_pattern: Regex,
    type_pattern: Regex,
    remote_pattern: Regex,
}

impl CommandParser {
    pub fn new() -> Self {
        Self {
            click_pattern: Regex::new(r"^click\s+(\d+)\s+(\d+)$").expect("Invalid click regex"),
            clue_pattern: Regex::new(r"^clue\s+(?i)(across|down)\s+(\d+)$")
                .expect("Invalid clue regex"),
            key_pattern: Regex::new(r"^key\s+((?:(?:ctrl|alt|meta)\+)*)(\S+)$")
                .expect("Invalid key regex"),
            type_pattern: Regex::new(r"^type\s+(.+)$").expect("Invalid type regex"),
            remote_pattern: Regex::new(r"^remote\s+(\{.*\})$").expect("Invalid remote regex"),
        }
    }

    /// Parse one line. Blank lines yield `Ok(None)`.
    pub fn parse(&self, line: &str) -> Result<Option<Command>, CommandError> {
        let line = line.trim();
        let Some(word) = line.split_whitespace().next() else {
            return Ok(None);
        };

        let command = match word {
            "click" => {
                let caps = self
                    .click_pattern
                    .captures(line)
                    .ok_or(CommandError::Usage("click ROW COL"))?;
                Command::Dispatch(vec![Event::ClickCell {
                    row: parse_number(&caps[1])?,
                    col: parse_number(&caps[2])?,
                }])
            }
            "clue" => {
                let caps = self
                    .clue_pattern
                    .captures(line)
                    .ok_or(CommandError::Usage("clue across|down NUMBER"))?;
                let direction =
                    Direction::parse(&caps[1]).ok_or(CommandError::Usage("clue across|down NUMBER"))?;
                Command::Dispatch(vec![Event::ClickClue {
                    direction,
                    number: parse_number(&caps[2])?,
                }])
            }
            "key" => {
                let caps = self
                    .key_pattern
                    .captures(line)
                    .ok_or(CommandError::Usage("key [ctrl+|alt+|meta+]NAME"))?;
                Command::Dispatch(vec![Event::Key(KeyInput {
                    key: Key::from_name(&caps[2]),
                    modifiers: parse_modifiers(&caps[1]),
                })])
            }
            "type" => {
                let caps = self
                    .type_pattern
                    .captures(line)
                    .ok_or(CommandError::Usage("type TEXT"))?;
                Command::Dispatch(caps[1].chars().map(Event::char).collect())
            }
            "remote" => {
                let caps = self
                    .remote_pattern
                    .captures(line)
                    .ok_or(CommandError::Usage("remote {\"date\":...,\"guesses\":{...}}"))?;
                Command::Remote(caps[1].to_string())
            }
            "focus" => Command::Dispatch(vec![Event::Focus]),
            "blur" => Command::Dispatch(vec![Event::Blur]),
            "fill" => Command::Dispatch(vec![Event::FillAll]),
            "reset" => Command::Dispatch(vec![Event::Reset]),
            "show" => Command::Show,
            "save" => Command::Save,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };

        Ok(Some(command))
    }
}

impl Default for CommandParser {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_number<T: std::str::FromStr>(digits: &str) -> Result<T, CommandError> {
    digits
        .parse()
        .map_err(|_| CommandError::InvalidNumber(digits.to_string()))
}

fn parse_modifiers(prefix: &str) -> Modifiers {
    let mut modifiers = Modifiers::default();
    for name in prefix.split('+') {
        match name {
            "ctrl" => modifiers.ctrl = true,
            "alt" => modifiers.alt = true,
            "meta" => modifiers.meta = true,
            _ => {}
        }
    }
    modifiers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Command {
        CommandParser::new().parse(line).unwrap().unwrap()
    }

    #[test]
    fn test_parse_click_and_clue() {
        assert_eq!(
            parse("click 2 3"),
            Command::Dispatch(vec![Event::ClickCell { row: 2, col: 3 }])
        );
        assert_eq!(
            parse("  clue Down 14 "),
            Command::Dispatch(vec![Event::ClickClue {
                direction: Direction::Down,
                number: 14
            }])
        );
    }

    #[test]
    fn test_parse_key_with_modifiers() {
        assert_eq!(parse("key Tab"), Command::Dispatch(vec![Event::key(Key::Tab)]));
        assert_eq!(
            parse("key ctrl+alt+c"),
            Command::Dispatch(vec![Event::Key(KeyInput {
                key: Key::Char('c'),
                modifiers: Modifiers {
                    ctrl: true,
                    alt: true,
                    meta: false
                },
            })])
        );
    }

    #[test]
    fn test_parse_type_expands_to_chars() {
        assert_eq!(
            parse("type cat"),
            Command::Dispatch(vec![Event::char('c'), Event::char('a'), Event::char('t')])
        );
    }

    #[test]
    fn test_parse_remote_keeps_blob() {
        let blob = r#"{"date":1,"guesses":{"0_0":"C"}}"#;
        assert_eq!(
            parse(&format!("remote {}", blob)),
            Command::Remote(blob.to_string())
        );
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse("fill"), Command::Dispatch(vec![Event::FillAll]));
        assert_eq!(parse("reset"), Command::Dispatch(vec![Event::Reset]));
        assert_eq!(parse("show"), Command::Show);
        assert_eq!(parse("save"), Command::Save);
        assert_eq!(parse("?"), Command::Help);
        assert_eq!(parse("exit"), Command::Quit);
    }

    #[test]
    fn test_parse_errors() {
        let parser = CommandParser::new();
        assert_eq!(parser.parse("   "), Ok(None));
        assert_eq!(
            parser.parse("jump 1"),
            Err(CommandError::Unknown("jump".to_string()))
        );
        assert_eq!(
            parser.parse("click 1"),
            Err(CommandError::Usage("click ROW COL"))
        );
        assert_eq!(
            parser.parse("clue sideways 1"),
            Err(CommandError::Usage("clue across|down NUMBER"))
        );
        assert_eq!(
            parser.parse("clue across 99999999999"),
            Err(CommandError::InvalidNumber("99999999999".to_string()))
        );
        assert!(matches!(parser.parse("remote nope"), Err(CommandError::Usage(_))));
    }
}
