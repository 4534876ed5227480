// Input events and the effects a transition produces.

use crate::models::{Direction, GuessSnapshot, SolvedEntry};

/// A key as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Tab,
    Space,
    Backspace,
    Delete,
    Home,
    End,

    /// A single printable character
    Char(char),

    /// Any other named key; ignored by the state machine
    Other(String),
}

impl Key {
    /// Map a DOM-style key name (`"ArrowUp"`, `"Tab"`, `" "`, `"a"`) to a key.
    pub fn from_name(name: &str) -> Self {
        match name {
            "ArrowUp" | "Up" => Key::ArrowUp,
            "ArrowDown" | "Down" => Key::ArrowDown,
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowRight" | "Right" => Key::ArrowRight,
            "Tab" => Key::Tab,
            " " | "Space" => Key::Space,
            "Backspace" => Key::Backspace,
            "Delete" | "Del" => Key::Delete,
            "Home" => Key::Home,
            "End" => Key::End,
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if !c.is_control() => Key::Char(c),
                    _ => Key::Other(name.to_string()),
                }
            }
        }
    }
}

/// Modifier keys held during a key press.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.ctrl || self.alt || self.meta
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyInput {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::default(),
        }
    }
}

/// Everything that can drive a transition of [`super::CrosswordState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The widget gained input focus
    Focus,

    /// The widget lost input focus
    Blur,

    ClickCell { row: usize, col: usize },
    ClickClue { direction: Direction, number: u32 },
    Key(KeyInput),

    /// Set every guess to its answer
    FillAll,

    /// Clear every guess and drop the persisted snapshot
    Reset,

    /// Write a stored or shared snapshot back into the grid
    Restore(GuessSnapshot),
}

impl Event {
    /// A key press without modifiers.
    pub fn key(key: Key) -> Self {
        Event::Key(KeyInput::plain(key))
    }

    /// A typed character.
    pub fn char(c: char) -> Self {
        Event::key(Key::Char(c))
    }
}

/// Side effects of a transition, handed to the host after the new state is
/// in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// A single cell's guess changed
    GuessChanged {
        row: usize,
        col: usize,
        guess: Option<char>,
    },

    /// Many guesses changed at once (fill, reset, restore)
    GuessesReplaced,

    /// An entry became fully correct because of a typed letter
    Solved(SolvedEntry),

    /// Entries found correct after a bulk change
    LoadedCorrect(Vec<SolvedEntry>),

    /// Any persisted snapshot should be discarded
    ClearPersisted,
}

impl Effect {
    pub fn changes_guesses(&self) -> bool {
        matches!(self, Effect::GuessChanged { .. } | Effect::GuessesReplaced)
    }
}
