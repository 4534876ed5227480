// Crossword - puzzle grid state machine with guess persistence
//
// This is the library crate containing the grid model, the navigation and
// answer-checking state machine and the session around it.
// The binary crate (main.rs) provides a console host.

pub mod config;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod state;
pub mod ui;

// Re-export commonly used types for convenience
pub use config::ConfigManager;
pub use models::{ClueEntry, Direction, GuessSnapshot, PuzzleData, PuzzleError, UserConfig};
pub use services::{CrosswordSession, SessionChange, SessionOptions};
pub use state::{CrosswordState, Effect, Event, reduce};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
