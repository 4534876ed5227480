// UI module - console host
//
// This module contains:
// - CommandParser: turns console lines into session events and host commands
// - ConsoleController: drives a CrosswordSession from a line reader and renders the grid

pub mod commands;
pub mod console;

pub use commands::{Command, CommandError, CommandParser};
pub use console::{ConsoleController, describe_change, render_text};
