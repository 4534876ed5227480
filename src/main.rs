//! Crossword - console host for the crossword state machine.
//!
//! # Usage
//!
//! ```text
//! crossword <puzzle.yaml|puzzle.json> [config dir]
//! ```
//!
//! The config directory (default `Crossword Data`) holds
//! `Crossword Settings.yaml` and, when storage is enabled, the saved guesses.
//!
//! # Execution Flow
//!
//! 1. Load user settings (file, then `CROSSWORD_*` environment overrides)
//! 2. Initialize logging → `<log_dir>/crossword.<date>`
//! 3. Load and validate the puzzle
//! 4. Create the session with the configured guess store
//! 5. Start the change listener thread
//! 6. Run the console until `quit` or end of input
//! 7. Log the metrics summary

use anyhow::{Context, Result};
use crossword::services::SessionChange;
use crossword::ui::ConsoleController;
use crossword::{APP_NAME, ConfigManager, CrosswordSession, SessionOptions, VERSION};
use tokio::sync::broadcast::{self, error::RecvError};

const DEFAULT_CONFIG_DIR: &str = "Crossword Data";

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let Some(puzzle_path) = args.next() else {
        anyhow::bail!("Usage: {} <puzzle file> [config dir]", APP_NAME);
    };
    let config_dir = args.next().unwrap_or_else(|| DEFAULT_CONFIG_DIR.to_string());

    let config_manager = ConfigManager::new(&config_dir)?;
    let user_config = config_manager.load_user_config()?;
    let settings = &user_config.settings;

    // Keep the guard alive until exit so buffered log lines are flushed
    let _log_guard = crossword::logging::setup_logging_with_console(
        &settings.log_dir,
        APP_NAME,
        settings.debug_mode,
        settings.console_log,
    )?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    let puzzle = config_manager
        .load_puzzle(&puzzle_path)
        .with_context(|| format!("Could not open puzzle {}", puzzle_path))?;

    let store = config_manager.guess_store(settings);
    let session = CrosswordSession::new(puzzle, store, SessionOptions::from(settings))?;
    let metrics = session.metrics();

    let listener = spawn_change_listener(session.subscribe());

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut console = ConsoleController::new(session, stdin.lock(), stdout.lock());
    let result = console.run();

    // Dropping the console drops the session and closes the channel
    drop(console);
    if listener.join().is_err() {
        tracing::warn!("Change listener thread panicked");
    }

    metrics.log_summary();
    tracing::info!("Shutdown complete");

    result
}

/// Log committed session changes from a background thread.
///
/// Outbound letter updates are where a collaborative host would forward the
/// blob to other players.
fn spawn_change_listener(
    mut rx: broadcast::Receiver<SessionChange>,
) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        tracing::debug!("Change listener thread started");

        loop {
            match rx.blocking_recv() {
                Ok(SessionChange::LetterUpdate(snapshot)) => match snapshot.to_blob() {
                    Ok(blob) => tracing::info!("Outbound letter update: {}", blob),
                    Err(e) => tracing::warn!("Could not encode letter update: {}", e),
                },
                Ok(SessionChange::Solved(entry)) => tracing::info!("Solved {}", entry),
                Ok(SessionChange::LoadedCorrect(entries)) if !entries.is_empty() => {
                    tracing::info!("{} entries already correct", entries.len());
                }
                Ok(change) => tracing::trace!("Session change: {:?}", change),
                Err(RecvError::Closed) => {
                    tracing::info!("Session channel closed - stopping change listener");
                    break;
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Change listener lagged - {} changes were skipped", skipped);
                }
            }
        }
    })
}
