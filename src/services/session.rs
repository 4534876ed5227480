use crate::metrics::Metrics;
use crate::models::{CrosswordSettings, Direction, GuessSnapshot, PuzzleData, PuzzleError, SolvedEntry};
use crate::services::storage::{GuessStore, StorageError};
use crate::state::{CrosswordState, Effect, Event};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Notifications published after a transition has been committed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionChange {
    /// A puzzle was (re)loaded and navigation reset
    PuzzleLoaded { size: usize },

    /// Focused cell, direction or highlighted clue moved
    FocusChanged {
        row: usize,
        col: usize,
        direction: Direction,
        highlight: Option<u32>,
    },

    /// Outbound guess update for other players; only emitted for local edits
    /// when sharing is enabled
    LetterUpdate(GuessSnapshot),

    /// A typed letter completed an entry
    Solved(SolvedEntry),

    /// Entries found correct after loading, restoring or filling the grid
    LoadedCorrect(Vec<SolvedEntry>),
}

/// Where a transition came from. Decides what gets persisted or echoed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOrigin {
    /// Input from this player
    Local,

    /// Guesses pushed by another player
    Remote,

    /// Guesses read back while loading a puzzle
    Load,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// Restore guesses from the store on load; otherwise use `initial_guesses`
    pub use_storage: bool,

    /// Publish local edits as [`SessionChange::LetterUpdate`] instead of
    /// writing them to the store
    pub share_updates: bool,

    /// Snapshot blob supplied by the host when `use_storage` is off
    pub initial_guesses: Option<String>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            use_storage: true,
            share_updates: false,
            initial_guesses: None,
        }
    }
}

impl From<&CrosswordSettings> for SessionOptions {
    fn from(settings: &CrosswordSettings) -> Self {
        Self {
            use_storage: settings.use_storage,
            share_updates: settings.share_updates,
            initial_guesses: None,
        }
    }
}

/// Drives a [`CrosswordState`] and owns everything around it: the guess
/// store, the notification channel and the metrics.
///
/// Every operation follows the same commit order:
/// 1. apply the event to the state
/// 2. persist (or publish) the guesses
/// 3. broadcast the resulting [`SessionChange`]s
///
/// so a subscriber never sees a notification before the state it refers
/// to. The same changes are also returned to the caller.
///
/// # Usage
///
/// ```ignore
/// let mut session = CrosswordSession::new(puzzle, Box::new(NoopStore), SessionOptions::default())?;
/// let mut rx = session.subscribe();
/// session.load();
/// session.dispatch(Event::char('C'));
/// ```
pub struct CrosswordSession {
    state: CrosswordState,
    store: Box<dyn GuessStore + Send>,
    options: SessionOptions,

    /// Broadcast channel for committed changes
    changes_tx: broadcast::Sender<SessionChange>,

    metrics: Arc<Metrics>,
}

impl CrosswordSession {
    /// Build the grid for `puzzle`. Guesses are not read until
    /// [`load()`](Self::load), so callers can subscribe first.
    pub fn new(
        puzzle: PuzzleData,
        store: Box<dyn GuessStore + Send>,
        options: SessionOptions,
    ) -> Result<Self, PuzzleError> {
        let state = CrosswordState::new(puzzle)?;
        let (changes_tx, _) = broadcast::channel(100);

        tracing::info!(
            "Crossword session created: {}x{} grid, storage={}, sharing={}",
            state.grid().size(),
            state.grid().size(),
            options.use_storage,
            options.share_updates
        );

        Ok(Self {
            state,
            store,
            options,
            changes_tx,
            metrics: Arc::new(Metrics::new()),
        })
    }

    /// Restore saved guesses and report the entries they already solve.
    pub fn load(&mut self) -> Vec<SessionChange> {
        let mut changes = vec![SessionChange::PuzzleLoaded {
            size: self.state.grid().size(),
        }];

        if let Some(blob) = self.saved_blob() {
            match GuessSnapshot::from_blob(&blob) {
                Ok(snapshot) => {
                    tracing::info!("Loaded {} saved guesses", snapshot.filled());
                    changes.extend(self.run(Event::Restore(snapshot), UpdateOrigin::Load));
                }
                Err(e) => {
                    tracing::warn!("Ignoring unreadable saved guesses: {}", e);
                    self.metrics.record_persistence_error();
                }
            }
        }

        self.publish(&changes);
        changes
    }

    /// Apply a local input event.
    pub fn dispatch(&mut self, event: Event) -> Vec<SessionChange> {
        let changes = self.run(event, UpdateOrigin::Local);
        self.publish(&changes);
        changes
    }

    /// Merge a guess snapshot pushed by another player.
    ///
    /// A snapshot that would not change any cell is dropped. Otherwise the
    /// guesses are restored and stored, and the already-correct entries are
    /// reported, but no [`SessionChange::LetterUpdate`] is emitted so the
    /// update is not echoed back.
    pub fn apply_remote(&mut self, blob: &str) -> Result<Vec<SessionChange>, StorageError> {
        let snapshot = GuessSnapshot::from_blob(blob)?;

        let mut scratch = self.state.grid().clone();
        if snapshot.apply_to(&mut scratch) == 0 {
            tracing::debug!("Remote guesses match local grid, nothing to merge");
            return Ok(Vec::new());
        }

        self.metrics.record_remote_update();
        let changes = self.run(Event::Restore(snapshot), UpdateOrigin::Remote);
        self.publish(&changes);
        Ok(changes)
    }

    /// Swap in new puzzle data: rebuild the grid, reset navigation and
    /// reload saved guesses.
    pub fn replace_puzzle(&mut self, puzzle: PuzzleData) -> Result<Vec<SessionChange>, PuzzleError> {
        self.state = CrosswordState::new(puzzle)?;
        tracing::info!("Puzzle replaced, grid is now {}x{}", self.state.grid().size(), self.state.grid().size());
        Ok(self.load())
    }

    pub fn fill_all(&mut self) -> Vec<SessionChange> {
        self.dispatch(Event::FillAll)
    }

    pub fn reset(&mut self) -> Vec<SessionChange> {
        self.dispatch(Event::Reset)
    }

    /// Write the current guesses to the store now.
    pub fn persist_now(&mut self) -> Result<(), StorageError> {
        let blob = self.state.snapshot().to_blob()?;
        self.store.write(&blob)?;
        self.metrics.record_snapshot_persisted();
        Ok(())
    }

    pub fn state(&self) -> &CrosswordState {
        &self.state
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn snapshot(&self) -> GuessSnapshot {
        self.state.snapshot()
    }

    /// Receive every change committed from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionChange> {
        self.changes_tx.subscribe()
    }

    pub fn metrics(&self) -> Arc<Metrics> {
        Arc::clone(&self.metrics)
    }

    fn saved_blob(&self) -> Option<String> {
        if !self.options.use_storage {
            return self.options.initial_guesses.clone();
        }

        match self.store.read() {
            Ok(blob) => blob,
            Err(e) => {
                tracing::warn!("Could not read saved guesses: {}", e);
                self.metrics.record_persistence_error();
                None
            }
        }
    }

    /// Apply an event and commit its effects. Does not broadcast.
    fn run(&mut self, event: Event, origin: UpdateOrigin) -> Vec<SessionChange> {
        let before = (self.state.cursor(), self.state.highlight());

        self.metrics.record_event();
        let effects = self.state.apply(event);

        let mut changes = Vec::new();

        let cursor = self.state.cursor();
        let highlight = self.state.highlight();
        if before != (cursor, highlight) {
            changes.push(SessionChange::FocusChanged {
                row: cursor.row,
                col: cursor.col,
                direction: cursor.direction,
                highlight,
            });
        }

        changes.extend(self.commit(effects, origin));
        changes
    }

    fn commit(&mut self, effects: Vec<Effect>, origin: UpdateOrigin) -> Vec<SessionChange> {
        let mut guesses_changed = false;
        let mut cleared = false;
        let mut notifications = Vec::new();

        for effect in effects {
            match effect {
                Effect::GuessChanged { .. } | Effect::GuessesReplaced => {
                    guesses_changed = true;
                    self.metrics.record_guess_written();
                }
                Effect::Solved(entry) => {
                    self.metrics.record_entry_solved();
                    notifications.push(SessionChange::Solved(entry));
                }
                Effect::LoadedCorrect(entries) => {
                    notifications.push(SessionChange::LoadedCorrect(entries));
                }
                Effect::ClearPersisted => cleared = true,
            }
        }

        let mut changes = Vec::new();

        if cleared {
            self.clear_store();
        }

        if guesses_changed {
            if let Some(update) = self.persist(origin, cleared) {
                changes.push(update);
            }
        }

        changes.extend(notifications);
        changes
    }

    fn persist(&mut self, origin: UpdateOrigin, cleared: bool) -> Option<SessionChange> {
        match origin {
            UpdateOrigin::Load => None,
            UpdateOrigin::Local if self.options.share_updates => {
                Some(SessionChange::LetterUpdate(self.state.snapshot()))
            }
            UpdateOrigin::Local if cleared => None,
            UpdateOrigin::Local | UpdateOrigin::Remote => {
                self.write_store();
                None
            }
        }
    }

    fn write_store(&mut self) {
        let blob = match self.state.snapshot().to_blob() {
            Ok(blob) => blob,
            Err(e) => {
                tracing::warn!("Could not encode guesses: {}", e);
                self.metrics.record_persistence_error();
                return;
            }
        };

        match self.store.write(&blob) {
            Ok(()) => self.metrics.record_snapshot_persisted(),
            Err(e) => {
                tracing::warn!("Could not save guesses: {}", e);
                self.metrics.record_persistence_error();
            }
        }
    }

    fn clear_store(&mut self) {
        if let Err(e) = self.store.clear() {
            tracing::warn!("Could not discard saved guesses: {}", e);
            self.metrics.record_persistence_error();
        }
    }

    fn publish(&self, changes: &[SessionChange]) {
        for change in changes {
            // No subscribers is fine; the caller still gets the changes back.
            match self.changes_tx.send(change.clone()) {
                Ok(_) => self.metrics.record_broadcast(),
                Err(_) => self.metrics.record_broadcast_error(),
            }
        }
    }
}
