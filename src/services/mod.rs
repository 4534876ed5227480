//! Services module - the session around the crossword state machine.
//!
//! The state machine in [`crate::state`] is pure. Everything with side
//! effects lives here and is driven by a [`CrosswordSession`]:
//!
//! - [`CrosswordSession`]: applies events, persists or shares guesses, and
//!   broadcasts [`SessionChange`]s once a transition is committed
//! - [`GuessStore`]: persistence seam, with [`FileStore`], [`MemoryStore`]
//!   and [`NoopStore`] backends
//!
//! # Usage Example
//!
//! ```ignore
//! use crossword::services::{CrosswordSession, MemoryStore, SessionOptions};
//!
//! let mut session = CrosswordSession::new(puzzle, Box::new(MemoryStore::new()), SessionOptions::default())?;
//! let mut changes = session.subscribe();
//! session.load();
//!
//! for change in session.dispatch(Event::char('C')) {
//!     println!("{:?}", change);
//! }
//! ```

pub mod session;
pub mod storage;

pub use session::{CrosswordSession, SessionChange, SessionOptions, UpdateOrigin};
pub use storage::{FileStore, GuessStore, MemoryStore, NoopStore, StorageError};
