//! Guess persistence backends.
//!
//! The session only sees the [`GuessStore`] trait. A host without any
//! backend uses [`NoopStore`], which silently drops writes.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;

/// Errors raised by a guess store or while decoding a stored blob.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Guess storage I/O failed at {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid guess snapshot: {0}")]
    InvalidSnapshot(#[from] serde_json::Error),
}

/// Read/write channel for a single serialized guess blob.
#[cfg_attr(test, mockall::automock)]
pub trait GuessStore {
    /// The stored blob, or `None` if nothing was saved yet.
    fn read(&self) -> Result<Option<String>, StorageError>;

    fn write(&mut self, blob: &str) -> Result<(), StorageError>;

    /// Discard the stored blob. Clearing an empty store is not an error.
    fn clear(&mut self) -> Result<(), StorageError>;
}

/// Store that keeps nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStore;

impl GuessStore for NoopStore {
    fn read(&self) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    fn write(&mut self, _blob: &str) -> Result<(), StorageError> {
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        Ok(())
    }
}

/// In-memory store. Clones share the same slot, so a host can keep a handle
/// after boxing one into a session.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(blob.into()))),
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl GuessStore for MemoryStore {
    fn read(&self) -> Result<Option<String>, StorageError> {
        Ok(self.contents())
    }

    fn write(&mut self, blob: &str) -> Result<(), StorageError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(blob.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// One JSON file per storage key: `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: Utf8PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Utf8Path>>(dir: P, storage_key: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", storage_key)),
        }
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl GuessStore for FileStore {
    fn read(&self) -> Result<Option<String>, StorageError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let blob = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        tracing::debug!("Read {} bytes of guesses from {}", blob.len(), self.path);
        Ok(Some(blob))
    }

    fn write(&mut self, blob: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        fs::write(&self.path, blob).map_err(|e| self.io_error(e))?;
        tracing::debug!("Saved guesses to {}", self.path);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| self.io_error(e))?;
            tracing::debug!("Removed saved guesses at {}", self.path);
        }
        Ok(())
    }
}
