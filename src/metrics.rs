// Session metrics
//
// Lightweight counters for one crossword session, logged on shutdown.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Counters collected by [`crate::services::CrosswordSession`].
///
/// Uses relaxed atomics so a listener thread can read them while the host
/// keeps dispatching events.
#[derive(Debug)]
pub struct Metrics {
    /// Events passed to the state machine
    pub events_applied: AtomicU64,

    /// Guess writes that changed at least one cell
    pub guesses_written: AtomicU64,

    /// Entries reported solved while typing
    pub entries_solved: AtomicU64,

    /// Snapshots written to the guess store
    pub snapshots_persisted: AtomicU64,

    /// Guess store reads, writes or clears that failed
    pub persistence_errors: AtomicU64,

    /// Remote guess updates that changed the grid
    pub remote_updates: AtomicU64,

    /// Notifications broadcast to subscribers
    pub broadcasts: AtomicU64,

    /// Broadcasts with no live subscriber
    pub broadcast_errors: AtomicU64,

    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            events_applied: AtomicU64::new(0),
            guesses_written: AtomicU64::new(0),
            entries_solved: AtomicU64::new(0),
            snapshots_persisted: AtomicU64::new(0),
            persistence_errors: AtomicU64::new(0),
            remote_updates: AtomicU64::new(0),
            broadcasts: AtomicU64::new(0),
            broadcast_errors: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_event(&self) {
        self.events_applied.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_guess_written(&self) {
        self.guesses_written.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_entry_solved(&self) {
        self.entries_solved.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_snapshot_persisted(&self) {
        self.snapshots_persisted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_persistence_error(&self) {
        self.persistence_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_remote_update(&self) {
        self.remote_updates.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_broadcast(&self) {
        self.broadcasts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_broadcast_error(&self) {
        self.broadcast_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn log_summary(&self) {
        tracing::info!("=== Session Metrics Summary ===");
        tracing::info!("Uptime: {:.2}s", self.uptime().as_secs_f64());
        tracing::info!(
            "Events: {}, guesses written: {}, entries solved: {}",
            self.events_applied.load(Ordering::Relaxed),
            self.guesses_written.load(Ordering::Relaxed),
            self.entries_solved.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Snapshots persisted: {}, persistence errors: {}, remote updates: {}",
            self.snapshots_persisted.load(Ordering::Relaxed),
            self.persistence_errors.load(Ordering::Relaxed),
            self.remote_updates.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Broadcasts: {}, without subscribers: {}",
            self.broadcasts.load(Ordering::Relaxed),
            self.broadcast_errors.load(Ordering::Relaxed)
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new();
        assert_eq!(metrics.events_applied.load(Ordering::Relaxed), 0);
        assert_eq!(metrics.persistence_errors.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_counters() {
        let metrics = Metrics::new();

        metrics.record_event();
        metrics.record_event();
        metrics.record_guess_written();
        metrics.record_entry_solved();
        metrics.record_snapshot_persisted();
        metrics.record_persistence_error();
        metrics.record_remote_update();
        metrics.record_broadcast();
        metrics.record_broadcast_error();

        assert_eq!(metrics.events_applied.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.guesses_written.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.entries_solved.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.snapshots_persisted.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.persistence_errors.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.remote_updates.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.broadcasts.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.broadcast_errors.load(Ordering::Relaxed), 1);
    }
}
