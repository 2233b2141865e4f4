//! Durability for the board store: load on startup, debounced saves after
//! mutations, unconditional heartbeat saves.
//!
//! The whole document is rewritten on every save — no diffs, no corruption
//! detection, no retry. A write failure is logged at `warn` and swallowed;
//! the next save (debounced or heartbeat) simply tries again from the
//! current in-memory state.
//!
//! [`run`] is spawned once at process start and never returns. It races two
//! signals with `tokio::select!`: the fixed heartbeat interval, and the
//! store's dirty notification. When a mutation arrives, the task enters a
//! quiet-period loop where every further mutation restarts the 1-second
//! wait, so a burst of changes produces exactly one write shortly after the
//! burst ends. The heartbeat stays armed inside that loop too: even a
//! mutation stream that never goes quiet is flushed every interval.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::error::PersistError;
use crate::store::{BoardDocument, BoardStore};

/// Timing knobs for the persistence task.
#[derive(Debug, Clone)]
pub struct PersistConfig {
    /// Quiet period after the last mutation before a debounced save fires.
    pub debounce: Duration,
    /// Interval of the unconditional full-state rewrite.
    pub heartbeat: Duration,
}

impl Default for PersistConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_secs(1),
            heartbeat: Duration::from_secs(10),
        }
    }
}

/// Destination for serialized board documents.
///
/// A trait seam so tests can count writes under a paused clock instead of
/// touching the filesystem.
pub trait SnapshotSink: Send {
    /// Persist one full board document.
    fn persist(&mut self, document: &BoardDocument) -> Result<(), PersistError>;
}

/// Sink that rewrites a single JSON file wholesale.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    /// Create a sink writing to the given path.
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl SnapshotSink for FileSink {
    fn persist(&mut self, document: &BoardDocument) -> Result<(), PersistError> {
        let bytes = serde_json::to_vec_pretty(document)?;
        std::fs::write(&self.path, bytes)?;
        debug!(path = %self.path.display(), "Board state persisted");
        Ok(())
    }
}

/// Load the durability document from disk, tolerantly.
///
/// A missing file, unreadable file, or malformed document all yield the
/// default (empty) board — logged, never fatal. Absent top-level keys fall
/// back to their defaults; unknown keys are ignored.
pub fn load_document(path: &Path) -> BoardDocument {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!(path = %path.display(), "No durability file yet, starting fresh");
            return BoardDocument::default();
        }
        Err(e) => {
            warn!(path = %path.display(), "Failed to read durability file: {e}");
            return BoardDocument::default();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(document) => document,
        Err(e) => {
            warn!(path = %path.display(), "Malformed durability file, starting fresh: {e}");
            BoardDocument::default()
        }
    }
}

/// Run the persistence loop until the process exits.
///
/// Spawn this once with `tokio::spawn`. The heartbeat rewrites the file
/// every [`PersistConfig::heartbeat`] regardless of changes; mutations
/// additionally trigger a debounced save [`PersistConfig::debounce`] after
/// the last change in a burst.
pub async fn run<S: SnapshotSink>(store: Arc<BoardStore>, mut sink: S, config: PersistConfig) {
    let start = Instant::now();
    let mut heartbeat = tokio::time::interval_at(
        start.checked_add(config.heartbeat).unwrap_or(start),
        config.heartbeat,
    );
    heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = heartbeat.tick() => {
                save(&store, &mut sink).await;
            }
            () = store.changed() => {
                // Quiet-period loop: each further mutation restarts the wait.
                // The heartbeat keeps ticking in here, so a sustained stream
                // of sub-debounce mutations still gets written every interval.
                loop {
                    tokio::select! {
                        _ = heartbeat.tick() => {
                            save(&store, &mut sink).await;
                        }
                        () = store.changed() => {}
                        () = tokio::time::sleep(config.debounce) => break,
                    }
                }
                save(&store, &mut sink).await;
            }
        }
    }
}

/// Stamp, serialize, and write the current state, swallowing failures.
async fn save<S: SnapshotSink>(store: &BoardStore, sink: &mut S) {
    let document = store.checkpoint().await;
    if let Err(e) = sink.persist(&document) {
        warn!("Failed to persist board state: {e}");
    }
}
