//! Persisted store for the Guildboard realtime bulletin board.
//!
//! Owns the canonical in-memory collections (quests, markers, categories)
//! and mirrors them to a single JSON file: a debounced save after each
//! burst of mutations plus an unconditional heartbeat save. Mutations are
//! synchronous with respect to memory; durability is fire-and-forget and
//! failures are logged, never surfaced.
//!
//! # Modules
//!
//! - [`store`] — the [`BoardStore`] mutation/read API and the durability
//!   document
//! - [`persist`] — tolerant loading, the file sink, and the debounce +
//!   heartbeat persistence task
//! - [`error`] — durability error types

pub mod error;
pub mod persist;
pub mod store;

// Re-export primary types for convenience.
pub use error::PersistError;
pub use persist::{FileSink, PersistConfig, SnapshotSink, load_document, run as run_persistence};
pub use store::{BoardDocument, BoardStore, default_categories};
