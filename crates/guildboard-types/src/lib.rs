//! Shared type definitions for the Guildboard realtime bulletin board.
//!
//! This crate is the single source of truth for the types used across the
//! Guildboard workspace: the entity records the store persists and the
//! gateway broadcasts, and the snapshot/statistics shapes the query surface
//! serves.
//!
//! # Modules
//!
//! - [`ids`] — Type-safe UUID wrappers for entity and session identifiers
//! - [`entities`] — Core entity structs (quests, markers, analytics,
//!   snapshot, statistics)

pub mod entities;
pub mod ids;

// Re-export all public types at crate root for convenience.
pub use entities::{
    AdminStats, Analytics, BoardSnapshot, BoardStats, Marker, Quest, STATUS_OPEN, STATUS_TAKEN,
};
pub use ids::{ConnectionId, MarkerId, QuestId};
