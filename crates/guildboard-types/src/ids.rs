//! Type-safe identifier wrappers around [`Uuid`].
//!
//! Every record on the board has a strongly-typed ID to prevent accidental
//! mixing of identifiers at compile time. All IDs use UUID v7
//! (time-ordered plus random tail), which matches the board's id contract:
//! opaque, unique, stable, and practically collision-free.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a quest (task listing).
    QuestId
}

define_id! {
    /// Unique identifier for a map marker (geotagged note).
    MarkerId
}

define_id! {
    /// Unique identifier for a live gateway session.
    ///
    /// Connection ids are ephemeral: they exist only for the lifetime of a
    /// single `WebSocket` connection and are never persisted.
    ConnectionId
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn ids_are_unique() {
        let a = QuestId::new();
        let b = QuestId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn id_round_trips_through_json() {
        let id = MarkerId::new();
        let json = serde_json::to_string(&id).unwrap();
        let back: MarkerId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }

    #[test]
    fn display_matches_inner_uuid() {
        let id = ConnectionId::new();
        assert_eq!(id.to_string(), id.into_inner().to_string());
    }
}
