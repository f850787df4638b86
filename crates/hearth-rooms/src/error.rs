//! Error types for the room graph.

use std::path::PathBuf;

use crate::RoomKey;

/// Errors from loading or querying the room graph.
///
/// Everything except [`NotFound`](Self::NotFound) is a configuration
/// error: the server must not start serving with a graph that produced
/// one. See [`is_config_error`](Self::is_config_error).
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// The room file could not be read.
    #[error("failed to read room file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The room file is not valid JSON or doesn't match the room schema.
    #[error("malformed room file: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Two rooms were given the same key.
    #[error("duplicate room {0}")]
    DuplicateRoom(RoomKey),

    /// An exit leads to a room that doesn't exist.
    #[error("room {room} has exit '{exit}' leading to unknown room {target}")]
    DanglingExit {
        room: RoomKey,
        exit: String,
        target: RoomKey,
    },

    /// An exit name is empty, padded, or not lowercase. Players' `go`
    /// arguments are lowercased before matching, so such an exit could
    /// never be used.
    #[error("room {room} has invalid exit name '{exit}'")]
    InvalidExitName { room: RoomKey, exit: String },

    /// The graph has no rooms at all.
    #[error("room graph is empty")]
    Empty,

    /// The configured starting room isn't in the graph.
    #[error("starting room {0} does not exist")]
    UnknownStartRoom(RoomKey),

    /// A lookup for a room that isn't in the graph.
    #[error("room {0} not found")]
    NotFound(RoomKey),
}

impl WorldError {
    /// Returns `true` for errors that mean the configuration is unusable.
    pub fn is_config_error(&self) -> bool {
        !matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_config_error() {
        assert!(WorldError::Empty.is_config_error());
        assert!(
            WorldError::UnknownStartRoom(RoomKey::from("attic")).is_config_error()
        );
        assert!(!WorldError::NotFound(RoomKey::from("attic")).is_config_error());
    }

    #[test]
    fn test_dangling_exit_message_names_everything() {
        let err = WorldError::DanglingExit {
            room: RoomKey::from("tavern"),
            exit: "cellar".into(),
            target: RoomKey::from("cellar"),
        };
        let msg = err.to_string();
        assert!(msg.contains("tavern"));
        assert!(msg.contains("'cellar'"));
    }
}
