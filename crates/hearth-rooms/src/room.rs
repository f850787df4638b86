//! Room data.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Key of a room in the [`RoomGraph`](crate::RoomGraph), e.g. `"tavern"`.
///
/// Serialized as a bare string.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RoomKey(String);

impl RoomKey {
    /// Creates a key from anything string-like.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

/// A single room.
///
/// Exits map a lowercase exit name to the key of the room it leads to.
/// They are kept sorted so listings come out in a stable order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub key: RoomKey,
    pub name: String,
    pub description: String,
    pub exits: BTreeMap<String, RoomKey>,
}

impl Room {
    /// Creates a room with no exits.
    pub fn new(
        key: impl Into<RoomKey>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            description: description.into(),
            exits: BTreeMap::new(),
        }
    }

    /// Adds an exit. Chainable.
    pub fn with_exit(
        mut self,
        exit: impl Into<String>,
        target: impl Into<RoomKey>,
    ) -> Self {
        self.exits.insert(exit.into(), target.into());
        self
    }

    /// Where `exit` leads, if this room has it. Exact match: callers
    /// lowercase player input first.
    pub fn exit(&self, exit: &str) -> Option<&RoomKey> {
        self.exits.get(exit)
    }

    /// Exit names in sorted order.
    pub fn exit_names(&self) -> impl Iterator<Item = &str> {
        self.exits.keys().map(String::as_str)
    }
}

/// Formats a room for display: the name on the first line, then the
/// description with surrounding whitespace trimmed.
pub fn describe(room: &Room) -> String {
    format!("{}\n{}", room.name, room.description.trim())
}
