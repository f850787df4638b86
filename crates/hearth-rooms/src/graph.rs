//! The validated room graph.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;

use crate::{Room, RoomKey, WorldError};

/// On-disk shape of one room. The key lives in the enclosing map.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RoomDef {
    name: String,
    description: String,
    #[serde(default)]
    exits: BTreeMap<String, RoomKey>,
}

/// The top-level room object as written: every entry in file order,
/// repeated keys included, so they reach the duplicate check.
struct RoomFile(Vec<(RoomKey, RoomDef)>);

impl<'de> Deserialize<'de> for RoomFile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = RoomFile;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of room keys to rooms")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<RoomFile, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<RoomKey, RoomDef>()? {
                    entries.push(entry);
                }
                Ok(RoomFile(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// Every room in the world, keyed by [`RoomKey`].
///
/// Immutable once built. All constructors validate the graph; see the
/// crate docs for the invariant they establish.
#[derive(Debug, Clone)]
pub struct RoomGraph {
    rooms: HashMap<RoomKey, Room>,
}

impl RoomGraph {
    /// Loads and validates a room file.
    ///
    /// The file is a JSON object mapping room keys to rooms:
    ///
    /// ```json
    /// {
    ///   "tavern": {
    ///     "name": "Tavern",
    ///     "description": "You're in a cozy tavern warmed by an open fire.",
    ///     "exits": { "outside": "outside" }
    ///   },
    ///   "outside": {
    ///     "name": "Outside the tavern",
    ///     "description": "You're standing outside a tavern. It's raining.",
    ///     "exits": { "inside": "tavern" }
    ///   }
    /// }
    /// ```
    ///
    /// # Errors
    /// Any configuration error variant of [`WorldError`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, WorldError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| {
            WorldError::Io {
                path: path.to_path_buf(),
                source,
            }
        })?;
        let graph = Self::from_json_str(&text)?;
        tracing::info!(
            path = %path.display(),
            rooms = graph.len(),
            "room graph loaded"
        );
        Ok(graph)
    }

    /// Parses and validates room JSON (same format as [`load`](Self::load)).
    /// A room key that appears twice is [`WorldError::DuplicateRoom`].
    pub fn from_json_str(text: &str) -> Result<Self, WorldError> {
        let RoomFile(defs) = serde_json::from_str(text)?;
        Self::from_rooms(defs.into_iter().map(|(key, def)| Room {
            key,
            name: def.name,
            description: def.description,
            exits: def.exits,
        }))
    }

    /// Builds a graph from rooms constructed in code.
    ///
    /// # Errors
    /// [`WorldError::DuplicateRoom`], [`WorldError::Empty`],
    /// [`WorldError::InvalidExitName`] or [`WorldError::DanglingExit`].
    pub fn from_rooms(
        rooms: impl IntoIterator<Item = Room>,
    ) -> Result<Self, WorldError> {
        let mut map = HashMap::new();
        for room in rooms {
            if map.contains_key(&room.key) {
                return Err(WorldError::DuplicateRoom(room.key));
            }
            map.insert(room.key.clone(), room);
        }

        let graph = Self { rooms: map };
        graph.validate()?;
        Ok(graph)
    }

    fn validate(&self) -> Result<(), WorldError> {
        if self.rooms.is_empty() {
            return Err(WorldError::Empty);
        }
        for room in self.rooms.values() {
            for (exit, target) in &room.exits {
                if !is_valid_exit_name(exit) {
                    return Err(WorldError::InvalidExitName {
                        room: room.key.clone(),
                        exit: exit.clone(),
                    });
                }
                if !self.rooms.contains_key(target) {
                    return Err(WorldError::DanglingExit {
                        room: room.key.clone(),
                        exit: exit.clone(),
                        target: target.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Looks up a room by key.
    ///
    /// # Errors
    /// [`WorldError::NotFound`] if no room has this key. Never happens for
    /// keys taken from an exit of this graph.
    pub fn lookup(&self, key: &RoomKey) -> Result<&Room, WorldError> {
        self.rooms
            .get(key)
            .ok_or_else(|| WorldError::NotFound(key.clone()))
    }

    /// Returns `true` if the graph has a room with this key.
    pub fn contains(&self, key: &RoomKey) -> bool {
        self.rooms.contains_key(key)
    }

    /// Iterates over all rooms in no particular order.
    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }

    /// Number of rooms. Always at least one.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Always `false`: an empty graph fails validation.
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

fn is_valid_exit_name(exit: &str) -> bool {
    !exit.is_empty() && exit.trim() == exit && exit.to_lowercase() == exit
}
