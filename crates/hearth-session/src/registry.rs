//! The player registry: one entry per open connection.
//!
//! # Concurrency note
//!
//! `PlayerRegistry` is NOT thread-safe by itself. It is owned by the
//! world loop, which is the only writer. Reads that feed a broadcast
//! borrow the registry immutably, so the borrow checker already
//! guarantees nobody mutates it while a broadcast walks over it.

use std::collections::BTreeMap;

use hearth_rooms::RoomKey;
use hearth_transport::ConnectionId;

use crate::{Player, PlayerState, SessionError};

/// Maps connection ids to players.
///
/// Iteration is in ascending [`ConnectionId`] order, which is also
/// connection order since the transport hands out increasing ids.
#[derive(Debug, Default)]
pub struct PlayerRegistry {
    players: BTreeMap<ConnectionId, Player>,
}

impl PlayerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an unnamed player for a new connection.
    ///
    /// # Errors
    /// [`SessionError::AlreadyRegistered`] if `id` is already present.
    pub fn register(&mut self, id: ConnectionId) -> Result<(), SessionError> {
        if self.players.contains_key(&id) {
            return Err(SessionError::AlreadyRegistered(id));
        }
        self.players.insert(id, Player::new(id));
        tracing::debug!(conn_id = %id, "player registered");
        Ok(())
    }

    /// Removes a player. Unknown ids are a no-op and return `None`, so a
    /// repeated disconnect notification is harmless.
    pub fn unregister(&mut self, id: ConnectionId) -> Option<Player> {
        let removed = self.players.remove(&id);
        if removed.is_some() {
            tracing::debug!(conn_id = %id, "player unregistered");
        }
        removed
    }

    /// Looks up a player.
    ///
    /// # Errors
    /// [`SessionError::NotFound`] if `id` isn't registered.
    pub fn get(&self, id: ConnectionId) -> Result<&Player, SessionError> {
        self.players.get(&id).ok_or(SessionError::NotFound(id))
    }

    /// Returns `true` if `id` is registered.
    pub fn contains(&self, id: ConnectionId) -> bool {
        self.players.contains_key(&id)
    }

    /// Names a player and places them in `room`: the one-time
    /// Naming → Active transition.
    ///
    /// The name is stored as given. No validation or uniqueness check is
    /// done; two players may share a name.
    ///
    /// # Errors
    /// - [`SessionError::NotFound`] if `id` isn't registered.
    /// - [`SessionError::AlreadyActive`] if the player already has a name.
    pub fn activate(
        &mut self,
        id: ConnectionId,
        name: impl Into<String>,
        room: RoomKey,
    ) -> Result<&Player, SessionError> {
        let player = self
            .players
            .get_mut(&id)
            .ok_or(SessionError::NotFound(id))?;
        if player.is_active() {
            return Err(SessionError::AlreadyActive(id));
        }
        player.state = PlayerState::Active {
            name: name.into(),
            room,
        };
        Ok(player)
    }

    /// Moves an active player to another room.
    ///
    /// The registry doesn't know the room graph; callers pass keys that
    /// came out of it.
    ///
    /// # Errors
    /// - [`SessionError::NotFound`] if `id` isn't registered.
    /// - [`SessionError::NotActive`] if the player hasn't been named.
    pub fn set_room(
        &mut self,
        id: ConnectionId,
        new_room: RoomKey,
    ) -> Result<(), SessionError> {
        let player = self
            .players
            .get_mut(&id)
            .ok_or(SessionError::NotFound(id))?;
        match &mut player.state {
            PlayerState::Active { room, .. } => {
                *room = new_room;
                Ok(())
            }
            PlayerState::Naming => Err(SessionError::NotActive(id)),
        }
    }

    /// All players, named or not.
    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    /// Named players only.
    pub fn active(&self) -> impl Iterator<Item = &Player> {
        self.iter().filter(|p| p.is_active())
    }

    /// Named players currently standing in `room`.
    pub fn named_in_room<'a>(
        &'a self,
        room: &'a RoomKey,
    ) -> impl Iterator<Item = &'a Player> + 'a {
        self.iter().filter(move |p| p.room() == Some(room))
    }

    /// Number of registered players (any state).
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Returns `true` if nobody is connected.
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
