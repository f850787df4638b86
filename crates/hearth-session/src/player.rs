//! Player types.

use hearth_rooms::RoomKey;
use hearth_transport::ConnectionId;

/// Where a player is in their lifecycle.
///
/// ```text
///   Naming ──(first line received)──→ Active { name, room }
/// ```
///
/// There is no way back to `Naming` and no terminal state: an `Active`
/// player stays active until the connection goes away and the entry is
/// removed from the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerState {
    /// Connected, prompted for a name, nothing typed yet. Such players
    /// hear nothing from anyone and appear in no listing.
    Naming,

    /// Named and standing in `room`.
    Active { name: String, room: RoomKey },
}

/// One connected player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: ConnectionId,
    pub state: PlayerState,
}

impl Player {
    /// A freshly connected, unnamed player.
    pub fn new(id: ConnectionId) -> Self {
        Self {
            id,
            state: PlayerState::Naming,
        }
    }

    /// The display name, once chosen.
    pub fn name(&self) -> Option<&str> {
        match &self.state {
            PlayerState::Active { name, .. } => Some(name),
            PlayerState::Naming => None,
        }
    }

    /// The current room, once placed.
    pub fn room(&self) -> Option<&RoomKey> {
        match &self.state {
            PlayerState::Active { room, .. } => Some(room),
            PlayerState::Naming => None,
        }
    }

    /// Returns `true` once the player has a name and a room.
    pub fn is_active(&self) -> bool {
        matches!(self.state, PlayerState::Active { .. })
    }
}
