//! Scoped message delivery.
//!
//! A broadcast sends one message to every player matching a scope: all
//! named players, or the named players in one room. Players still
//! choosing a name are never included; they have no context yet.
//!
//! Delivery is fire-and-forget through [`Outbox::send`]. A recipient
//! whose connection just went away simply doesn't get the message; the
//! rest still do, and the sender never hears about it.

use hearth_rooms::RoomKey;
use hearth_session::PlayerRegistry;
use hearth_transport::{ConnectionId, Outbox};

/// Sends messages to players, reading the registry to decide who.
///
/// Holds a shared borrow of the registry, so the set of recipients
/// can't change while a broadcast is in progress.
pub struct Broadcaster<'a> {
    players: &'a PlayerRegistry,
    out: &'a dyn Outbox,
}

impl<'a> Broadcaster<'a> {
    pub fn new(players: &'a PlayerRegistry, out: &'a dyn Outbox) -> Self {
        Self { players, out }
    }

    /// Sends to one connection, named or not.
    pub fn to(&self, id: ConnectionId, msg: &str) {
        self.out.send(id, msg);
    }

    /// Sends to every named player not in `exclude`. Returns the number
    /// of recipients.
    pub fn all(&self, msg: &str, exclude: &[ConnectionId]) -> usize {
        let mut sent = 0;
        for player in self.players.active() {
            if !exclude.contains(&player.id) {
                self.out.send(player.id, msg);
                sent += 1;
            }
        }
        sent
    }

    /// Sends to every named player in `room` not in `exclude`. Returns
    /// the number of recipients.
    pub fn room(
        &self,
        room: &RoomKey,
        msg: &str,
        exclude: &[ConnectionId],
    ) -> usize {
        let mut sent = 0;
        for player in self.players.named_in_room(room) {
            if !exclude.contains(&player.id) {
                self.out.send(player.id, msg);
                sent += 1;
            }
        }
        sent
    }
}
