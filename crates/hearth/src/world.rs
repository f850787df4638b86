//! The world: room graph, players, and the rules that connect them.
//!
//! `World` owns all mutable game state and is driven from a single task.
//! It never talks to sockets; every reply or broadcast goes out through
//! the [`Outbox`] passed in by the caller.

use hearth_protocol::Command;
use hearth_rooms::{RoomGraph, RoomKey, WorldError, describe};
use hearth_session::{PlayerRegistry, PlayerState};
use hearth_transport::{ConnectionId, Outbox};

use crate::HearthError;
use crate::broadcast::Broadcaster;
use crate::commands::{CommandContext, CommandTable};

/// Sent to every new connection.
pub const NAME_PROMPT: &str = "What is your name?";

/// All game state for one server.
pub struct World {
    rooms: RoomGraph,
    players: PlayerRegistry,
    start_room: RoomKey,
    commands: CommandTable,
}

impl World {
    /// Creates an empty world with the standard command set.
    ///
    /// # Errors
    /// [`WorldError::UnknownStartRoom`] if `start_room` isn't in `rooms`.
    pub fn new(rooms: RoomGraph, start_room: RoomKey) -> Result<Self, WorldError> {
        if !rooms.contains(&start_room) {
            return Err(WorldError::UnknownStartRoom(start_room));
        }
        Ok(Self {
            rooms,
            players: PlayerRegistry::new(),
            start_room,
            commands: CommandTable::standard(),
        })
    }

    /// Replaces the command table.
    pub fn with_commands(mut self, commands: CommandTable) -> Self {
        self.commands = commands;
        self
    }

    pub fn rooms(&self) -> &RoomGraph {
        &self.rooms
    }

    pub fn players(&self) -> &PlayerRegistry {
        &self.players
    }

    pub fn start_room(&self) -> &RoomKey {
        &self.start_room
    }

    /// Registers a new connection and asks for a name.
    ///
    /// # Errors
    /// [`SessionError::AlreadyRegistered`](hearth_session::SessionError)
    /// if the transport reported `id` twice.
    pub fn connect(
        &mut self,
        id: ConnectionId,
        out: &dyn Outbox,
    ) -> Result<(), HearthError> {
        self.players.register(id)?;
        out.send(id, NAME_PROMPT);
        tracing::debug!(conn_id = %id, "connection joined, awaiting name");
        Ok(())
    }

    /// Removes a connection's player. Named players are announced to
    /// everyone else; unnamed ones leave silently.
    ///
    /// Returns `false` if `id` wasn't registered.
    pub fn disconnect(&mut self, id: ConnectionId, out: &dyn Outbox) -> bool {
        let Ok(player) = self.players.get(id) else {
            tracing::trace!(conn_id = %id, "disconnect for unknown connection");
            return false;
        };

        if let Some(name) = player.name() {
            Broadcaster::new(&self.players, out)
                .all(&format!("{name} quit the game"), &[id]);
            tracing::info!(conn_id = %id, name, "player quit");
        } else {
            tracing::debug!(conn_id = %id, "unnamed connection left");
        }

        self.players.unregister(id);
        true
    }

    /// Handles one line from a connection.
    ///
    /// For an unnamed player the line is their name. For a named player
    /// it is a command. Lines from unknown connections are dropped.
    /// Returns `false` if the line was dropped.
    ///
    /// A failing command is logged and otherwise ignored; it never
    /// affects other players or later commands.
    pub fn handle_command(
        &mut self,
        id: ConnectionId,
        cmd: &Command,
        out: &dyn Outbox,
    ) -> bool {
        let Ok(player) = self.players.get(id) else {
            tracing::trace!(conn_id = %id, "line from unknown connection dropped");
            return false;
        };

        let result = match player.state.clone() {
            PlayerState::Naming => self.enter(id, &cmd.line, out),
            PlayerState::Active { name, room } => {
                let mut ctx = CommandContext {
                    rooms: &self.rooms,
                    players: &mut self.players,
                    out,
                    sender: id,
                    name,
                    room,
                };
                self.commands.dispatch(&mut ctx, cmd)
            }
        };

        if let Err(e) = result {
            tracing::error!(
                conn_id = %id,
                command = %cmd,
                error = %e,
                "command failed"
            );
        }
        true
    }

    /// The naming step: `name` is taken verbatim and the player appears
    /// in the starting room.
    fn enter(
        &mut self,
        id: ConnectionId,
        name: &str,
        out: &dyn Outbox,
    ) -> Result<(), HearthError> {
        self.players.activate(id, name, self.start_room.clone())?;
        let room = self.rooms.lookup(&self.start_room)?;

        let broadcast = Broadcaster::new(&self.players, out);
        broadcast.all(&format!("{name} entered the game"), &[id]);
        broadcast.to(
            id,
            &format!(
                "Welcome to the game, {name}. Type 'help' for a list of \
                 commands. Have fun!"
            ),
        );
        broadcast.to(id, &describe(room));

        tracing::info!(
            conn_id = %id,
            name,
            room = %self.start_room,
            "player entered the game"
        );
        Ok(())
    }
}
