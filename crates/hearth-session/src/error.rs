//! Error types for the session layer.

use hearth_transport::ConnectionId;

/// Errors from player registry operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The transport reported the same connection as new twice.
    /// That breaks the transport contract and is treated as fatal.
    #[error("connection {0} is already registered")]
    AlreadyRegistered(ConnectionId),

    /// No player entry exists for this connection.
    #[error("no player registered for connection {0}")]
    NotFound(ConnectionId),

    /// The operation needs a named player, but this one is still
    /// choosing a name.
    #[error("player on connection {0} has not chosen a name yet")]
    NotActive(ConnectionId),

    /// The player already has a name; the naming step happens once.
    #[error("player on connection {0} is already named")]
    AlreadyActive(ConnectionId),
}
