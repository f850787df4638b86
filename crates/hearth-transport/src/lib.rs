//! Transport layer for Hearth.
//!
//! The world engine never touches sockets. It sees the network through
//! the [`Transport`] trait, which it polls once per tick:
//!
//! ```text
//! tick() → poll_new_connections() → poll_disconnections() → poll_commands()
//! ```
//!
//! and answers through [`Outbox::send`], which only enqueues.
//!
//! The concrete transport is the [`Hub`]. Front-ends run as Tokio tasks,
//! one per connection, and report to the hub through a [`HubHandle`]:
//!
//! - [`tcp`]: line-oriented TCP, what telnet and MUD clients speak
//! - [`websocket`]: WebSocket text frames (feature `websocket`, default)
//! - [`MemoryClient`]: an in-process connection for tests and embedding
//!
//! # Feature Flags
//!
//! - `websocket` (default): WebSocket front-end via `tokio-tungstenite`

mod error;
mod hub;
mod memory;
pub mod tcp;
#[cfg(feature = "websocket")]
pub mod websocket;

pub use error::TransportError;
pub use hub::{Hub, HubHandle};
pub use memory::MemoryClient;

use std::fmt;

use hearth_protocol::Command;

/// Opaque identifier for a connection.
///
/// Assigned by the transport when a connection opens. Unique for the
/// lifetime of the process, so an id is never seen again after its
/// disconnect has been reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Somewhere text can be sent to a connection.
///
/// `send` is best-effort and never fails from the caller's point of view:
/// if the connection is already gone the text is dropped. It must not
/// block, since it is called from inside the world's tick.
pub trait Outbox {
    /// Queues `text` for delivery to `id`.
    fn send(&self, id: ConnectionId, text: &str);
}

/// The network as the world engine sees it: a source of connection events
/// and command lines, polled once per tick.
pub trait Transport: Outbox + Send + 'static {
    /// Lets the transport collect whatever arrived since the last tick.
    ///
    /// Events that arrive after `tick` returns are held for the next one,
    /// so the polls below see a consistent batch.
    fn tick(&mut self);

    /// Connections opened since the last poll, in arrival order.
    fn poll_new_connections(&mut self) -> Vec<ConnectionId>;

    /// Connections closed since the last poll.
    fn poll_disconnections(&mut self) -> Vec<ConnectionId>;

    /// Command lines received since the last poll, in arrival order.
    fn poll_commands(&mut self) -> Vec<(ConnectionId, Command)>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_id_new_and_into_inner() {
        let id = ConnectionId::new(42);
        assert_eq!(id.into_inner(), 42);
    }

    #[test]
    fn test_connection_id_display() {
        let id = ConnectionId::new(7);
        assert_eq!(id.to_string(), "conn-7");
    }

    #[test]
    fn test_connection_id_orders_by_value() {
        let mut ids = vec![ConnectionId::new(3), ConnectionId::new(1)];
        ids.sort();
        assert_eq!(ids, vec![ConnectionId::new(1), ConnectionId::new(3)]);
    }
}
