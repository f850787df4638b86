//! The hub: where front-end connection tasks meet the tick loop.
//!
//! Front-ends run concurrently on the Tokio runtime. The world loop runs
//! on its own schedule and wants discrete batches. The hub sits between
//! them: tasks push [`HubEvent`]s into an unbounded channel whenever
//! they like, and [`Transport::tick`] drains that channel into three
//! queues the world then polls.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use hearth_protocol::Command;
use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::{ConnectionId, MemoryClient, Outbox, Transport, TransportError};

/// Counter for generating unique connection IDs.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Per-connection outbound queue. Unbounded so `send` never waits.
pub(crate) type OutboundSender = mpsc::UnboundedSender<String>;
pub(crate) type OutboundReceiver = mpsc::UnboundedReceiver<String>;

/// Something a connection task reports to the hub.
#[derive(Debug)]
pub(crate) enum HubEvent {
    Connected {
        id: ConnectionId,
        outbound: OutboundSender,
    },
    Line {
        id: ConnectionId,
        line: String,
    },
    Closed {
        id: ConnectionId,
    },
}

/// Cloneable handle that front-ends use to open connections on a [`Hub`].
#[derive(Debug, Clone)]
pub struct HubHandle {
    events: mpsc::UnboundedSender<HubEvent>,
}

impl HubHandle {
    /// Registers a new connection with the hub.
    ///
    /// Returns the connection's [`Link`] (used to report lines, and which
    /// reports the close when dropped) and the receiving end of its
    /// outbound queue.
    ///
    /// # Errors
    /// [`TransportError::Shutdown`] if the hub has been dropped.
    pub(crate) fn open(
        &self,
    ) -> Result<(Link, OutboundReceiver), TransportError> {
        let id = ConnectionId::new(
            NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed),
        );
        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        self.events
            .send(HubEvent::Connected { id, outbound })
            .map_err(|_| TransportError::Shutdown)?;
        Ok((
            Link {
                id,
                events: self.events.clone(),
            },
            outbound_rx,
        ))
    }

    /// Opens an in-process connection.
    ///
    /// # Errors
    /// [`TransportError::Shutdown`] if the hub has been dropped.
    pub fn connect_memory(&self) -> Result<MemoryClient, TransportError> {
        let (link, inbox) = self.open()?;
        Ok(MemoryClient::new(link, inbox))
    }

    /// Returns `true` once the hub has been dropped.
    pub fn is_closed(&self) -> bool {
        self.events.is_closed()
    }
}

/// One open connection's line back to the hub.
///
/// Dropping the link reports the close. Every exit path out of a
/// connection task (clean EOF, I/O error, framing error, panic) therefore
/// produces exactly one disconnect event.
#[derive(Debug)]
pub(crate) struct Link {
    id: ConnectionId,
    events: mpsc::UnboundedSender<HubEvent>,
}

impl Link {
    pub(crate) fn id(&self) -> ConnectionId {
        self.id
    }

    /// Reports one inbound line. Returns `false` if the hub is gone.
    pub(crate) fn deliver(&self, line: String) -> bool {
        self.events
            .send(HubEvent::Line { id: self.id, line })
            .is_ok()
    }
}

impl Drop for Link {
    fn drop(&mut self) {
        let _ = self.events.send(HubEvent::Closed { id: self.id });
    }
}

/// The concrete [`Transport`]: collects events from every front-end
/// sharing its [`HubHandle`] and hands them to the world in batches.
///
/// Not thread-safe by itself; it is owned by the world loop. Front-ends
/// only ever hold handles.
pub struct Hub {
    events_rx: mpsc::UnboundedReceiver<HubEvent>,
    handle: HubHandle,
    /// Outbound queues of connections the hub has seen open and not close.
    outboxes: HashMap<ConnectionId, OutboundSender>,
    new_connections: Vec<ConnectionId>,
    disconnections: Vec<ConnectionId>,
    commands: Vec<(ConnectionId, Command)>,
}

impl Hub {
    /// Creates an empty hub.
    pub fn new() -> Self {
        let (events, events_rx) = mpsc::unbounded_channel();
        Self {
            events_rx,
            handle: HubHandle { events },
            outboxes: HashMap::new(),
            new_connections: Vec::new(),
            disconnections: Vec::new(),
            commands: Vec::new(),
        }
    }

    /// Returns a handle front-ends can use to open connections.
    pub fn handle(&self) -> HubHandle {
        self.handle.clone()
    }

    /// Number of connections currently open, as of the last tick.
    pub fn connection_count(&self) -> usize {
        self.outboxes.len()
    }

    fn apply(&mut self, event: HubEvent) {
        match event {
            HubEvent::Connected { id, outbound } => {
                debug!(conn_id = %id, "connection opened");
                self.outboxes.insert(id, outbound);
                self.new_connections.push(id);
            }
            HubEvent::Line { id, line } => {
                trace!(conn_id = %id, %line, "line received");
                self.commands.push((id, Command::parse(&line)));
            }
            HubEvent::Closed { id } => {
                debug!(conn_id = %id, "connection closed");
                self.outboxes.remove(&id);
                self.disconnections.push(id);
            }
        }
    }
}

impl Default for Hub {
    fn default() -> Self {
        Self::new()
    }
}

impl Outbox for Hub {
    fn send(&self, id: ConnectionId, text: &str) {
        match self.outboxes.get(&id) {
            Some(tx) => {
                if tx.send(text.to_string()).is_err() {
                    trace!(conn_id = %id, "send to finished connection dropped");
                }
            }
            None => trace!(conn_id = %id, "send to unknown connection dropped"),
        }
    }
}

impl Transport for Hub {
    fn tick(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply(event);
        }
    }

    fn poll_new_connections(&mut self) -> Vec<ConnectionId> {
        std::mem::take(&mut self.new_connections)
    }

    fn poll_disconnections(&mut self) -> Vec<ConnectionId> {
        std::mem::take(&mut self.disconnections)
    }

    fn poll_commands(&mut self) -> Vec<(ConnectionId, Command)> {
        std::mem::take(&mut self.commands)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_collects_new_connection() {
        let mut hub = Hub::new();
        let client = hub.handle().connect_memory().unwrap();

        // Nothing is visible until the hub ticks.
        assert!(hub.poll_new_connections().is_empty());

        hub.tick();
        assert_eq!(hub.poll_new_connections(), vec![client.id()]);
        assert_eq!(hub.connection_count(), 1);

        // Polls drain: a second poll is empty.
        assert!(hub.poll_new_connections().is_empty());
    }

    #[test]
    fn test_connection_ids_are_unique() {
        let hub = Hub::new();
        let a = hub.handle().connect_memory().unwrap();
        let b = hub.handle().connect_memory().unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_lines_become_parsed_commands_in_order() {
        let mut hub = Hub::new();
        let client = hub.handle().connect_memory().unwrap();
        client.send_line("say hi").unwrap();
        client.send_line("go north").unwrap();

        hub.tick();
        let cmds = hub.poll_commands();
        assert_eq!(cmds.len(), 2);
        assert_eq!(cmds[0].0, client.id());
        assert_eq!(cmds[0].1.word, "say");
        assert_eq!(cmds[0].1.params, "hi");
        assert_eq!(cmds[1].1.word, "go");
    }

    #[test]
    fn test_drop_reports_disconnect_once() {
        let mut hub = Hub::new();
        let client = hub.handle().connect_memory().unwrap();
        let id = client.id();
        drop(client);

        hub.tick();
        assert_eq!(hub.poll_new_connections(), vec![id]);
        assert_eq!(hub.poll_disconnections(), vec![id]);
        assert_eq!(hub.connection_count(), 0);

        hub.tick();
        assert!(hub.poll_disconnections().is_empty());
    }

    #[test]
    fn test_send_reaches_client() {
        let mut hub = Hub::new();
        let mut client = hub.handle().connect_memory().unwrap();
        hub.tick();

        hub.send(client.id(), "What is your name?");
        assert_eq!(client.drain(), vec!["What is your name?".to_string()]);
    }

    #[test]
    fn test_send_to_unknown_or_closed_connection_is_silent() {
        let mut hub = Hub::new();
        hub.send(ConnectionId::new(u64::MAX), "nobody home");

        let client = hub.handle().connect_memory().unwrap();
        let id = client.id();
        hub.tick();
        drop(client);
        // The hub hasn't seen the close yet; the send still must not fail.
        hub.send(id, "late");
        hub.tick();
        hub.send(id, "later");
    }

    #[test]
    fn test_events_after_tick_wait_for_next_tick() {
        let mut hub = Hub::new();
        let client = hub.handle().connect_memory().unwrap();
        hub.tick();
        client.send_line("look").unwrap();

        // Arrived after the tick: not polled yet.
        assert!(hub.poll_commands().is_empty());
        hub.tick();
        assert_eq!(hub.poll_commands().len(), 1);
    }
}
