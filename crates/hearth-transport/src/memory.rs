//! In-process connections.
//!
//! A [`MemoryClient`] behaves like a network client without the network:
//! lines go straight into the hub's event channel and outbound text
//! lands in a local queue. The engine tests drive whole game sessions
//! this way, and an embedding application can use it for bots or a
//! local console.

use tokio::sync::mpsc::error::TryRecvError;

use crate::hub::{Link, OutboundReceiver};
use crate::{ConnectionId, TransportError};

/// An in-process connection to a [`Hub`](crate::Hub).
///
/// Dropping the client (or calling [`close`](Self::close)) reports the
/// disconnect to the hub.
#[derive(Debug)]
pub struct MemoryClient {
    id: ConnectionId,
    link: Option<Link>,
    inbox: OutboundReceiver,
}

impl MemoryClient {
    pub(crate) fn new(link: Link, inbox: OutboundReceiver) -> Self {
        Self {
            id: link.id(),
            link: Some(link),
            inbox,
        }
    }

    /// The id the hub assigned to this connection.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Sends one line, as if the user typed it and pressed enter.
    ///
    /// # Errors
    /// [`TransportError::Shutdown`] if the client was closed or the hub
    /// has been dropped.
    pub fn send_line(&self, line: &str) -> Result<(), TransportError> {
        let link = self.link.as_ref().ok_or(TransportError::Shutdown)?;
        if link.deliver(line.to_string()) {
            Ok(())
        } else {
            Err(TransportError::Shutdown)
        }
    }

    /// Returns the next queued message without waiting.
    pub fn try_recv(&mut self) -> Option<String> {
        match self.inbox.try_recv() {
            Ok(text) => Some(text),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Returns every message queued so far, oldest first.
    pub fn drain(&mut self) -> Vec<String> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }

    /// Waits for the next message. `None` once the hub has dropped this
    /// connection's queue.
    pub async fn recv(&mut self) -> Option<String> {
        self.inbox.recv().await
    }

    /// Closes the connection. Idempotent.
    pub fn close(&mut self) {
        self.link.take();
    }
}
