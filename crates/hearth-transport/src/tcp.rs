//! Line-oriented TCP front-end.
//!
//! Each accepted socket gets its own task that frames inbound bytes into
//! lines with [`LineFramer`] and writes outbound text as `\r\n`-terminated
//! lines, which is what telnet and MUD clients expect.

use std::net::SocketAddr;

use hearth_protocol::LineFramer;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use crate::hub::{Link, OutboundReceiver};
use crate::{HubHandle, TransportError};

/// Binds a TCP listener.
pub async fn bind(addr: &str) -> Result<TcpListener, TransportError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(TransportError::BindFailed)?;
    if let Ok(local) = listener.local_addr() {
        tracing::info!(addr = %local, "TCP front-end listening");
    }
    Ok(listener)
}

/// Spawns the accept loop for `listener`, feeding connections to the hub
/// behind `handle`.
///
/// The loop ends when the hub is dropped.
pub fn serve(listener: TcpListener, handle: HubHandle) -> JoinHandle<()> {
    tokio::spawn(accept_loop(listener, handle))
}

async fn accept_loop(listener: TcpListener, handle: HubHandle) {
    loop {
        let (stream, addr) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                tracing::error!(
                    error = %TransportError::AcceptFailed(e),
                    "TCP accept failed"
                );
                continue;
            }
        };

        let Ok((link, outbound)) = handle.open() else {
            tracing::info!("hub gone, TCP front-end stopping");
            return;
        };
        tracing::debug!(conn_id = %link.id(), %addr, "accepted TCP connection");

        tokio::spawn(async move {
            let conn_id = link.id();
            if let Err(e) = handle_connection(stream, addr, link, outbound).await {
                tracing::debug!(%conn_id, error = %e, "TCP connection ended with error");
            }
        });
    }
}

/// Pumps one socket until either side goes away. The link drops on
/// return, which reports the disconnect.
async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    link: Link,
    mut outbound: OutboundReceiver,
) -> Result<(), TransportError> {
    let (mut reader, mut writer) = stream.into_split();
    let mut framer = LineFramer::new();
    let mut buf = [0u8; 1024];

    loop {
        tokio::select! {
            msg = outbound.recv() => {
                let Some(text) = msg else {
                    // Hub dropped our queue: the server is going away.
                    break;
                };
                writer
                    .write_all(&to_wire(&text))
                    .await
                    .map_err(TransportError::SendFailed)?;
            }
            read = reader.read(&mut buf) => {
                let n = read.map_err(TransportError::ReceiveFailed)?;
                if n == 0 {
                    tracing::debug!(conn_id = %link.id(), %addr, "peer closed");
                    break;
                }
                framer.push(&buf[..n]);
                while let Some(line) = framer.next_line()? {
                    if !link.deliver(line) {
                        return Err(TransportError::Shutdown);
                    }
                }
            }
        }
    }

    Ok(())
}

/// Converts outbound text to telnet line endings.
fn to_wire(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() + 2);
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.extend_from_slice(b"\r\n");
        }
        out.extend_from_slice(line.trim_end_matches('\r').as_bytes());
    }
    out.extend_from_slice(b"\r\n");
    out
}
