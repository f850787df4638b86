//! WebSocket front-end using `tokio-tungstenite`.
//!
//! For browser clients. Every text (or UTF-8 binary) frame may carry one
//! or more lines; each line becomes a command. Outbound messages go out
//! as one text frame each.

use std::net::SocketAddr;

use futures_util::{SinkExt, StreamExt};
use hearth_protocol::LineFramer;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;

use crate::hub::{Link, OutboundReceiver};
use crate::{HubHandle, TransportError};

/// Binds a TCP listener for WebSocket upgrades.
pub async fn bind(addr: &str) -> Result<TcpListener, TransportError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(TransportError::BindFailed)?;
    if let Ok(local) = listener.local_addr() {
        tracing::info!(addr = %local, "WebSocket front-end listening");
    }
    Ok(listener)
}

/// Spawns the accept loop for `listener`. Ends when the hub is dropped.
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
                    "WebSocket accept failed"
                );
                continue;
            }
        };
        if handle.is_closed() {
            tracing::info!("hub gone, WebSocket front-end stopping");
            return;
        }

        let handle = handle.clone();
        // The upgrade handshake runs in the connection task so a slow
        // client can't stall the accept loop.
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, addr, handle).await {
                tracing::debug!(%addr, error = %e, "WebSocket connection ended with error");
            }
        });
    }
}

async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    handle: HubHandle,
) -> Result<(), TransportError> {
    let ws = tokio_tungstenite::accept_async(stream).await.map_err(|e| {
        TransportError::AcceptFailed(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            e,
        ))
    })?;

    // Only register with the hub once the upgrade has succeeded, so a
    // failed handshake never shows up as a player.
    let (link, outbound) = handle.open()?;
    tracing::debug!(conn_id = %link.id(), %addr, "accepted WebSocket connection");
    pump(ws, link, outbound).await
}

async fn pump(
    ws: tokio_tungstenite::WebSocketStream<TcpStream>,
    link: Link,
    mut outbound: OutboundReceiver,
) -> Result<(), TransportError> {
    let (mut sink, mut stream) = ws.split();
    let mut framer = LineFramer::new();

    loop {
        tokio::select! {
            msg = outbound.recv() => {
                let Some(text) = msg else {
                    let _ = sink.close().await;
                    break;
                };
                sink.send(Message::text(text))
                    .await
                    .map_err(|e| {
                        TransportError::SendFailed(std::io::Error::new(
                            std::io::ErrorKind::BrokenPipe,
                            e,
                        ))
                    })?;
            }
            frame = stream.next() => {
                let data: Vec<u8> = match frame {
                    Some(Ok(Message::Text(text))) => text.as_bytes().to_vec(),
                    Some(Ok(Message::Binary(data))) => data.to_vec(),
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => continue, // ping/pong/raw frame
                    Some(Err(e)) => {
                        return Err(TransportError::ReceiveFailed(
                            std::io::Error::new(
                                std::io::ErrorKind::ConnectionReset,
                                e,
                            ),
                        ));
                    }
                };

                // A frame is a complete unit: terminate its last line.
                framer.push(&data);
                if !data.ends_with(b"\n") {
                    framer.push(b"\n");
                }
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
