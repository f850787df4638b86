//! Integration tests for the TCP front-end.
//!
//! These spin up a real listener on a random port and talk to it with a
//! plain `TcpStream`, checking that bytes on the socket turn into hub
//! events and that hub sends turn into bytes on the socket.

use std::time::Duration;

use hearth_transport::{Hub, Outbox, Transport, tcp};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// Ticks the hub until `ready` says so, or panics after ~2 seconds.
async fn tick_until(hub: &mut Hub, mut ready: impl FnMut(&mut Hub) -> bool) {
    for _ in 0..200 {
        hub.tick();
        if ready(hub) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached in time");
}

async fn start() -> (Hub, String) {
    let hub = Hub::new();
    let listener = tcp::bind("127.0.0.1:0").await.expect("should bind");
    let addr = listener.local_addr().unwrap().to_string();
    tcp::serve(listener, hub.handle());
    (hub, addr)
}

#[tokio::test]
async fn test_tcp_connect_send_and_receive() {
    let (mut hub, addr) = start().await;
    let mut client = TcpStream::connect(&addr).await.expect("connect");

    let mut ids = Vec::new();
    tick_until(&mut hub, |h| {
        ids.extend(h.poll_new_connections());
        !ids.is_empty()
    })
    .await;
    let id = ids[0];

    // --- Client sends, hub sees a parsed command ---
    client.write_all(b"say hello there\r\n").await.unwrap();
    let mut cmds = Vec::new();
    tick_until(&mut hub, |h| {
        cmds.extend(h.poll_commands());
        !cmds.is_empty()
    })
    .await;
    assert_eq!(cmds[0].0, id);
    assert_eq!(cmds[0].1.word, "say");
    assert_eq!(cmds[0].1.params, "hello there");

    // --- Hub sends, client receives CRLF-terminated text ---
    hub.send(id, "Tavern\nA cozy place.");
    let mut got = Vec::new();
    let mut buf = [0u8; 256];
    while !got.ends_with(b"place.\r\n") {
        let n = tokio::time::timeout(Duration::from_secs(2), client.read(&mut buf))
            .await
            .expect("read timed out")
            .unwrap();
        assert!(n > 0, "server closed early");
        got.extend_from_slice(&buf[..n]);
    }
    assert_eq!(got, b"Tavern\r\nA cozy place.\r\n");
}

#[tokio::test]
async fn test_tcp_split_writes_frame_into_one_line() {
    let (mut hub, addr) = start().await;
    let mut client = TcpStream::connect(&addr).await.unwrap();

    client.write_all(b"go no").await.unwrap();
    client.flush().await.unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;
    client.write_all(b"rth\n").await.unwrap();

    let mut cmds = Vec::new();
    tick_until(&mut hub, |h| {
        cmds.extend(h.poll_commands());
        !cmds.is_empty()
    })
    .await;
    assert_eq!(cmds.len(), 1);
    assert_eq!(cmds[0].1.line, "go north");
}

#[tokio::test]
async fn test_tcp_client_close_reports_disconnect() {
    let (mut hub, addr) = start().await;
    let client = TcpStream::connect(&addr).await.unwrap();

    let mut ids = Vec::new();
    tick_until(&mut hub, |h| {
        ids.extend(h.poll_new_connections());
        !ids.is_empty()
    })
    .await;

    drop(client);

    let mut gone = Vec::new();
    tick_until(&mut hub, |h| {
        gone.extend(h.poll_disconnections());
        !gone.is_empty()
    })
    .await;
    assert_eq!(gone, ids);
    assert_eq!(hub.connection_count(), 0);
}

#[tokio::test]
async fn test_tcp_overlong_line_closes_connection() {
    let (mut hub, addr) = start().await;
    let mut client = TcpStream::connect(&addr).await.unwrap();

    let junk = vec![b'x'; 4096];
    client.write_all(&junk).await.unwrap();

    let mut gone = Vec::new();
    tick_until(&mut hub, |h| {
        gone.extend(h.poll_disconnections());
        !gone.is_empty()
    })
    .await;
    assert!(hub.poll_commands().is_empty(), "no partial line should leak");
}
