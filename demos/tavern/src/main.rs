use hearth::prelude::*;
use tracing_subscriber::EnvFilter;

/// Rooms shipped with the demo.
const ROOMS_FILE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/rooms.json");

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let server = HearthServer::builder()
        .rooms_file(ROOMS_FILE)
        .tcp("0.0.0.0:4000")
        .websocket("0.0.0.0:4001")
        .build()
        .await?;

    if let Some(addr) = server.tcp_addr() {
        tracing::info!(%addr, "telnet to this address to play");
    }

    let totals = server
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
            }
        })
        .await?;

    tracing::info!(
        connections = totals.connected,
        commands = totals.commands,
        "server stopped"
    );
    Ok(())
}
