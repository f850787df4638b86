//! `HearthServer` builder and the world loop.
//!
//! The loop runs on one task. Each tick it pulls everything the
//! front-ends collected since the last tick and applies it in a fixed
//! order:
//!
//! 1. `transport.tick()`
//! 2. new connections → register, prompt for a name
//! 3. disconnections → announce, unregister
//! 4. commands → name or dispatch, one at a time in arrival order
//!
//! A connection that opens, sends a line and closes within one tick is
//! therefore registered and removed before its line is looked at, and
//! the line is dropped.

use std::future::Future;
use std::net::SocketAddr;
use std::ops::AddAssign;
use std::path::PathBuf;

use hearth_rooms::{RoomGraph, RoomKey};
use hearth_tick::{TickConfig, TickScheduler, TickSource};
use hearth_transport::{Hub, HubHandle, Transport, TransportError};
use tokio::task::JoinHandle;

use crate::HearthError;
use crate::world::World;

/// Default room graph location, relative to the working directory.
pub const DEFAULT_ROOMS_FILE: &str = "data/rooms.json";

/// Server settings. Every field has a working default.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Key of the room new players appear in.
    pub start_room: RoomKey,
    pub tick: TickConfig,
    /// Line-based TCP listener address. `None` disables it.
    pub tcp_addr: Option<String>,
    /// WebSocket listener address. `None` disables it.
    pub websocket_addr: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            start_room: RoomKey::from("tavern"),
            tick: TickConfig::default(),
            tcp_addr: Some("0.0.0.0:4000".to_string()),
            websocket_addr: None,
        }
    }
}

enum RoomSource {
    File(PathBuf),
    Graph(RoomGraph),
}

/// Counts of what one or more steps processed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    pub connected: usize,
    pub disconnected: usize,
    pub commands: usize,
}

impl AddAssign for StepReport {
    fn add_assign(&mut self, rhs: Self) {
        self.connected += rhs.connected;
        self.disconnected += rhs.disconnected;
        self.commands += rhs.commands;
    }
}

/// A [`World`] wired to a [`Transport`].
pub struct WorldServer<T: Transport> {
    world: World,
    transport: T,
    tick: TickConfig,
}

impl<T: Transport> WorldServer<T> {
    pub fn new(world: World, transport: T) -> Self {
        Self {
            world,
            transport,
            tick: TickConfig::default(),
        }
    }

    /// Sets the tick configuration used by [`run`](Self::run).
    pub fn with_tick_config(mut self, tick: TickConfig) -> Self {
        self.tick = tick.validated();
        self
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Performs one tick of work.
    ///
    /// # Errors
    /// Only when the transport reports an already-known connection as
    /// new. The server can't trust its state after that and should stop.
    pub fn step(&mut self) -> Result<StepReport, HearthError> {
        self.transport.tick();
        let mut report = StepReport::default();

        for id in self.transport.poll_new_connections() {
            self.world.connect(id, &self.transport)?;
            report.connected += 1;
        }

        for id in self.transport.poll_disconnections() {
            if self.world.disconnect(id, &self.transport) {
                report.disconnected += 1;
            }
        }

        for (id, cmd) in self.transport.poll_commands() {
            if self.world.handle_command(id, &cmd, &self.transport) {
                report.commands += 1;
            }
        }

        Ok(report)
    }

    /// Steps once per tick from `source` until it runs out or `shutdown`
    /// completes. Returns the totals over all steps.
    ///
    /// # Errors
    /// The first error from [`step`](Self::step).
    pub async fn run_until<S, F>(
        &mut self,
        mut source: S,
        shutdown: F,
    ) -> Result<StepReport, HearthError>
    where
        S: TickSource,
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut totals = StepReport::default();

        loop {
            let tick = tokio::select! {
                biased;
                () = &mut shutdown => {
                    tracing::info!("shutdown requested");
                    break;
                }
                tick = source.next_tick() => tick,
            };
            let Some(tick) = tick else {
                tracing::debug!("tick source finished");
                break;
            };

            let report = self.step()?;
            if report != StepReport::default() {
                tracing::trace!(
                    tick = tick.tick,
                    connected = report.connected,
                    disconnected = report.disconnected,
                    commands = report.commands,
                    "tick processed"
                );
            }
            totals += report;
            source.record_tick_end();
        }

        Ok(totals)
    }

    /// Runs on a real-time [`TickScheduler`] until `shutdown` completes.
    pub async fn run(
        &mut self,
        shutdown: impl Future<Output = ()>,
    ) -> Result<StepReport, HearthError> {
        let scheduler = TickScheduler::new(self.tick.clone());
        tracing::info!(
            tick_rate_hz = scheduler.tick_rate_hz(),
            "world loop running"
        );
        self.run_until(scheduler, shutdown).await
    }
}

/// Builder for a [`HearthServer`].
///
/// # Example
///
/// ```rust,ignore
/// use hearth::prelude::*;
///
/// let mut server = HearthServer::builder()
///     .rooms_file("data/rooms.json")
///     .tcp("0.0.0.0:4000")
///     .build()
///     .await?;
/// server.run(async { let _ = tokio::signal::ctrl_c().await; }).await?;
/// ```
pub struct HearthServerBuilder {
    config: ServerConfig,
    rooms: RoomSource,
}

impl HearthServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: ServerConfig::default(),
            rooms: RoomSource::File(PathBuf::from(DEFAULT_ROOMS_FILE)),
        }
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Loads rooms from a JSON file at build time.
    pub fn rooms_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.rooms = RoomSource::File(path.into());
        self
    }

    /// Uses an already-built room graph.
    pub fn rooms(mut self, graph: RoomGraph) -> Self {
        self.rooms = RoomSource::Graph(graph);
        self
    }

    pub fn start_room(mut self, key: impl Into<RoomKey>) -> Self {
        self.config.start_room = key.into();
        self
    }

    pub fn tick_rate(mut self, hz: u32) -> Self {
        self.config.tick.tick_rate_hz = hz;
        self
    }

    pub fn tick_config(mut self, tick: TickConfig) -> Self {
        self.config.tick = tick;
        self
    }

    /// Sets the TCP listener address.
    pub fn tcp(mut self, addr: &str) -> Self {
        self.config.tcp_addr = Some(addr.to_string());
        self
    }

    /// Disables the TCP listener.
    pub fn no_tcp(mut self) -> Self {
        self.config.tcp_addr = None;
        self
    }

    /// Enables the WebSocket listener.
    pub fn websocket(mut self, addr: &str) -> Self {
        self.config.websocket_addr = Some(addr.to_string());
        self
    }

    /// Loads and checks the room graph, then binds the listeners.
    ///
    /// # Errors
    /// Any room graph configuration error, an unknown starting room, or
    /// a listener that fails to bind.
    pub async fn build(self) -> Result<HearthServer, HearthError> {
        let graph = match self.rooms {
            RoomSource::File(path) => RoomGraph::load(path)?,
            RoomSource::Graph(graph) => graph,
        };
        let world = World::new(graph, self.config.start_room)?;

        let hub = Hub::new();
        let handle = hub.handle();
        let mut listeners = Vec::new();

        let tcp_addr = match &self.config.tcp_addr {
            Some(addr) => {
                let listener = hearth_transport::tcp::bind(addr).await?;
                let local = listener.local_addr().map_err(TransportError::BindFailed)?;
                listeners.push(hearth_transport::tcp::serve(listener, handle.clone()));
                Some(local)
            }
            None => None,
        };

        let websocket_addr = match &self.config.websocket_addr {
            Some(addr) => {
                let listener = hearth_transport::websocket::bind(addr).await?;
                let local = listener.local_addr().map_err(TransportError::BindFailed)?;
                listeners
                    .push(hearth_transport::websocket::serve(listener, handle.clone()));
                Some(local)
            }
            None => None,
        };

        let server =
            WorldServer::new(world, hub).with_tick_config(self.config.tick);

        Ok(HearthServer {
            server,
            handle,
            tcp_addr,
            websocket_addr,
            listeners,
        })
    }
}

impl Default for HearthServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A built server: the world loop plus its network front-ends.
///
/// The listeners are already accepting when this is returned; players
/// who connect before [`run`](Self::run) is called are picked up on the
/// first tick.
pub struct HearthServer {
    server: WorldServer<Hub>,
    handle: HubHandle,
    tcp_addr: Option<SocketAddr>,
    websocket_addr: Option<SocketAddr>,
    listeners: Vec<JoinHandle<()>>,
}

impl HearthServer {
    /// Creates a new builder.
    pub fn builder() -> HearthServerBuilder {
        HearthServerBuilder::new()
    }

    /// Bound TCP address, if the TCP listener is enabled.
    pub fn tcp_addr(&self) -> Option<SocketAddr> {
        self.tcp_addr
    }

    /// Bound WebSocket address, if enabled.
    pub fn websocket_addr(&self) -> Option<SocketAddr> {
        self.websocket_addr
    }

    /// A handle for attaching more front-ends or in-memory clients.
    pub fn handle(&self) -> HubHandle {
        self.handle.clone()
    }

    pub fn world(&self) -> &World {
        self.server.world()
    }

    /// Runs the world loop in real time until `shutdown` completes, then
    /// stops accepting connections.
    pub async fn run(
        mut self,
        shutdown: impl Future<Output = ()>,
    ) -> Result<StepReport, HearthError> {
        let result = self.server.run(shutdown).await;
        self.stop_listeners();
        result
    }

    /// Like [`run`](Self::run) but driven by `source`.
    pub async fn run_until(
        mut self,
        source: impl TickSource,
        shutdown: impl Future<Output = ()>,
    ) -> Result<StepReport, HearthError> {
        let result = self.server.run_until(source, shutdown).await;
        self.stop_listeners();
        result
    }

    /// Gives up the listeners and returns the bare world loop.
    pub fn into_world_server(mut self) -> WorldServer<Hub> {
        self.stop_listeners();
        self.server
    }

    fn stop_listeners(&mut self) {
        for listener in self.listeners.drain(..) {
            listener.abort();
        }
    }
}
