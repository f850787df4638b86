//! # Hearth
//!
//! A small text-based multiplayer world server.
//!
//! Players connect over TCP (or WebSocket), pick a name, and wander a
//! graph of rooms loaded from a JSON file, talking to whoever shares
//! their room. One task owns the whole [`World`] and advances it on a
//! fixed tick; front-end tasks only move lines in and out.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hearth::prelude::*;
//!
//! # async fn start() -> Result<(), HearthError> {
//! let server = HearthServer::builder()
//!     .rooms_file("data/rooms.json")
//!     .tcp("0.0.0.0:4000")
//!     .build()
//!     .await?;
//! server
//!     .run(async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Commands
//!
//! | Command        | Effect                                         |
//! |----------------|------------------------------------------------|
//! | `help`         | Lists the commands                             |
//! | `say <text>`   | Everyone in the room hears `<name> says: <text>` |
//! | `look`, `l`    | Room description, who is here, and the exits   |
//! | `go <exit>`    | Moves through an exit                          |

mod broadcast;
mod commands;
mod error;
mod server;
mod world;

pub use broadcast::Broadcaster;
pub use commands::{CommandContext, CommandHandler, CommandTable, HELP_LINES};
pub use error::HearthError;
pub use server::{
    DEFAULT_ROOMS_FILE, HearthServer, HearthServerBuilder, ServerConfig,
    StepReport, WorldServer,
};
pub use world::{NAME_PROMPT, World};

pub use hearth_protocol as protocol;
pub use hearth_rooms as rooms;
pub use hearth_session as session;
pub use hearth_tick as tick;
pub use hearth_transport as transport;

/// Everything needed to build and run a server, or to drive one in a
/// test.
pub mod prelude {
    pub use crate::{
        Broadcaster, CommandContext, CommandHandler, CommandTable,
        HearthError, HearthServer, HearthServerBuilder, ServerConfig,
        StepReport, World, WorldServer,
    };
    pub use hearth_protocol::Command;
    pub use hearth_rooms::{Room, RoomGraph, RoomKey, WorldError};
    pub use hearth_session::{Player, PlayerRegistry, PlayerState};
    pub use hearth_tick::{ManualTicks, TickConfig, TickPolicy, TickSource};
    pub use hearth_transport::{
        ConnectionId, Hub, HubHandle, MemoryClient, Outbox, Transport,
    };
}
