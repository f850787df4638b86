//! Player registry for Hearth.
//!
//! Every open connection has exactly one [`Player`] entry, keyed by its
//! [`ConnectionId`](hearth_transport::ConnectionId). An entry starts out
//! unnamed and nowhere, and becomes a named player standing in a room
//! once the connection's first line arrives.
//!
//! # How it fits in the stack
//!
//! ```text
//! World (above)  ← dispatches commands, decides who hears what
//!     ↕
//! Session Layer (this crate)  ← who is connected, what they're called, where they are
//!     ↕
//! Transport / Rooms (below)  ← ConnectionId, RoomKey
//! ```

mod error;
mod player;
mod registry;

pub use error::SessionError;
pub use player::{Player, PlayerState};
pub use registry::PlayerRegistry;
