//! The room graph for Hearth.
//!
//! The world is a fixed set of rooms joined by named, one-way exits.
//! It is loaded once at startup, validated, and never changes while the
//! server runs.
//!
//! # Key types
//!
//! - [`RoomGraph`]: every room, keyed by [`RoomKey`]; load + lookup
//! - [`Room`]: display name, description, exits
//! - [`WorldError`]: configuration and lookup failures
//!
//! # Invariant
//!
//! Every exit of every room in a [`RoomGraph`] leads to a room that is
//! also in the graph. The constructors refuse anything else, so a key
//! obtained from an exit can always be looked up.

mod error;
mod graph;
mod room;

pub use error::WorldError;
pub use graph::RoomGraph;
pub use room::{Room, RoomKey, describe};
