//! Line protocol for Hearth.
//!
//! Players talk to the server in plain text, one command per line. This
//! crate owns the two pieces of that "language" that don't depend on any
//! particular network:
//!
//! - **Framing** ([`LineFramer`]): turning an arbitrary stream of bytes
//!   into complete lines, with a length cap so a client can't make us
//!   buffer forever.
//! - **Parsing** ([`Command`]): splitting a line into the command word
//!   and the rest of the text.
//! - **Errors** ([`ProtocolError`]): what can go wrong while framing.
//!
//! # Architecture
//!
//! ```text
//! Transport (bytes) → Protocol (lines, Command) → World (dispatch)
//! ```
//!
//! The protocol layer knows nothing about connections, players or rooms.

// ---------------------------------------------------------------------------
// Module declarations
// ---------------------------------------------------------------------------

mod command;
mod error;
mod framer;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use command::Command;
pub use error::ProtocolError;
pub use framer::{DEFAULT_MAX_LINE_LEN, LineFramer};
