//! Unified error type for Hearth.

use hearth_rooms::WorldError;
use hearth_session::SessionError;
use hearth_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum HearthError {
    /// A transport-level error (bind, accept, send, receive). Line
    /// framing failures stay inside the front-ends and close the
    /// connection instead.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A registry error. `AlreadyRegistered` during a step is fatal.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A room graph error (bad configuration, unknown room).
    #[error(transparent)]
    World(#[from] WorldError),
}

impl HearthError {
    /// Returns `true` for errors that mean the server must not (keep)
    /// serving: bad configuration or a broken transport contract.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::World(e) => e.is_config_error(),
            Self::Session(SessionError::AlreadyRegistered(_)) => true,
            Self::Transport(TransportError::BindFailed(_)) => true,
            _ => false,
        }
    }
}
