//! Error types for the protocol layer.
//!
//! Each crate in Hearth defines its own error enum. When you see a
//! `ProtocolError`, the problem is in the bytes a client sent, not in
//! networking or world state.

/// Errors that can occur while framing inbound bytes into lines.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// A line grew past the framer's limit without a terminating newline.
    ///
    /// The connection is considered hostile or broken at this point; the
    /// transport closes it rather than trying to resynchronize.
    #[error("line exceeds {max} bytes")]
    LineTooLong {
        /// The configured maximum line length in bytes.
        max: usize,
    },

    /// A complete line was not valid UTF-8.
    #[error("line is not valid UTF-8")]
    InvalidUtf8,
}
