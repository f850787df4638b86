//! Incremental byte-to-line framing.
//!
//! Network reads arrive in arbitrary chunks: half a line, three lines and
//! a bit, a lone `\r`. [`LineFramer`] buffers whatever it is given and
//! hands back complete lines as they become available.

use crate::ProtocolError;

/// Default cap on a single line, in bytes (terminator excluded).
pub const DEFAULT_MAX_LINE_LEN: usize = 1024;

/// Buffers raw bytes and splits them into `\n`-terminated lines.
///
/// A trailing `\r` is stripped, so both `\n` and `\r\n` clients work.
/// Nothing else is interpreted: telnet negotiation bytes, if a client
/// sends them, end up in the line and must be valid UTF-8 like the rest.
#[derive(Debug)]
pub struct LineFramer {
    buf: Vec<u8>,
    max_line_len: usize,
}

impl LineFramer {
    /// Creates a framer with [`DEFAULT_MAX_LINE_LEN`].
    pub fn new() -> Self {
        Self::with_max_line_len(DEFAULT_MAX_LINE_LEN)
    }

    /// Creates a framer with a custom line length cap (minimum 1).
    pub fn with_max_line_len(max_line_len: usize) -> Self {
        Self {
            buf: Vec::with_capacity(256),
            max_line_len: max_line_len.max(1),
        }
    }

    /// Appends freshly read bytes to the internal buffer.
    pub fn push(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    /// Pops the next complete line, if one is buffered.
    ///
    /// Returns `Ok(None)` when more bytes are needed.
    ///
    /// # Errors
    /// - [`ProtocolError::LineTooLong`] if a line (complete or still
    ///   pending) is longer than the cap.
    /// - [`ProtocolError::InvalidUtf8`] if a complete line isn't UTF-8.
    pub fn next_line(&mut self) -> Result<Option<String>, ProtocolError> {
        let Some(pos) = self.buf.iter().position(|b| *b == b'\n') else {
            if self.buf.len() > self.max_line_len {
                return Err(ProtocolError::LineTooLong {
                    max: self.max_line_len,
                });
            }
            return Ok(None);
        };

        let mut line: Vec<u8> = self.buf.drain(..=pos).collect();
        line.pop(); // '\n'
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        if line.len() > self.max_line_len {
            return Err(ProtocolError::LineTooLong {
                max: self.max_line_len,
            });
        }

        String::from_utf8(line)
            .map(Some)
            .map_err(|_| ProtocolError::InvalidUtf8)
    }

    /// Bytes buffered but not yet returned as a line.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }
}

impl Default for LineFramer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(framer: &mut LineFramer) -> Vec<String> {
        let mut out = Vec::new();
        while let Some(line) = framer.next_line().unwrap() {
            out.push(line);
        }
        out
    }

    #[test]
    fn test_next_line_lf_and_crlf() {
        let mut f = LineFramer::new();
        f.push(b"hello\r\nworld\n");
        assert_eq!(drain(&mut f), vec!["hello", "world"]);
        assert_eq!(f.pending(), 0);
    }

    #[test]
    fn test_next_line_waits_for_terminator() {
        let mut f = LineFramer::new();
        f.push(b"go nor");
        assert_eq!(f.next_line().unwrap(), None);
        f.push(b"th\r\n");
        assert_eq!(f.next_line().unwrap().as_deref(), Some("go north"));
    }

    #[test]
    fn test_next_line_empty_line_is_a_line() {
        let mut f = LineFramer::new();
        f.push(b"\r\n");
        assert_eq!(f.next_line().unwrap().as_deref(), Some(""));
    }

    #[test]
    fn test_next_line_too_long_without_newline() {
        let mut f = LineFramer::with_max_line_len(4);
        f.push(b"abcdef");
        assert_eq!(
            f.next_line(),
            Err(ProtocolError::LineTooLong { max: 4 })
        );
    }

    #[test]
    fn test_next_line_too_long_with_newline() {
        let mut f = LineFramer::with_max_line_len(4);
        f.push(b"abcde\n");
        assert_eq!(
            f.next_line(),
            Err(ProtocolError::LineTooLong { max: 4 })
        );
    }

    #[test]
    fn test_next_line_cr_does_not_count_toward_limit() {
        let mut f = LineFramer::with_max_line_len(4);
        f.push(b"abcd\r\n");
        assert_eq!(f.next_line().unwrap().as_deref(), Some("abcd"));
    }

    #[test]
    fn test_next_line_invalid_utf8() {
        let mut f = LineFramer::new();
        f.push(&[0xff, 0xfe, b'\n']);
        assert_eq!(f.next_line(), Err(ProtocolError::InvalidUtf8));
    }
}
