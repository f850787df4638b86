//! Parsed command lines.

use std::fmt;

/// One line of player input, split into a command word and its parameters.
///
/// The split happens at the first run of whitespace:
///
/// ```rust
/// use hearth_protocol::Command;
///
/// let cmd = Command::parse("say   hello there ");
/// assert_eq!(cmd.word, "say");
/// assert_eq!(cmd.params, "hello there");
/// assert_eq!(cmd.line, "say   hello there");
/// ```
///
/// The command word keeps its case. Dispatch is case-sensitive, so `Look`
/// is an unknown command while `look` is not.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Command {
    /// The whole line with surrounding whitespace removed.
    ///
    /// A player's first line is consumed as their display name, and the
    /// name is this text verbatim rather than just the first word.
    pub line: String,

    /// The first whitespace-delimited token. Empty for a blank line.
    pub word: String,

    /// Everything after the command word, with leading whitespace removed.
    pub params: String,
}

impl Command {
    /// Parses a single line (without its line terminator).
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (word, params) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim_start()),
            None => (line, ""),
        };
        Self {
            line: line.to_string(),
            word: word.to_string(),
            params: params.to_string(),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line)
    }
}
