//! Error types for key parsing.

use thiserror::Error;

/// Errors produced when parsing a textual key path.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    /// A `/`-separated segment was empty (`"a//b"`, `"a/"`).
    #[error("empty segment at position {position} in key {input:?}")]
    EmptySegment { input: String, position: usize },

    /// A segment could not be parsed as a word of the target family.
    #[error("invalid segment {segment:?} at position {position}: {reason}")]
    InvalidSegment {
        segment: String,
        position: usize,
        reason: String,
    },
}

/// Convenience alias for key operations.
pub type KeyResult<T> = Result<T, KeyError>;
