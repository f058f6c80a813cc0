use std::fmt;

use arbor_stream::StreamError;

/// What went wrong on a malformed line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Nothing that can start a name follows the indentation.
    MissingName,
    /// A run of spaces that is not a whole number of indent units.
    PartialIndent,
    /// The line is indented more than one level past its parent.
    IndentJump { expected_max: usize, found: usize },
    /// A quoted token runs to the end of the line.
    UnterminatedQuote,
    /// Unknown escape sequence inside a quoted token.
    InvalidEscape(char),
    /// A character that cannot appear here.
    Unexpected(char),
    /// `:` with no type after it.
    MissingType,
    /// Nesting beyond the configured maximum depth.
    TooDeep { max_depth: usize },
    /// Tab indentation while tabs are disabled.
    TabIndent,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingName => f.write_str("missing name"),
            Self::PartialIndent => f.write_str("indentation is not a whole number of levels"),
            Self::IndentJump {
                expected_max,
                found,
            } => write!(f, "indent level {found} exceeds maximum {expected_max}"),
            Self::UnterminatedQuote => f.write_str("unterminated quoted string"),
            Self::InvalidEscape(c) => write!(f, "invalid escape sequence '\\{c}'"),
            Self::Unexpected(c) => write!(f, "unexpected character {c:?}"),
            Self::MissingType => f.write_str("missing type after ':'"),
            Self::TooDeep { max_depth } => write!(f, "nesting deeper than {max_depth} levels"),
            Self::TabIndent => f.write_str("tab indentation is disabled"),
        }
    }
}

/// A malformed line, with a 1-based position.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("line {line}, column {column}: {kind}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(line: usize, column: usize, kind: ParseErrorKind) -> Self {
        Self { line, column, kind }
    }
}

/// Errors from the text front-end.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// The input is not well-formed.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The input stream could not be opened or went invalid.
    #[error("stream error: {0}")]
    Stream(#[from] StreamError),

    /// The input is not UTF-8.
    #[error("input is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Configuration is invalid.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result alias for the text front-end.
pub type TextResult<T> = Result<T, TextError>;
