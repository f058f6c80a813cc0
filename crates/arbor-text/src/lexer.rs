//! Line lexer for the indented text format, built on `winnow`.
//!
//! ```text
//! line       = indent name [ ":" type ] [ ">>" value ]
//! indent     = { "\t" | indent_width * " " }
//! name       = quoted | bareword
//! type       = quoted | run up to whitespace or ">>"
//! value      = quoted | rest of line, trimmed
//! ```
//!
//! A bareword is the longest run of characters that are not whitespace,
//! `-` or `:` and that does not contain `>>`. A token opened with `"` is
//! always quoted.

use winnow::combinator::{alt, delimited, opt, repeat};
use winnow::error::{ContextError, ErrMode};
use winnow::stream::{AsChar, Location};
use winnow::token::{one_of, take_till, take_while};
use winnow::{LocatingSlice, ModalResult, Parser};

use crate::config::ParserConfig;
use crate::error::{ParseError, ParseErrorKind};

/// Lexer input: one line, tracking byte offsets for error columns.
type Input<'a> = LocatingSlice<&'a str>;

/// One non-blank line, split into its parts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Line {
    /// 1-based line number.
    pub number: usize,
    /// 1-based column where the name starts.
    pub column: usize,
    pub level: usize,
    pub name: String,
    pub explicit_type: Option<String>,
    pub value: Option<String>,
}

/// Lex a single line. Blank lines yield `Ok(None)`.
pub fn lex_line(
    text: &str,
    number: usize,
    config: &ParserConfig,
) -> Result<Option<Line>, ParseError> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    let mut input = Input::new(text);
    line(&mut input, text, number, config)
        .map(Some)
        .map_err(|fault| ParseError::new(number, column_at(text, fault.offset), fault.kind))
}

/// Lex every line of `text`, skipping blank ones.
pub fn lex<'a>(
    text: &'a str,
    config: &'a ParserConfig,
) -> impl Iterator<Item = Result<Line, ParseError>> + 'a {
    text.lines()
        .enumerate()
        .filter_map(move |(index, line)| lex_line(line, index + 1, config).transpose())
}

/// A malformed token at a byte offset into the line.
struct Fault {
    offset: usize,
    kind: ParseErrorKind,
}

impl Fault {
    fn at(input: &Input<'_>, kind: ParseErrorKind) -> Self {
        Self {
            offset: input.current_token_start(),
            kind,
        }
    }
}

fn column_at(text: &str, offset: usize) -> usize {
    text[..offset].chars().count() + 1
}

fn line(
    input: &mut Input<'_>,
    text: &str,
    number: usize,
    config: &ParserConfig,
) -> Result<Line, Fault> {
    let level = indent(input, config)?;
    if level >= config.max_depth {
        return Err(Fault::at(
            input,
            ParseErrorKind::TooDeep {
                max_depth: config.max_depth,
            },
        ));
    }

    let column = column_at(text, input.current_token_start());
    let name = name_token(input)?;
    skip_whitespace(input);

    let mut explicit_type = None;
    if marker(input, ":") {
        skip_whitespace(input);
        explicit_type = Some(type_token(input)?);
        skip_whitespace(input);
    }

    let mut value = None;
    if marker(input, ">>") {
        value = Some(value_token(input)?);
    }

    if let Some(c) = input.chars().next() {
        return Err(Fault::at(input, ParseErrorKind::Unexpected(c)));
    }

    Ok(Line {
        number,
        column,
        level,
        name,
        explicit_type,
        value,
    })
}

// ---------------------------------------------------------------------------
// Indentation
// ---------------------------------------------------------------------------

/// Count whole indent units: a tab (when allowed) or `indent_width` spaces.
fn indent(input: &mut Input<'_>, config: &ParserConfig) -> Result<usize, Fault> {
    let width = config.indent_width;
    let spaces = take_while(width..=width, ' ').void();
    let units: ModalResult<usize> = if config.allow_tabs {
        repeat(0.., alt(('\t'.void(), spaces))).parse_next(input)
    } else {
        repeat(0.., spaces).parse_next(input)
    };
    let Ok(level) = units else {
        return Err(Fault::at(input, ParseErrorKind::PartialIndent));
    };

    match input.chars().next() {
        Some('\t') => Err(Fault::at(input, ParseErrorKind::TabIndent)),
        Some(' ') => Err(Fault::at(input, ParseErrorKind::PartialIndent)),
        Some(c) if c.is_whitespace() => Err(Fault::at(input, ParseErrorKind::Unexpected(c))),
        _ => Ok(level),
    }
}

fn skip_whitespace(input: &mut Input<'_>) {
    let _: ModalResult<&str> = take_while(0.., char::is_whitespace).parse_next(input);
}

fn marker(input: &mut Input<'_>, token: &'static str) -> bool {
    let found: ModalResult<Option<&str>> = opt(token).parse_next(input);
    matches!(found, Ok(Some(_)))
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

fn is_name_char(c: char) -> bool {
    !(c.is_whitespace() || c == '-' || c == ':')
}

fn is_type_char(c: char) -> bool {
    !c.is_whitespace()
}

/// Longest run of `accept` characters that does not contain `>>`.
fn bareword(input: &mut Input<'_>, accept: fn(char) -> bool) -> ModalResult<String> {
    let mut word = String::new();
    loop {
        let chunk: &str = take_while(0.., |c: char| accept(c) && c != '>').parse_next(input)?;
        word.push_str(chunk);

        if !accept('>') || !input.starts_with('>') || input.starts_with(">>") {
            break;
        }
        '>'.parse_next(input)?;
        word.push('>');
    }

    if word.is_empty() {
        return Err(ErrMode::Backtrack(ContextError::new()));
    }
    Ok(word)
}

fn name_token(input: &mut Input<'_>) -> Result<String, Fault> {
    if input.starts_with('"') {
        return quoted(input);
    }
    let start = input.current_token_start();
    match bareword(input, is_name_char) {
        Ok(word) => Ok(word),
        Err(_) => {
            let kind = match input.chars().next() {
                Some('-') => ParseErrorKind::Unexpected('-'),
                _ => ParseErrorKind::MissingName,
            };
            Err(Fault {
                offset: start,
                kind,
            })
        }
    }
}

fn type_token(input: &mut Input<'_>) -> Result<String, Fault> {
    if input.starts_with('"') {
        return quoted(input);
    }
    let start = input.current_token_start();
    bareword(input, is_type_char).map_err(|_| Fault {
        offset: start,
        kind: ParseErrorKind::MissingType,
    })
}

/// A quoted value, or the trimmed rest of the line.
fn value_token(input: &mut Input<'_>) -> Result<String, Fault> {
    skip_whitespace(input);
    if input.starts_with('"') {
        let value = quoted(input)?;
        skip_whitespace(input);
        return Ok(value);
    }
    let rest: ModalResult<&str> = take_while(0.., |_: char| true).parse_next(input);
    Ok(rest.map(str::trim_end).unwrap_or_default().to_string())
}

// ---------------------------------------------------------------------------
// Quoted strings
// ---------------------------------------------------------------------------

/// A double-quoted token. Errors point at the opening quote, or at the
/// backslash of a bad escape.
fn quoted(input: &mut Input<'_>) -> Result<String, Fault> {
    let open = input.current_token_start();
    let unterminated = || Fault {
        offset: open,
        kind: ParseErrorKind::UnterminatedQuote,
    };

    let opening: ModalResult<char> = '"'.parse_next(input);
    opening.map_err(|_| unterminated())?;

    let mut out = String::new();
    loop {
        let chunk: ModalResult<&str> = take_till(0.., ['"', '\\']).parse_next(input);
        out.push_str(chunk.map_err(|_| unterminated())?);

        let delimiter: ModalResult<char> = one_of(['"', '\\']).parse_next(input);
        match delimiter {
            Ok('"') => return Ok(out),
            Ok(_) => {
                let backslash = input.current_token_start() - 1;
                let Some(escaped) = input.chars().next() else {
                    return Err(unterminated());
                };
                match escape(input) {
                    Ok(c) => out.push(c),
                    Err(_) => {
                        return Err(Fault {
                            offset: backslash,
                            kind: ParseErrorKind::InvalidEscape(escaped),
                        })
                    }
                }
            }
            Err(_) => return Err(unterminated()),
        }
    }
}

/// The character after a backslash: `n t r 0 \\ " '` or `u{hex}`.
fn escape(input: &mut Input<'_>) -> ModalResult<char> {
    alt((
        one_of(['n', 't', 'r', '0', '\\', '"', '\'']).map(|c: char| match c {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '0' => '\0',
            other => other,
        }),
        unicode_escape,
    ))
    .parse_next(input)
}

fn unicode_escape(input: &mut Input<'_>) -> ModalResult<char> {
    delimited("u{", take_while(1..=6, AsChar::is_hex_digit), '}')
        .verify_map(|digits: &str| u32::from_str_radix(digits, 16).ok().and_then(char::from_u32))
        .parse_next(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_one(text: &str) -> Line {
        lex_line(text, 1, &ParserConfig::default()).unwrap().unwrap()
    }

    fn lex_err(text: &str) -> ParseError {
        lex_line(text, 1, &ParserConfig::default()).unwrap_err()
    }

    // --- Tokens ---

    #[test]
    fn name_only() {
        let line = lex_one("config");
        assert_eq!(line.level, 0);
        assert_eq!(line.name, "config");
        assert_eq!(line.explicit_type, None);
        assert_eq!(line.value, None);
    }

    #[test]
    fn typed_value() {
        let line = lex_one("        port: int >> 8080");
        assert_eq!(line.level, 2);
        assert_eq!(line.column, 9);
        assert_eq!(line.name, "port");
        assert_eq!(line.explicit_type.as_deref(), Some("int"));
        assert_eq!(line.value.as_deref(), Some("8080"));
    }

    #[test]
    fn raw_value_is_trimmed_rest_of_line() {
        let line = lex_one("motd >>   hello there, world  ");
        assert_eq!(line.value.as_deref(), Some("hello there, world"));
    }

    #[test]
    fn quoted_value_and_escapes() {
        let line = lex_one(r#"host >> "127.0.0.1""#);
        assert_eq!(line.value.as_deref(), Some("127.0.0.1"));

        let line = lex_one(r#""two words" >> " a\tb\n\u{41}\"" "#);
        assert_eq!(line.name, "two words");
        assert_eq!(line.value.as_deref(), Some(" a\tb\nA\""));
    }

    #[test]
    fn type_runs_until_value_marker() {
        let line = lex_one("x:list<u8>>>1,2");
        assert_eq!(line.name, "x");
        assert_eq!(line.explicit_type.as_deref(), Some("list<u8"));
        assert_eq!(line.value.as_deref(), Some(">1,2"));
    }

    #[test]
    fn empty_value_marker_gives_empty_value() {
        assert_eq!(lex_one("a >>").value.as_deref(), Some(""));
    }

    #[test]
    fn tabs_count_as_levels() {
        assert_eq!(lex_one("\t\tdeep").level, 2);
        assert_eq!(lex_one("\t    mixed").level, 2);
    }

    #[test]
    fn blank_lines_are_skipped() {
        let config = ParserConfig::default();
        assert_eq!(lex_line("   \t ", 3, &config).unwrap(), None);
        let lines: Vec<Line> = lex("a\n\n  \nb", &config).map(Result::unwrap).collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].number, 4);
    }

    // --- Errors ---

    #[test]
    fn missing_name() {
        assert_eq!(lex_err("    >> 5").kind, ParseErrorKind::MissingName);
        assert_eq!(lex_err(": int").kind, ParseErrorKind::MissingName);
    }

    #[test]
    fn dash_is_not_a_name_character() {
        let err = lex_err("my-key >> 1");
        assert_eq!(err.kind, ParseErrorKind::Unexpected('-'));
        assert_eq!(err.column, 3);
    }

    #[test]
    fn partial_indent_reports_column() {
        let err = lex_err("      six");
        assert_eq!(err.kind, ParseErrorKind::PartialIndent);
        assert_eq!(err.column, 5);
    }

    #[test]
    fn unterminated_quote_points_at_opening() {
        let err = lex_err(r#"a >> "open"#);
        assert_eq!(err.kind, ParseErrorKind::UnterminatedQuote);
        assert_eq!(err.column, 6);
    }

    #[test]
    fn invalid_escapes() {
        assert_eq!(lex_err(r#""a\q""#).kind, ParseErrorKind::InvalidEscape('q'));
        assert_eq!(
            lex_err(r#""\u{110000}""#).kind,
            ParseErrorKind::InvalidEscape('u')
        );
        assert_eq!(lex_err(r#""\u41""#).kind, ParseErrorKind::InvalidEscape('u'));
    }

    #[test]
    fn only_whitespace_may_follow_quoted_value() {
        let err = lex_err(r#"a >> "x" y"#);
        assert_eq!(err.kind, ParseErrorKind::Unexpected('y'));
    }

    #[test]
    fn missing_type() {
        assert_eq!(lex_err("a: >> 1").kind, ParseErrorKind::MissingType);
        assert_eq!(lex_err("a:").kind, ParseErrorKind::MissingType);
    }

    #[test]
    fn trailing_garbage_after_name() {
        assert_eq!(lex_err("a b").kind, ParseErrorKind::Unexpected('b'));
    }

    #[test]
    fn tabs_can_be_disabled() {
        let config = ParserConfig {
            allow_tabs: false,
            ..ParserConfig::default()
        };
        let err = lex_line("\tx", 1, &config).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::TabIndent);
    }

    #[test]
    fn depth_limit() {
        let config = ParserConfig {
            max_depth: 2,
            ..ParserConfig::default()
        };
        assert!(lex_line("\tok", 1, &config).is_ok());
        let err = lex_line("\t\tno", 1, &config).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::TooDeep { max_depth: 2 });
    }

    #[test]
    fn single_angle_bracket_stays_in_name() {
        let line = lex_one("a>b >> 1");
        assert_eq!(line.name, "a>b");
        assert_eq!(line.value.as_deref(), Some("1"));
    }

    #[test]
    fn columns_count_characters_not_bytes() {
        let err = lex_err("\u{e9}t\u{e9} >> \"x\" !");
        assert_eq!(err.kind, ParseErrorKind::Unexpected('!'));
        assert_eq!(err.column, 12);
    }
}
