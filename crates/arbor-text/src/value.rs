//! Value parsers: turn a node's text value into a typed entry.
//!
//! A node with an explicit type goes to the first parser whose
//! [`ValueParser::match_type`] accepts it. A node without one goes to the
//! first parser whose [`ValueParser::match_value`] accepts the text.
//!
//! An untyped value nobody claims is stored as its raw text unless the
//! registry's text fallback is off. A typed value nobody claims is left
//! unwritten.

use std::fmt;

use arbor_store::{Descriptor, Storage};
use tracing::debug;

/// Something that can store a textual value into a descriptor.
pub trait ValueParser<S: Storage> {
    /// Short name used in logs and for [`ValueParsers::remove`].
    fn name(&self) -> &str;

    /// Whether this parser handles values declared with `explicit_type`.
    fn match_type(&self, explicit_type: &str) -> bool;

    /// Whether this parser claims an untyped `value` by its shape.
    fn match_value(&self, value: &str) -> bool;

    /// Store `value` at `target`. Returns `false` if the text does not
    /// convert, in which case nothing was written.
    fn parse_into(&self, target: &Descriptor<'_, S>, explicit_type: Option<&str>, value: &str)
        -> bool;
}

fn type_is(explicit_type: &str, names: &[&str]) -> bool {
    names
        .iter()
        .any(|name| explicit_type.eq_ignore_ascii_case(name))
}

fn is_integer(value: &str) -> bool {
    let digits = value.strip_prefix('-').unwrap_or(value);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Stores `value` verbatim as a string.
fn store_text<S: Storage>(target: &Descriptor<'_, S>, value: &str) -> bool {
    target.store(value)
}

// ---------------------------------------------------------------------------
// Built-in parsers
// ---------------------------------------------------------------------------

/// Signed 64-bit integers: `int`, `integer`, `i64`; untyped values matching
/// `-?[0-9]+` that fit in an `i64`.
#[derive(Clone, Copy, Debug, Default)]
pub struct IntegerParser;

impl<S: Storage> ValueParser<S> for IntegerParser {
    fn name(&self) -> &str {
        "integer"
    }

    fn match_type(&self, explicit_type: &str) -> bool {
        type_is(explicit_type, &["int", "integer", "i64"])
    }

    fn match_value(&self, value: &str) -> bool {
        is_integer(value) && value.parse::<i64>().is_ok()
    }

    fn parse_into(&self, target: &Descriptor<'_, S>, _: Option<&str>, value: &str) -> bool {
        match value.trim().parse::<i64>() {
            Ok(parsed) => target.store(&parsed),
            Err(_) => false,
        }
    }
}

/// Unsigned 64-bit integers: `uint`, `u64`. Type only.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnsignedParser;

impl<S: Storage> ValueParser<S> for UnsignedParser {
    fn name(&self) -> &str {
        "unsigned"
    }

    fn match_type(&self, explicit_type: &str) -> bool {
        type_is(explicit_type, &["uint", "u64"])
    }

    fn match_value(&self, _: &str) -> bool {
        false
    }

    fn parse_into(&self, target: &Descriptor<'_, S>, _: Option<&str>, value: &str) -> bool {
        match value.trim().parse::<u64>() {
            Ok(parsed) => target.store(&parsed),
            Err(_) => false,
        }
    }
}

/// 64-bit floats: `float`, `f64`, `double`; untyped decimal values with a
/// `.` or an exponent.
#[derive(Clone, Copy, Debug, Default)]
pub struct FloatParser;

impl<S: Storage> ValueParser<S> for FloatParser {
    fn name(&self) -> &str {
        "float"
    }

    fn match_type(&self, explicit_type: &str) -> bool {
        type_is(explicit_type, &["float", "f64", "double"])
    }

    fn match_value(&self, value: &str) -> bool {
        value.bytes().any(|b| b.is_ascii_digit())
            && value.bytes().any(|b| matches!(b, b'.' | b'e' | b'E'))
            && value
                .bytes()
                .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'-' | b'+'))
            && value.parse::<f64>().is_ok()
    }

    fn parse_into(&self, target: &Descriptor<'_, S>, _: Option<&str>, value: &str) -> bool {
        match value.trim().parse::<f64>() {
            Ok(parsed) => target.store(&parsed),
            Err(_) => false,
        }
    }
}

/// Booleans: `bool`, `boolean`. Type only, so an untyped `true` stays text.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoolParser;

impl<S: Storage> ValueParser<S> for BoolParser {
    fn name(&self) -> &str {
        "bool"
    }

    fn match_type(&self, explicit_type: &str) -> bool {
        type_is(explicit_type, &["bool", "boolean"])
    }

    fn match_value(&self, _: &str) -> bool {
        false
    }

    fn parse_into(&self, target: &Descriptor<'_, S>, _: Option<&str>, value: &str) -> bool {
        let parsed = match value.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => true,
            "false" | "no" | "off" | "0" => false,
            _ => return false,
        };
        target.store(&parsed)
    }
}

/// Raw bytes from hex: `hex`, `bytes`. Type only.
#[derive(Clone, Copy, Debug, Default)]
pub struct HexParser;

impl<S: Storage> ValueParser<S> for HexParser {
    fn name(&self) -> &str {
        "hex"
    }

    fn match_type(&self, explicit_type: &str) -> bool {
        type_is(explicit_type, &["hex", "bytes"])
    }

    fn match_value(&self, _: &str) -> bool {
        false
    }

    fn parse_into(&self, target: &Descriptor<'_, S>, _: Option<&str>, value: &str) -> bool {
        match hex::decode(value.trim()) {
            Ok(bytes) => target.write_bytes(&bytes),
            Err(_) => false,
        }
    }
}

/// Text: `string`, `str`, `text`. Type only; untyped leftovers reach the
/// registry's text fallback instead.
#[derive(Clone, Copy, Debug, Default)]
pub struct TextParser;

impl<S: Storage> ValueParser<S> for TextParser {
    fn name(&self) -> &str {
        "text"
    }

    fn match_type(&self, explicit_type: &str) -> bool {
        type_is(explicit_type, &["string", "str", "text"])
    }

    fn match_value(&self, _: &str) -> bool {
        false
    }

    fn parse_into(&self, target: &Descriptor<'_, S>, _: Option<&str>, value: &str) -> bool {
        store_text(target, value)
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// What happened to one value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// The named parser stored the value.
    Written(String),
    /// The named parser claimed the value but could not convert it.
    Rejected(String),
    /// No parser claimed an untyped value, so it was stored as raw text.
    Fallback,
    /// No parser claimed the value.
    Unmatched,
}

/// Ordered list of value parsers; the first match wins.
pub struct ValueParsers<S: Storage> {
    parsers: Vec<Box<dyn ValueParser<S>>>,
    fallback_to_text: bool,
}

impl<S: Storage> ValueParsers<S> {
    /// A registry with no parsers. Untyped values are kept as raw text and
    /// typed ones are left unwritten.
    pub fn new() -> Self {
        Self {
            parsers: Vec::new(),
            fallback_to_text: true,
        }
    }

    /// Integer, unsigned, float, bool, hex and text, with the text fallback.
    pub fn with_defaults() -> Self {
        Self::defaults(true)
    }

    /// The built-in parsers, with the text fallback on or off.
    pub fn defaults(fallback_to_text: bool) -> Self {
        let mut parsers = Self::new();
        parsers
            .push(IntegerParser)
            .push(UnsignedParser)
            .push(FloatParser)
            .push(BoolParser)
            .push(HexParser)
            .push(TextParser)
            .set_fallback_to_text(fallback_to_text);
        parsers
    }

    /// Whether untyped values no parser claims are stored as raw text.
    pub fn fallback_to_text(&self) -> bool {
        self.fallback_to_text
    }

    pub fn set_fallback_to_text(&mut self, enabled: bool) -> &mut Self {
        self.fallback_to_text = enabled;
        self
    }

    /// Add `parser` with the lowest priority.
    pub fn push(&mut self, parser: impl ValueParser<S> + 'static) -> &mut Self {
        self.parsers.push(Box::new(parser));
        self
    }

    /// Add `parser` with the highest priority.
    pub fn prepend(&mut self, parser: impl ValueParser<S> + 'static) -> &mut Self {
        self.parsers.insert(0, Box::new(parser));
        self
    }

    /// Drop every parser called `name`. Returns whether any was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.parsers.len();
        self.parsers.retain(|parser| parser.name() != name);
        self.parsers.len() != before
    }

    pub fn names(&self) -> Vec<&str> {
        self.parsers.iter().map(|parser| parser.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }

    /// Route `value` to the first matching parser and store it at `target`.
    pub fn dispatch(
        &self,
        target: &Descriptor<'_, S>,
        explicit_type: Option<&str>,
        value: &str,
    ) -> Dispatch {
        let parser = match explicit_type {
            Some(ty) => self.parsers.iter().find(|p| p.match_type(ty)),
            None => self.parsers.iter().find(|p| p.match_value(value)),
        };
        let Some(parser) = parser else {
            if explicit_type.is_none() && self.fallback_to_text && store_text(target, value) {
                return Dispatch::Fallback;
            }
            debug!(key = %target.key(), ty = ?explicit_type, "no value parser matched");
            return Dispatch::Unmatched;
        };
        if parser.parse_into(target, explicit_type, value) {
            Dispatch::Written(parser.name().to_string())
        } else {
            debug!(
                key = %target.key(),
                parser = parser.name(),
                value,
                "value parser rejected value"
            );
            Dispatch::Rejected(parser.name().to_string())
        }
    }
}

impl<S: Storage> Default for ValueParsers<S> {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl<S: Storage> fmt::Debug for ValueParsers<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueParsers")
            .field("parsers", &self.names())
            .field("fallback_to_text", &self.fallback_to_text)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_key::StrFamily;
    use arbor_store::DedicatedStorage;

    type StrStore = DedicatedStorage<StrFamily>;

    // --- Shapes ---

    #[test]
    fn integer_shape() {
        assert!(is_integer("8080"));
        assert!(is_integer("-12"));
        assert!(!is_integer("-"));
        assert!(!is_integer(""));
        assert!(!is_integer("1.5"));
        assert!(!is_integer("+3"));
    }

    #[test]
    fn float_shape() {
        let parser = FloatParser;
        let claims = |v: &str| ValueParser::<StrStore>::match_value(&parser, v);
        assert!(claims("1.5"));
        assert!(claims("-2e10"));
        assert!(!claims("42"));
        assert!(!claims("127.0.0.1"));
        assert!(!claims("inf"));
        assert!(!claims("e"));
    }

    #[test]
    fn type_names_ignore_case() {
        let parser = IntegerParser;
        assert!(ValueParser::<StrStore>::match_type(&parser, "INT"));
        assert!(!ValueParser::<StrStore>::match_type(&parser, "u64"));
    }

    // --- Dispatch ---

    #[test]
    fn untyped_values_go_by_shape() {
        let storage = StrStore::new();
        let root = Descriptor::root(&storage);
        let parsers = ValueParsers::<StrStore>::with_defaults();

        assert_eq!(
            parsers.dispatch(&root.child("n"), None, "-7"),
            Dispatch::Written("integer".into())
        );
        assert_eq!(
            parsers.dispatch(&root.child("f"), None, "0.25"),
            Dispatch::Written("float".into())
        );
        assert_eq!(
            parsers.dispatch(&root.child("t"), None, "true"),
            Dispatch::Fallback
        );
        assert_eq!(root.child("n").acquire::<i64>(), -7);
        assert_eq!(root.child("f").acquire::<f64>(), 0.25);
        assert_eq!(root.child("t").acquire::<String>(), "true");
    }

    #[test]
    fn typed_values_go_by_type() {
        let storage = StrStore::new();
        let root = Descriptor::root(&storage);
        let parsers = ValueParsers::<StrStore>::with_defaults();

        parsers.dispatch(&root.child("b"), Some("bool"), "yes");
        parsers.dispatch(&root.child("u"), Some("u64"), "18446744073709551615");
        parsers.dispatch(&root.child("h"), Some("hex"), "deadbeef");
        parsers.dispatch(&root.child("s"), Some("string"), "42");

        assert!(root.child("b").acquire::<bool>());
        assert_eq!(root.child("u").acquire::<u64>(), u64::MAX);
        assert_eq!(root.child("h").read_bytes(), vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(root.child("s").acquire::<String>(), "42");
    }

    #[test]
    fn unknown_type_leaves_key_absent() {
        let storage = StrStore::new();
        let root = Descriptor::root(&storage);
        let parsers = ValueParsers::<StrStore>::with_defaults();
        let outcome = parsers.dispatch(&root.child("x"), Some("duration"), "5s");
        assert_eq!(outcome, Dispatch::Unmatched);
        assert!(!root.child("x").exists());
    }

    #[test]
    fn rejected_value_leaves_key_absent() {
        let storage = StrStore::new();
        let root = Descriptor::root(&storage);
        let parsers = ValueParsers::<StrStore>::with_defaults();
        let outcome = parsers.dispatch(&root.child("x"), Some("int"), "twelve");
        assert_eq!(outcome, Dispatch::Rejected("integer".into()));
        assert!(!root.child("x").exists());
    }

    #[test]
    fn integer_shape_must_fit_i64() {
        let storage = StrStore::new();
        let root = Descriptor::root(&storage);
        let parsers = ValueParsers::<StrStore>::with_defaults();
        assert!(!ValueParser::<StrStore>::match_value(&IntegerParser, "12345678901234567890"));

        let outcome = parsers.dispatch(&root.child("id"), None, "12345678901234567890");
        assert_eq!(outcome, Dispatch::Fallback);
        assert_eq!(root.child("id").acquire::<String>(), "12345678901234567890");

        let outcome = parsers.dispatch(&root.child("min"), None, "-9223372036854775808");
        assert_eq!(outcome, Dispatch::Written("integer".into()));
        assert_eq!(root.child("min").acquire::<i64>(), i64::MIN);
    }

    #[test]
    fn untyped_leftovers_fall_back_to_text() {
        let storage = StrStore::new();
        let root = Descriptor::root(&storage);
        let mut parsers = ValueParsers::<StrStore>::new();
        parsers.push(IntegerParser);

        assert_eq!(
            parsers.dispatch(&root.child("debug"), None, "true"),
            Dispatch::Fallback
        );
        assert_eq!(root.child("debug").acquire::<String>(), "true");

        assert_eq!(
            parsers.dispatch(&root.child("typed"), Some("bool"), "true"),
            Dispatch::Unmatched
        );
        assert!(!root.child("typed").exists());

        parsers.set_fallback_to_text(false);
        assert_eq!(
            parsers.dispatch(&root.child("off"), None, "true"),
            Dispatch::Unmatched
        );
        assert!(!root.child("off").exists());
    }

    #[test]
    fn registry_editing() {
        let mut parsers = ValueParsers::<StrStore>::defaults(false);
        assert!(!parsers.fallback_to_text());
        assert_eq!(
            parsers.names(),
            vec!["integer", "unsigned", "float", "bool", "hex", "text"]
        );
        assert!(parsers.remove("float"));
        assert!(!parsers.remove("float"));
        assert!(parsers.remove("text"));
        parsers.prepend(TextParser);
        assert_eq!(parsers.names()[0], "text");
        assert_eq!(parsers.len(), 5);
        assert_eq!(
            format!("{parsers:?}"),
            r#"ValueParsers { parsers: ["text", "integer", "unsigned", "bool", "hex"], fallback_to_text: false }"#
        );
    }

    #[test]
    fn prepended_parser_shadows_builtin() {
        struct Doubling;

        impl ValueParser<StrStore> for Doubling {
            fn name(&self) -> &str {
                "doubling"
            }

            fn match_type(&self, _: &str) -> bool {
                false
            }

            fn match_value(&self, value: &str) -> bool {
                is_integer(value)
            }

            fn parse_into(
                &self,
                target: &Descriptor<'_, StrStore>,
                _: Option<&str>,
                value: &str,
            ) -> bool {
                value
                    .parse::<i64>()
                    .map(|n| target.store(&(n * 2)))
                    .unwrap_or(false)
            }
        }

        let storage = StrStore::new();
        let root = Descriptor::root(&storage);
        let mut parsers = ValueParsers::with_defaults();
        parsers.prepend(Doubling);
        parsers.dispatch(&root, None, "21");
        assert_eq!(root.acquire::<i64>(), 42);
    }
}
