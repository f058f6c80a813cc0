//! Indented-text front-end for the Arbor tree store.
//!
//! Each non-blank line names a node, optionally declares a type after `:`
//! and optionally carries a value after `>>`. Indentation (tabs or
//! `indent_width` spaces) nests a line under the previous one.
//!
//! ```text
//! config
//!     server
//!         port: int >> 8080
//!         host >> "127.0.0.1"
//!     debug >> true
//! ```
//!
//! [`parse_str`] turns text into an [`AstNode`] tree, [`AstNode::to_text`]
//! renders it back, and [`materialize`] writes it into storage through a
//! [`ValueParsers`] registry.
//!
//! ```
//! use arbor_key::StrFamily;
//! use arbor_store::{DedicatedStorage, Descriptor};
//! use arbor_text::{materialize, parse_str, ValueParsers};
//!
//! let ast = parse_str("server\n    port: int >> 8080\n").unwrap();
//! let storage = DedicatedStorage::<StrFamily>::new();
//! let root = Descriptor::root(&storage);
//! materialize(&ast, &root, &ValueParsers::with_defaults());
//! assert_eq!((&root / "server" / "port").acquire::<i64>(), 8080);
//! ```

pub mod ast;
pub mod config;
pub mod error;
pub mod lexer;
pub mod materialize;
pub mod parser;
pub mod value;

pub use ast::{quote, AstNode};
pub use config::ParserConfig;
pub use error::{ParseError, ParseErrorKind, TextError, TextResult};
pub use lexer::{lex, lex_line, Line};
pub use materialize::{materialize, MaterializeReport};
pub use parser::{parse_file, parse_stream, parse_str, Parser};
pub use value::{
    BoolParser, Dispatch, FloatParser, HexParser, IntegerParser, TextParser, UnsignedParser,
    ValueParser, ValueParsers,
};
