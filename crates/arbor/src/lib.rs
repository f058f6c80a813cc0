//! Arbor: a hierarchically keyed tree store with an indented-text
//! configuration front-end.
//!
//! [`Arbor`] bundles an in-memory storage with a text parser and the value
//! parsers used to lower parsed text into typed entries. The building blocks
//! are re-exported for callers that need to go below the facade.
//!
//! ```
//! use arbor::Arbor;
//!
//! let tree = Arbor::<arbor::StrFamily>::new();
//! tree.load_str("server\n    port: int >> 8080\n    host >> localhost\n").unwrap();
//! assert_eq!(tree.at("server/port").unwrap().acquire::<i64>(), 8080);
//! assert_eq!(tree.at("server/host").unwrap().acquire::<String>(), "localhost");
//! ```

pub mod config;
pub mod error;
pub mod tree;

pub use config::ArborConfig;
pub use error::{ArborError, ArborResult};
pub use tree::Arbor;

// Re-export key types
pub use arbor_build::{build, BuildError, BuildReport, Source, SourceExt};
pub use arbor_key::{name, resolve, Family, Index, IntFamily, Key, Path, Resolve, StrFamily};
pub use arbor_store::{
    BytesToType, DedicatedStorage, Descriptor, Mode, Storage, StoreError, TypeToBytes,
};
pub use arbor_text::{
    AstNode, MaterializeReport, ParseError, ParserConfig, TextError, ValueParser, ValueParsers,
};

/// Lower-level crates.
pub use arbor_build as builder;
pub use arbor_key as key;
pub use arbor_store as store;
pub use arbor_stream as stream;
pub use arbor_text as text;
