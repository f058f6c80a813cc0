//! Ordered tree building for the Arbor tree store.
//!
//! A [`Source`] advertises any subset of four capabilities: a custom build,
//! a handle (its root key), a data payload, and an ordered sequence of
//! children. [`build`] walks a source depth-first, pulling one child at a
//! time and materialising it before resuming the parent, so storage sees
//! children exactly in the order they were yielded.
//!
//! Children must be yielded in strictly ascending key order; the combinators
//! in [`combinator`] preserve that when merging.
//!
//! ```
//! use arbor_build::{build, SourceExt, Sequence, Value};
//! use arbor_key::StrFamily;
//! use arbor_store::{DedicatedStorage, Descriptor};
//!
//! let storage = DedicatedStorage::<StrFamily>::new();
//! let mut source = Sequence::<DedicatedStorage<StrFamily>>::new()
//!     .child("a", Value::new(1u8))
//!     .child("c", Value::new(3u8))
//!     .with_child("b", Value::new(2u8));
//! let report = build(&mut source, &Descriptor::root(&storage)).unwrap();
//! assert_eq!(report.children_visited, 3);
//! ```

pub mod build;
pub mod combinator;
pub mod error;
pub mod source;
pub mod sources;

pub use build::{build, BuildReport};
pub use combinator::{SourceExt, WithChild, WithData, WithHandle};
pub use error::{BuildError, BuildResult};
pub use source::{Children, Source};
pub use sources::{Custom, Elements, Empty, Sequence, Value};
