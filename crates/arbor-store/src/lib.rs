//! Keyed entry storage for the Arbor tree store.
//!
//! # Architecture
//!
//! - [`Storage`] maps keys of one [`Family`](arbor_key::Family) to
//!   [`Entry`] payloads and creates entries on first access.
//! - [`DedicatedStorage`] is the reference backend: a `BTreeMap` of
//!   individually allocated buffers.
//! - [`Descriptor`] is a `{storage, base key}` cursor with child navigation
//!   and typed reads and writes.
//! - [`TypeToBytes`] / [`BytesToType`] select how a type is encoded, either
//!   as bytes in one entry or as a subtree of entries.
//!
//! ```
//! use arbor_key::{name, StrFamily};
//! use arbor_store::{DedicatedStorage, Descriptor};
//!
//! let storage = DedicatedStorage::<StrFamily>::new();
//! let root = Descriptor::root(&storage);
//! root.child(&(name("apa") / "pes")).set(1337i32);
//! assert_eq!((&root / "apa" / "pes").acquire::<i32>(), 1337);
//! ```

pub mod convert;
pub mod descriptor;
pub mod entry;
pub mod error;
pub mod storage;

pub use convert::{Bincode, BytesToType, Endian, Json, Mode, RawBytes, TypeToBytes};
pub use descriptor::Descriptor;
pub use entry::{DedicatedEntry, Entry, EntryInput, EntryOutput, EntryWriter};
pub use error::{StoreError, StoreResult};
pub use storage::{DedicatedStorage, Storage};
