//! Hierarchical keys for the Arbor tree store.
//!
//! Every value in an Arbor storage lives at a *key*: a path of words. A
//! [`Family`] fixes the word type and the family-local rules (how an array
//! index or a name becomes a word, and how a word is incremented). Keys of
//! every family share one shape, [`Path`], which composes by concatenation
//! and orders lexicographically.
//!
//! # Families
//!
//! - [`IntFamily`] -- `u64` words; names resolve to a BLAKE3-derived word
//! - [`StrFamily`] -- `String` words; names resolve to themselves
//!
//! # Wrappers
//!
//! Wrappers are values that are not keys but denote one. The [`Resolve`]
//! trait turns a wrapper into a key of a given family. Wrappers compose
//! with `/` before they are resolved:
//!
//! ```
//! use arbor_key::{name, resolve, Index, StrFamily};
//!
//! let wrapper = name("servers") / Index(2) / "port";
//! let key = resolve::<StrFamily, _>(&wrapper);
//! assert_eq!(key.to_string(), "servers/2/port");
//! ```

pub mod error;
pub mod family;
pub mod hash;
pub mod path;
pub mod wrapper;

pub use error::{KeyError, KeyResult};
pub use family::{Family, IntFamily, Key, StrFamily};
pub use hash::{hash_name, hash_name_in, NAME_HASH_DOMAIN};
pub use path::{FixedPath, Path};
pub use wrapper::{name, resolve, Index, Join, Name, Resolve};
