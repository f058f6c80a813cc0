//! Cursors over a storage subtree.
//!
//! A [`Descriptor`] pairs a borrowed storage with a base key. Navigation
//! composes keys, and typed reads and writes route through the conversion
//! traits in [`crate::convert`]: binary conversions receive a stream over
//! the entry at the base key, structural ones receive the descriptor itself.

use std::collections::BTreeSet;
use std::fmt;
use std::ops::{Div, Range};

use arbor_key::{Family, Index, Key, KeyResult, Path, Resolve};
use arbor_stream::{OutputStream, ReservableOutputStream, SizedStream, Stream};

use crate::convert::{BytesToType, Mode, TypeToBytes};
use crate::entry::{Entry, EntryInput, EntryOutput};
use crate::error::{StoreError, StoreResult};
use crate::storage::Storage;

/// `{storage, base key}` cursor.
///
/// Two descriptors are equal iff they borrow the same storage and have equal
/// base keys.
pub struct Descriptor<'s, S: Storage> {
    storage: &'s S,
    base: Key<S::Family>,
}

impl<'s, S: Storage> Descriptor<'s, S> {
    pub fn new(storage: &'s S, base: Key<S::Family>) -> Self {
        Self { storage, base }
    }

    /// Descriptor at the identity key.
    pub fn root(storage: &'s S) -> Self {
        Self::new(storage, Path::new())
    }

    pub fn storage(&self) -> &'s S {
        self.storage
    }

    pub fn key(&self) -> &Key<S::Family> {
        &self.base
    }

    // --- Navigation ---

    /// Descriptor at `compose(base, resolve(fragment))`.
    pub fn child<R: Resolve<S::Family> + ?Sized>(&self, fragment: &R) -> Self {
        self.join_key(&fragment.resolve())
    }

    /// Descriptor at `compose(base, key)`.
    pub fn join_key(&self, key: &Key<S::Family>) -> Self {
        Self::new(self.storage, S::Family::compose(&self.base, key))
    }

    /// Descriptor at the `index`-th array element below this one.
    pub fn index(&self, index: u64) -> Self {
        self.child(&Index(index))
    }

    /// Descriptor at a `/`-separated path of names below this one.
    pub fn at(&self, path: &str) -> KeyResult<Self> {
        Ok(self.join_key(&S::Family::parse_names(path)?))
    }

    /// Descriptor one level up, or `None` at the identity key.
    pub fn parent(&self) -> Option<Self> {
        self.base
            .parent()
            .map(|base| Self::new(self.storage, base))
    }

    /// Descriptors for the array elements in `range`.
    pub fn elements(&self, range: Range<u64>) -> impl Iterator<Item = Descriptor<'s, S>> + 's
    where
        S: 's,
    {
        let base = self.clone();
        range.map(move |index| base.index(index))
    }

    /// Direct children that hold an entry or a subtree, ascending by key.
    pub fn children(&self) -> Vec<Self> {
        let depth = self.base.len();
        let words: BTreeSet<_> = self
            .storage
            .keys_under(&self.base)
            .into_iter()
            .filter_map(|key| key.words().get(depth).cloned())
            .collect();
        words
            .into_iter()
            .map(|word| self.join_key(&Path::single(word)))
            .collect()
    }

    // --- Presence ---

    /// Whether an entry exists at the base key. Never creates.
    pub fn exists(&self) -> bool {
        self.storage.exists(&self.base)
    }

    /// Whether anything is stored strictly below the base key.
    pub fn has_subtree(&self) -> bool {
        self.storage.has_descendants(&self.base)
    }

    /// Remove the entry at the base key, leaving descendants alone.
    pub fn remove(&self) -> bool {
        self.storage.remove(&self.base)
    }

    /// Remove the entry at the base key and every descendant. Returns the
    /// number of entries removed.
    pub fn remove_subtree(&self) -> usize {
        self.storage
            .keys_under(&self.base)
            .iter()
            .filter(|key| self.storage.remove(key))
            .count()
    }

    // --- Raw access ---

    /// Run `f` over a reader on the entry, creating the entry if absent.
    pub fn with_reader<R>(&self, f: impl FnOnce(&mut dyn EntryInput) -> R) -> R {
        let entry = self.storage.acquire(&self.base);
        let mut reader = entry.reader();
        f(&mut reader)
    }

    /// Run `f` over a fresh writer on the entry, creating it if absent.
    pub fn with_writer<R>(&self, f: impl FnOnce(&mut dyn EntryOutput) -> R) -> R {
        let mut entry = self.storage.acquire(&self.base);
        let mut writer = entry.writer();
        f(&mut writer)
    }

    pub fn read_bytes(&self) -> Vec<u8> {
        self.with_reader(|reader| {
            let mut out = vec![0u8; reader.length()];
            reader.read(&mut out);
            out
        })
    }

    /// Replace the payload. Returns the writer's validity.
    pub fn write_bytes(&self, bytes: &[u8]) -> bool {
        self.with_writer(|writer| {
            writer.reserve(bytes.len());
            writer.write(bytes);
            writer.valid()
        })
    }

    // --- Typed access ---

    /// Store `value` with default conversion options.
    pub fn store<T: TypeToBytes + ?Sized>(&self, value: &T) -> bool {
        self.store_with(value, &T::Options::default())
    }

    /// Store `value`. Binary conversions write the entry; structural ones
    /// write through this descriptor. Returns `false` if a binary writer
    /// ended invalid.
    pub fn store_with<T: TypeToBytes + ?Sized>(&self, value: &T, options: &T::Options) -> bool {
        match T::MODE {
            Mode::Binary => self.with_writer(|writer| {
                value.write_to(writer, options);
                writer.valid()
            }),
            Mode::Structural => {
                value.write_tree(self, options);
                true
            }
        }
    }

    /// Assignment-style store.
    pub fn set<T: TypeToBytes>(&self, value: T) {
        self.store(&value);
    }

    /// Read a `T`, or its default when the entry is missing or does not
    /// decode. A binary read creates an empty entry if none exists.
    pub fn acquire<T: BytesToType + Default>(&self) -> T {
        self.decode().unwrap_or_default()
    }

    pub fn acquire_with<T: BytesToType + Default>(&self, options: &T::Options) -> T {
        self.decode_with(options).unwrap_or_default()
    }

    /// Read a `T` with default options; `None` if it does not decode.
    pub fn decode<T: BytesToType>(&self) -> Option<T> {
        self.decode_with(&T::Options::default())
    }

    pub fn decode_with<T: BytesToType>(&self, options: &T::Options) -> Option<T> {
        match T::MODE {
            Mode::Binary => self.with_reader(|reader| T::read_from(reader, options)),
            Mode::Structural => T::read_tree(self, options),
        }
    }

    /// Read a `T`, distinguishing a missing key from a failed decode.
    /// Never creates an entry.
    pub fn try_acquire<T: BytesToType>(&self) -> StoreResult<T> {
        if !self.exists() && !self.has_subtree() {
            return Err(StoreError::NotFound {
                key: self.base.to_string(),
            });
        }
        self.decode().ok_or_else(|| StoreError::Decode {
            key: self.base.to_string(),
            type_name: std::any::type_name::<T>(),
        })
    }
}

impl<S: Storage> Clone for Descriptor<'_, S> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage,
            base: self.base.clone(),
        }
    }
}

impl<S: Storage> PartialEq for Descriptor<'_, S> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.storage, other.storage) && self.base == other.base
    }
}

impl<S: Storage> Eq for Descriptor<'_, S> {}

impl<S: Storage> fmt::Debug for Descriptor<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("family", &<S::Family as Family>::NAME)
            .field("key", &self.base)
            .finish()
    }
}

impl<'s, S: Storage, R: Resolve<S::Family>> Div<R> for &Descriptor<'s, S> {
    type Output = Descriptor<'s, S>;

    fn div(self, rhs: R) -> Descriptor<'s, S> {
        self.child(&rhs)
    }
}

impl<'s, S: Storage, R: Resolve<S::Family>> Div<R> for Descriptor<'s, S> {
    type Output = Descriptor<'s, S>;

    fn div(self, rhs: R) -> Descriptor<'s, S> {
        self.child(&rhs)
    }
}
