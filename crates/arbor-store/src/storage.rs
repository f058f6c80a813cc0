use std::cell::{RefCell, RefMut};
use std::collections::btree_map::{self, BTreeMap};
use std::fmt::{self, Write as _};
use std::ops::DerefMut;

use arbor_key::{Family, Key};
use tracing::trace;

use crate::entry::{DedicatedEntry, Entry};

/// Mapping from keys of one family to entries.
///
/// All implementations must satisfy these invariants:
/// - `acquire` creates a missing entry; it is the only read-path operation
///   with a side effect.
/// - `exists` never creates.
/// - The entry returned by `acquire` is the same one every later `acquire`
///   of the same key returns, until it is removed.
/// - Storage is single-threaded; at most one guard is alive at a time.
/// - Storage types own their entries and carry no borrowed data.
pub trait Storage: 'static {
    type Family: Family;
    type Entry: Entry;
    type Guard<'a>: DerefMut<Target = Self::Entry>
    where
        Self: 'a;

    /// Return the entry at `key`, creating an empty one if absent.
    ///
    /// # Panics
    ///
    /// Panics if a guard returned by an earlier call is still alive.
    fn acquire(&self, key: &Key<Self::Family>) -> Self::Guard<'_>;

    /// Whether an entry exists at exactly `key`.
    fn exists(&self, key: &Key<Self::Family>) -> bool;

    /// Remove the entry at `key`. Returns `true` if one existed.
    fn remove(&self, key: &Key<Self::Family>) -> bool;

    /// Every stored key that starts with `prefix` (including `prefix`
    /// itself), in ascending order.
    fn keys_under(&self, prefix: &Key<Self::Family>) -> Vec<Key<Self::Family>>;

    /// Whether any key strictly longer than `prefix` starts with it.
    ///
    /// Default implementation scans [`Storage::keys_under`]. Backends with
    /// ordered indexes should override it.
    fn has_descendants(&self, prefix: &Key<Self::Family>) -> bool {
        self.keys_under(prefix)
            .iter()
            .any(|key| key.len() > prefix.len())
    }

    /// Number of entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Reference backend: one heap buffer per key, keys in a `BTreeMap`.
pub struct DedicatedStorage<F: Family> {
    entries: RefCell<BTreeMap<Key<F>, DedicatedEntry>>,
}

impl<F: Family> DedicatedStorage<F> {
    pub fn new() -> Self {
        Self {
            entries: RefCell::new(BTreeMap::new()),
        }
    }

    /// Total payload bytes across all entries.
    pub fn total_bytes(&self) -> usize {
        self.entries.borrow().values().map(Entry::len).sum()
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    /// All keys, ascending.
    pub fn keys(&self) -> Vec<Key<F>> {
        self.entries.borrow().keys().cloned().collect()
    }

    /// Copy of the payload at `key`, without creating it.
    pub fn get_bytes(&self, key: &Key<F>) -> Option<Vec<u8>> {
        self.entries
            .borrow()
            .get(key)
            .map(|entry| entry.as_bytes().to_vec())
    }

    /// One line per entry, `key = hex`, ascending by key.
    pub fn dump(&self) -> String {
        let entries = self.entries.borrow();
        let mut out = String::new();
        for (key, entry) in entries.iter() {
            let _ = writeln!(out, "{key} = {}", hex::encode(entry.as_bytes()));
        }
        out
    }
}

impl<F: Family> Default for DedicatedStorage<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Family> Storage for DedicatedStorage<F> {
    type Family = F;
    type Entry = DedicatedEntry;
    type Guard<'a> = RefMut<'a, DedicatedEntry>;

    fn acquire(&self, key: &Key<F>) -> RefMut<'_, DedicatedEntry> {
        RefMut::map(self.entries.borrow_mut(), |entries| {
            match entries.entry(key.clone()) {
                btree_map::Entry::Occupied(slot) => slot.into_mut(),
                btree_map::Entry::Vacant(slot) => {
                    trace!(family = F::NAME, key = %key, "creating entry");
                    slot.insert(DedicatedEntry::default())
                }
            }
        })
    }

    fn exists(&self, key: &Key<F>) -> bool {
        self.entries.borrow().contains_key(key)
    }

    fn remove(&self, key: &Key<F>) -> bool {
        self.entries.borrow_mut().remove(key).is_some()
    }

    fn keys_under(&self, prefix: &Key<F>) -> Vec<Key<F>> {
        self.entries
            .borrow()
            .range(prefix.clone()..)
            .map(|(key, _)| key)
            .take_while(|key| key.starts_with(prefix))
            .cloned()
            .collect()
    }

    fn has_descendants(&self, prefix: &Key<F>) -> bool {
        self.entries
            .borrow()
            .range(prefix.clone()..)
            .map(|(key, _)| key)
            .take_while(|key| key.starts_with(prefix))
            .any(|key| key.len() > prefix.len())
    }

    fn len(&self) -> usize {
        self.entries.borrow().len()
    }
}

impl<F: Family> fmt::Debug for DedicatedStorage<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DedicatedStorage")
            .field("family", &F::NAME)
            .field("entry_count", &self.len())
            .field("total_bytes", &self.total_bytes())
            .finish()
    }
}
