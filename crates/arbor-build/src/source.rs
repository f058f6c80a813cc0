//! The build-source protocol.

use arbor_key::Key;
use arbor_store::{Descriptor, EntryOutput, Storage};

use crate::error::BuildResult;

/// Lazy, ordered `(child key, child source)` sequence.
///
/// The builder materialises each child before pulling the next one, so a
/// source may hold per-child state across yields. Dropping the iterator
/// early releases whatever it holds.
pub type Children<'a, S> =
    Box<dyn Iterator<Item = (Key<<S as Storage>::Family>, Box<dyn Source<S> + 'a>)> + 'a>;

/// Something that can be materialised into a storage.
///
/// Every capability is optional; the defaults advertise none of them.
/// See [`build`](crate::build) for the order in which they are consulted.
pub trait Source<S: Storage> {
    /// Replace the default build entirely. Return `None` to decline.
    fn build_custom(&mut self, target: &Descriptor<'_, S>) -> Option<BuildResult<()>> {
        let _ = target;
        None
    }

    /// Key, relative to the target, at which this source's contribution is
    /// rooted.
    fn handle(&self) -> Option<Key<S::Family>> {
        None
    }

    /// Whether [`Source::write_data`] should be called.
    fn has_data(&self) -> bool {
        false
    }

    /// Write this source's payload to the entry at its root.
    fn write_data(&mut self, output: &mut dyn EntryOutput) {
        let _ = output;
    }

    /// Children in strictly ascending key order.
    fn children(&mut self) -> Option<Children<'_, S>> {
        None
    }
}

impl<S: Storage, T: Source<S> + ?Sized> Source<S> for &mut T {
    fn build_custom(&mut self, target: &Descriptor<'_, S>) -> Option<BuildResult<()>> {
        (**self).build_custom(target)
    }

    fn handle(&self) -> Option<Key<S::Family>> {
        (**self).handle()
    }

    fn has_data(&self) -> bool {
        (**self).has_data()
    }

    fn write_data(&mut self, output: &mut dyn EntryOutput) {
        (**self).write_data(output)
    }

    fn children(&mut self) -> Option<Children<'_, S>> {
        (**self).children()
    }
}

impl<S: Storage, T: Source<S> + ?Sized> Source<S> for Box<T> {
    fn build_custom(&mut self, target: &Descriptor<'_, S>) -> Option<BuildResult<()>> {
        (**self).build_custom(target)
    }

    fn handle(&self) -> Option<Key<S::Family>> {
        (**self).handle()
    }

    fn has_data(&self) -> bool {
        (**self).has_data()
    }

    fn write_data(&mut self, output: &mut dyn EntryOutput) {
        (**self).write_data(output)
    }

    fn children(&mut self) -> Option<Children<'_, S>> {
        (**self).children()
    }
}
