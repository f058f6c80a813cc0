//! Ready-made sources.

use std::fmt;

use arbor_key::{Family, Key, Path, Resolve};
use arbor_store::{Descriptor, Endian, EntryOutput, Mode, Storage, TypeToBytes};

use crate::error::BuildResult;
use crate::source::{Children, Source};

// ---------------------------------------------------------------------------
// Empty
// ---------------------------------------------------------------------------

/// Advertises nothing. A starting point for combinators.
#[derive(Clone, Copy, Debug, Default)]
pub struct Empty;

impl<S: Storage> Source<S> for Empty {}

// ---------------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------------

/// A single value stored through its conversion.
///
/// Binary conversions become a data source; structural ones build through
/// the descriptor.
pub struct Value<T: TypeToBytes> {
    value: T,
    options: T::Options,
}

impl<T: TypeToBytes> Value<T> {
    pub fn new(value: T) -> Self {
        Self::with_options(value, T::Options::default())
    }

    pub fn with_options(value: T, options: T::Options) -> Self {
        Self { value, options }
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T: TypeToBytes + fmt::Debug> fmt::Debug for Value<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Value").field(&self.value).finish()
    }
}

impl<S: Storage, T: TypeToBytes> Source<S> for Value<T> {
    fn build_custom(&mut self, target: &Descriptor<'_, S>) -> Option<BuildResult<()>> {
        match T::MODE {
            Mode::Binary => None,
            Mode::Structural => {
                self.value.write_tree(target, &self.options);
                Some(Ok(()))
            }
        }
    }

    fn has_data(&self) -> bool {
        T::MODE == Mode::Binary
    }

    fn write_data(&mut self, output: &mut dyn EntryOutput) {
        self.value.write_to(output, &self.options);
    }
}

// ---------------------------------------------------------------------------
// Sequence
// ---------------------------------------------------------------------------

/// Explicit list of children, yielded in insertion order.
///
/// Keys are not sorted: pushing out of order makes the build fail.
pub struct Sequence<'a, S: Storage> {
    entries: Vec<(Key<S::Family>, Box<dyn Source<S> + 'a>)>,
}

impl<'a, S: Storage> Sequence<'a, S> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append `source` at `key`.
    pub fn push<R, T>(&mut self, key: R, source: T) -> &mut Self
    where
        R: Resolve<S::Family>,
        T: Source<S> + 'a,
    {
        self.entries.push((key.resolve(), Box::new(source)));
        self
    }

    /// Append `source` at the key following the last one, as given by
    /// [`Family::next`]. The first key is `next(identity)`.
    pub fn push_next<T: Source<S> + 'a>(&mut self, source: T) -> &mut Self {
        let key = match self.entries.last() {
            Some((last, _)) => S::Family::next(last),
            None => S::Family::next(&Path::new()),
        };
        self.entries.push((key, Box::new(source)));
        self
    }

    /// Builder-style [`Sequence::push`].
    pub fn child<R, T>(mut self, key: R, source: T) -> Self
    where
        R: Resolve<S::Family>,
        T: Source<S> + 'a,
    {
        self.push(key, source);
        self
    }

    /// Keys pushed so far, in push order.
    pub fn keys(&self) -> Vec<Key<S::Family>> {
        self.entries.iter().map(|(key, _)| key.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Storage> Default for Sequence<'_, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Storage> fmt::Debug for Sequence<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(key, _)| key))
            .finish()
    }
}

impl<'a, S: Storage> Source<S> for Sequence<'a, S> {
    fn children<'b>(&'b mut self) -> Option<Children<'b, S>> {
        let entries: Vec<(Key<S::Family>, Box<dyn Source<S> + 'b>)> = self
            .entries
            .drain(..)
            .map(|(key, source)| (key, source as Box<dyn Source<S> + 'b>))
            .collect();
        Some(Box::new(entries.into_iter()))
    }
}

// ---------------------------------------------------------------------------
// Elements
// ---------------------------------------------------------------------------

/// Values stored at `array_index(0..len)`, with the element count as a
/// `u64` at the root, the layout `Vec<T>` reads back.
///
/// Children are yielded in key order, which for decimal string keys is not
/// index order (`"10"` sorts before `"2"`).
#[derive(Clone, Debug)]
pub struct Elements<T> {
    items: Vec<T>,
}

impl<T> Elements<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }
}

impl<T> FromIterator<T> for Elements<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<S: Storage, T: TypeToBytes> Source<S> for Elements<T> {
    fn has_data(&self) -> bool {
        true
    }

    fn write_data(&mut self, output: &mut dyn EntryOutput) {
        (self.items.len() as u64).write_to(output, &Endian::default());
    }

    fn children<'b>(&'b mut self) -> Option<Children<'b, S>> {
        let mut pairs: Vec<(Key<S::Family>, Box<dyn Source<S> + 'b>)> = (0u64..)
            .zip(self.items.drain(..))
            .map(|(index, item)| {
                let source: Box<dyn Source<S> + 'b> = Box::new(Value::new(item));
                (S::Family::array_index(index), source)
            })
            .collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        Some(Box::new(pairs.into_iter()))
    }
}

// ---------------------------------------------------------------------------
// Custom
// ---------------------------------------------------------------------------

/// A source that is nothing but a custom build closure.
pub struct Custom<F>(pub F);

impl<S, F> Source<S> for Custom<F>
where
    S: Storage,
    F: FnMut(&Descriptor<'_, S>) -> BuildResult<()>,
{
    fn build_custom(&mut self, target: &Descriptor<'_, S>) -> Option<BuildResult<()>> {
        Some((self.0)(target))
    }
}

impl<F> fmt::Debug for Custom<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Custom(..)")
    }
}
