//! Source combinators.
//!
//! Attaching a handle re-roots a source, attaching data replaces its payload
//! and attaching a child merges one more `(key, source)` pair into its
//! children at the ordered position.

use std::cmp::Ordering;
use std::iter::Peekable;
use std::marker::PhantomData;

use arbor_key::{Key, Resolve};
use arbor_store::{Descriptor, EntryOutput, Storage};

use crate::error::BuildResult;
use crate::source::{Children, Source};

/// Combinator methods for every source.
///
/// The storage type rides along in each combinator so it can be inferred
/// from the eventual `build` call.
pub trait SourceExt<S: Storage>: Source<S> + Sized {
    /// Root this source at `handle` instead of its own handle.
    fn with_handle<R: Resolve<S::Family>>(self, handle: R) -> WithHandle<Self, R, S> {
        WithHandle {
            inner: self,
            handle,
            storage: PhantomData,
        }
    }

    /// Replace this source's payload with the output of `data`.
    fn with_data<D: FnMut(&mut dyn EntryOutput)>(self, data: D) -> WithData<Self, D, S> {
        WithData {
            inner: self,
            data,
            storage: PhantomData,
        }
    }

    /// Merge `child` at `key` into this source's children.
    fn with_child<R, C>(self, key: R, child: C) -> WithChild<Self, R, C, S>
    where
        R: Resolve<S::Family>,
        C: Source<S>,
    {
        WithChild {
            inner: self,
            key,
            child: Some(child),
            storage: PhantomData,
        }
    }
}

impl<S: Storage, T: Source<S>> SourceExt<S> for T {}

// ---------------------------------------------------------------------------
// WithHandle
// ---------------------------------------------------------------------------

/// A source re-rooted at a fixed handle.
pub struct WithHandle<T, R, S> {
    inner: T,
    handle: R,
    storage: PhantomData<fn() -> S>,
}

impl<S, T, R> Source<S> for WithHandle<T, R, S>
where
    S: Storage,
    T: Source<S>,
    R: Resolve<S::Family>,
{
    fn build_custom(&mut self, target: &Descriptor<'_, S>) -> Option<BuildResult<()>> {
        self.inner.build_custom(&target.child(&self.handle))
    }

    fn handle(&self) -> Option<Key<S::Family>> {
        Some(self.handle.resolve())
    }

    fn has_data(&self) -> bool {
        self.inner.has_data()
    }

    fn write_data(&mut self, output: &mut dyn EntryOutput) {
        self.inner.write_data(output)
    }

    fn children(&mut self) -> Option<Children<'_, S>> {
        self.inner.children()
    }
}

// ---------------------------------------------------------------------------
// WithData
// ---------------------------------------------------------------------------

/// A source whose payload comes from a closure.
///
/// The inner source's custom build, if any, is bypassed.
pub struct WithData<T, D, S> {
    inner: T,
    data: D,
    storage: PhantomData<fn() -> S>,
}

impl<S, T, D> Source<S> for WithData<T, D, S>
where
    S: Storage,
    T: Source<S>,
    D: FnMut(&mut dyn EntryOutput),
{
    fn handle(&self) -> Option<Key<S::Family>> {
        self.inner.handle()
    }

    fn has_data(&self) -> bool {
        true
    }

    fn write_data(&mut self, output: &mut dyn EntryOutput) {
        (self.data)(output)
    }

    fn children(&mut self) -> Option<Children<'_, S>> {
        self.inner.children()
    }
}

// ---------------------------------------------------------------------------
// WithChild
// ---------------------------------------------------------------------------

/// A source with one extra child merged into its ordered children.
///
/// When the inner source yields a key equal to the attached one, the
/// attached child replaces it.
pub struct WithChild<T, R, C, S> {
    inner: T,
    key: R,
    child: Option<C>,
    storage: PhantomData<fn() -> S>,
}

impl<S, T, R, C> Source<S> for WithChild<T, R, C, S>
where
    S: Storage,
    T: Source<S>,
    R: Resolve<S::Family>,
    C: Source<S>,
{
    fn build_custom(&mut self, target: &Descriptor<'_, S>) -> Option<BuildResult<()>> {
        self.inner.build_custom(target)
    }

    fn handle(&self) -> Option<Key<S::Family>> {
        self.inner.handle()
    }

    fn has_data(&self) -> bool {
        self.inner.has_data()
    }

    fn write_data(&mut self, output: &mut dyn EntryOutput) {
        self.inner.write_data(output)
    }

    fn children<'a>(&'a mut self) -> Option<Children<'a, S>> {
        let extra = self.child.take().map(|child| {
            let child: Box<dyn Source<S> + 'a> = Box::new(child);
            (self.key.resolve(), child)
        });
        let inner = self.inner.children();
        match (inner, extra) {
            (inner, None) => inner,
            (inner, Some(extra)) => Some(Box::new(MergeChild {
                inner: inner.map(Iterator::peekable),
                extra: Some(extra),
            })),
        }
    }
}

/// Inner children up to the extra key, then the extra child, then the rest.
struct MergeChild<I: Iterator> {
    inner: Option<Peekable<I>>,
    extra: Option<I::Item>,
}

impl<I, K, V> Iterator for MergeChild<I>
where
    I: Iterator<Item = (K, V)>,
    K: Ord,
{
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        let order = match (&self.extra, self.inner.as_mut().and_then(Peekable::peek)) {
            (None, _) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some((extra, _)), Some((next, _))) => next.cmp(extra),
        };
        match order {
            Ordering::Less => self.inner.as_mut()?.next(),
            Ordering::Equal => {
                self.inner.as_mut().and_then(Iterator::next);
                self.extra.take()
            }
            Ordering::Greater => self.extra.take(),
        }
    }
}
