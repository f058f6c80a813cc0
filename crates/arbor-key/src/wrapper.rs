//! Wrappers and their resolution into keys.
//!
//! A wrapper carries the intent to denote a key without being one. Resolution
//! is a two-step pipeline: every wrapper first reduces to a family-native key,
//! then the keys compose. Composite wrappers built with `/` stay unresolved
//! until a family is chosen.

use std::ops::Div;

use crate::family::{Family, Key};
use crate::path::{FixedPath, Path};

/// Turns a wrapper into a key of family `F`.
///
/// Implement this for your own wrapper types to extend key resolution.
pub trait Resolve<F: Family> {
    fn resolve(&self) -> Key<F>;
}

/// Resolve `wrapper` under family `F`.
pub fn resolve<F: Family, R: Resolve<F> + ?Sized>(wrapper: &R) -> Key<F> {
    wrapper.resolve()
}

/// A textual name wrapper.
///
/// Resolves to a one-word string key in [`StrFamily`](crate::StrFamily) and
/// to a hashed integer key in [`IntFamily`](crate::IntFamily).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name<'a>(pub &'a str);

/// Shorthand for [`Name`].
pub fn name(text: &str) -> Name<'_> {
    Name(text)
}

/// An array index wrapper; resolves through [`Family::array_index`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Index(pub u64);

/// Deferred composition of two wrappers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Join<A, B>(pub A, pub B);

impl<F: Family> Resolve<F> for Path<F::Word> {
    fn resolve(&self) -> Key<F> {
        self.clone()
    }
}

impl<F: Family, const N: usize> Resolve<F> for FixedPath<F::Word, N> {
    fn resolve(&self) -> Key<F> {
        self.to_path()
    }
}

impl<F: Family> Resolve<F> for str {
    fn resolve(&self) -> Key<F> {
        F::name(self)
    }
}

impl<F: Family> Resolve<F> for String {
    fn resolve(&self) -> Key<F> {
        F::name(self)
    }
}

impl<F: Family> Resolve<F> for Name<'_> {
    fn resolve(&self) -> Key<F> {
        F::name(self.0)
    }
}

impl<F: Family> Resolve<F> for Index {
    fn resolve(&self) -> Key<F> {
        F::array_index(self.0)
    }
}

impl<F: Family, A: Resolve<F>, B: Resolve<F>> Resolve<F> for Join<A, B> {
    fn resolve(&self) -> Key<F> {
        let mut key = self.0.resolve();
        key.extend_from(self.1.resolve());
        key
    }
}

impl<F: Family, R: Resolve<F> + ?Sized> Resolve<F> for &R {
    fn resolve(&self) -> Key<F> {
        (**self).resolve()
    }
}

impl<'a, R> Div<R> for Name<'a> {
    type Output = Join<Name<'a>, R>;

    fn div(self, rhs: R) -> Self::Output {
        Join(self, rhs)
    }
}

impl<R> Div<R> for Index {
    type Output = Join<Index, R>;

    fn div(self, rhs: R) -> Self::Output {
        Join(self, rhs)
    }
}

impl<A, B, R> Div<R> for Join<A, B> {
    type Output = Join<Join<A, B>, R>;

    fn div(self, rhs: R) -> Self::Output {
        Join(self, rhs)
    }
}
