//! Key paths.
//!
//! A [`Path`] is an ordered sequence of words. Composition is concatenation,
//! the empty path is the identity, and the derived ordering is lexicographic
//! on words (a proper prefix sorts before any of its extensions).

use std::fmt;
use std::ops::Div;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::KeyError;

/// Dynamic-length key path.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path<W> {
    words: Vec<W>,
}

impl<W> Path<W> {
    /// The identity path.
    pub const fn new() -> Self {
        Self { words: Vec::new() }
    }

    /// A length-one path.
    pub fn single(word: W) -> Self {
        Self { words: vec![word] }
    }

    pub fn from_words(words: Vec<W>) -> Self {
        Self { words }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[W] {
        &self.words
    }

    pub fn into_words(self) -> Vec<W> {
        self.words
    }

    pub fn first(&self) -> Option<&W> {
        self.words.first()
    }

    pub fn last(&self) -> Option<&W> {
        self.words.last()
    }

    pub fn last_mut(&mut self) -> Option<&mut W> {
        self.words.last_mut()
    }

    pub fn push(&mut self, word: W) {
        self.words.push(word);
    }

    pub fn pop(&mut self) -> Option<W> {
        self.words.pop()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, W> {
        self.words.iter()
    }

    /// Word view of a length-one path.
    ///
    /// A single-word key embeds transparently into its word type.
    pub fn as_word(&self) -> Option<&W> {
        match self.words.as_slice() {
            [word] => Some(word),
            _ => None,
        }
    }

    /// Append every word of `other` in place.
    pub fn extend_from(&mut self, other: Path<W>) {
        self.words.extend(other.words);
    }
}

impl<W: Clone> Path<W> {
    /// Compose `self` with `other` (concatenation).
    pub fn join(&self, other: &Path<W>) -> Path<W> {
        let mut words = Vec::with_capacity(self.words.len() + other.words.len());
        words.extend_from_slice(&self.words);
        words.extend_from_slice(&other.words);
        Path { words }
    }

    /// The path with its last word removed, or `None` for the identity.
    pub fn parent(&self) -> Option<Path<W>> {
        match self.words.split_last() {
            Some((_, rest)) => Some(Path {
                words: rest.to_vec(),
            }),
            None => None,
        }
    }

    /// Remaining words after `prefix`, if `prefix` is a prefix of `self`.
    pub fn strip_prefix(&self, prefix: &Path<W>) -> Option<Path<W>>
    where
        W: PartialEq,
    {
        self.words
            .strip_prefix(prefix.words.as_slice())
            .map(|rest| Path {
                words: rest.to_vec(),
            })
    }
}

impl<W: PartialEq> Path<W> {
    pub fn starts_with(&self, prefix: &Path<W>) -> bool {
        self.words.starts_with(&prefix.words)
    }
}

impl<W> From<Vec<W>> for Path<W> {
    fn from(words: Vec<W>) -> Self {
        Self { words }
    }
}

impl<W, const N: usize> From<[W; N]> for Path<W> {
    fn from(words: [W; N]) -> Self {
        Self {
            words: Vec::from(words),
        }
    }
}

impl<W, const N: usize> From<FixedPath<W, N>> for Path<W> {
    fn from(path: FixedPath<W, N>) -> Self {
        Self {
            words: Vec::from(path.words),
        }
    }
}

impl<W> FromIterator<W> for Path<W> {
    fn from_iter<I: IntoIterator<Item = W>>(iter: I) -> Self {
        Self {
            words: iter.into_iter().collect(),
        }
    }
}

impl<W> IntoIterator for Path<W> {
    type Item = W;
    type IntoIter = std::vec::IntoIter<W>;

    fn into_iter(self) -> Self::IntoIter {
        self.words.into_iter()
    }
}

impl<'a, W> IntoIterator for &'a Path<W> {
    type Item = &'a W;
    type IntoIter = std::slice::Iter<'a, W>;

    fn into_iter(self) -> Self::IntoIter {
        self.words.iter()
    }
}

impl<W: Clone> Div<&Path<W>> for &Path<W> {
    type Output = Path<W>;

    fn div(self, rhs: &Path<W>) -> Path<W> {
        self.join(rhs)
    }
}

impl<W> Div<Path<W>> for Path<W> {
    type Output = Path<W>;

    fn div(mut self, rhs: Path<W>) -> Path<W> {
        self.extend_from(rhs);
        self
    }
}

impl<W: fmt::Display> fmt::Display for Path<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, word) in self.words.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{word}")?;
        }
        Ok(())
    }
}

/// Parses `"a/b/c"`. The empty string is the identity path.
impl<W> FromStr for Path<W>
where
    W: FromStr,
    W::Err: fmt::Display,
{
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Path::new());
        }
        s.split('/')
            .enumerate()
            .map(|(position, segment)| {
                if segment.is_empty() {
                    return Err(KeyError::EmptySegment {
                        input: s.to_string(),
                        position,
                    });
                }
                segment
                    .parse::<W>()
                    .map_err(|e| KeyError::InvalidSegment {
                        segment: segment.to_string(),
                        position,
                        reason: e.to_string(),
                    })
            })
            .collect()
    }
}

/// Static-length key path.
///
/// Semantically identical to a [`Path`] with the same words; only the
/// storage differs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FixedPath<W, const N: usize> {
    words: [W; N],
}

impl<W, const N: usize> FixedPath<W, N> {
    pub const fn new(words: [W; N]) -> Self {
        Self { words }
    }

    pub const fn len(&self) -> usize {
        N
    }

    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    pub fn words(&self) -> &[W] {
        &self.words
    }

    /// Dynamic copy of this path.
    pub fn to_path(&self) -> Path<W>
    where
        W: Clone,
    {
        Path::from_words(self.words.to_vec())
    }
}

impl<W: fmt::Display, const N: usize> fmt::Display for FixedPath<W, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, word) in self.words.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{word}")?;
        }
        Ok(())
    }
}
