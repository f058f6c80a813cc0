//! Key families.
//!
//! A [`Family`] is a zero-sized marker bundling the word type of its keys
//! with the family-local encodings: how an array index becomes a word, how a
//! name becomes a word, and how a word is incremented. Composition and
//! ordering come from [`Path`] and are the same for every family.

use std::fmt;
use std::hash::Hash;

use crate::error::{KeyError, KeyResult};
use crate::hash::hash_name;
use crate::path::Path;

/// Key of family `F`.
pub type Key<F> = Path<<F as Family>::Word>;

/// A class of keys sharing composition and ordering rules.
pub trait Family: Copy + Default + fmt::Debug + Send + Sync + 'static {
    /// Path element type.
    type Word: Clone + Ord + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static;

    /// Human-readable family name, used in logs.
    const NAME: &'static str;

    /// Word naming the `index`-th array element.
    fn index_word(index: u64) -> Self::Word;

    /// Word a textual name resolves to in this family.
    fn name_word(name: &str) -> Self::Word;

    /// Smallest word of the family.
    fn min_word() -> Self::Word;

    /// Smallest word strictly greater than `word`, if one exists.
    fn successor(word: &Self::Word) -> Option<Self::Word>;

    /// The empty key.
    fn identity() -> Key<Self> {
        Path::new()
    }

    /// Concatenate two keys.
    fn compose(a: &Key<Self>, b: &Key<Self>) -> Key<Self> {
        a.join(b)
    }

    /// Length-one key naming the `index`-th array element.
    fn array_index(index: u64) -> Key<Self> {
        Path::single(Self::index_word(index))
    }

    /// Length-one key for a textual name.
    fn name(name: &str) -> Key<Self> {
        Path::single(Self::name_word(name))
    }

    /// Smallest key strictly greater than `key` obtained by incrementing its
    /// last word.
    ///
    /// The identity key advances to `[min_word]`. A last word with no
    /// successor keeps its place and `min_word` is appended, which is still
    /// the smallest strictly greater key.
    fn next(key: &Key<Self>) -> Key<Self> {
        let mut out = key.clone();
        match out.last_mut() {
            None => out.push(Self::min_word()),
            Some(last) => match Self::successor(last) {
                Some(word) => *last = word,
                None => out.push(Self::min_word()),
            },
        }
        out
    }

    /// Resolve `"a/b/c"` segment by segment through [`Family::name_word`].
    fn parse_names(text: &str) -> KeyResult<Key<Self>> {
        if text.is_empty() {
            return Ok(Path::new());
        }
        text.split('/')
            .enumerate()
            .map(|(position, segment)| {
                if segment.is_empty() {
                    Err(KeyError::EmptySegment {
                        input: text.to_string(),
                        position,
                    })
                } else {
                    Ok(Self::name_word(segment))
                }
            })
            .collect()
    }
}

/// Integer-path family: `u64` words, hashed names.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct IntFamily;

impl Family for IntFamily {
    type Word = u64;

    const NAME: &'static str = "int";

    fn index_word(index: u64) -> u64 {
        index
    }

    fn name_word(name: &str) -> u64 {
        hash_name(name)
    }

    fn min_word() -> u64 {
        0
    }

    fn successor(word: &u64) -> Option<u64> {
        word.checked_add(1)
    }
}

/// String-path family: `String` words, names resolve to themselves and
/// array indices to their decimal form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct StrFamily;

impl Family for StrFamily {
    type Word = String;

    const NAME: &'static str = "str";

    fn index_word(index: u64) -> String {
        index.to_string()
    }

    fn name_word(name: &str) -> String {
        name.to_owned()
    }

    fn min_word() -> String {
        String::new()
    }

    /// The immediate lexicographic successor: `word` followed by `'\0'`.
    fn successor(word: &String) -> Option<String> {
        let mut next = String::with_capacity(word.len() + 1);
        next.push_str(word);
        next.push('\0');
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // --- Integer family ---

    #[test]
    fn int_array_index_is_numeric() {
        assert_eq!(IntFamily::array_index(7), Path::single(7));
    }

    #[test]
    fn int_next_increments_last() {
        let k: Key<IntFamily> = Path::from_words(vec![4, 9]);
        assert_eq!(IntFamily::next(&k), Path::from_words(vec![4, 10]));
    }

    #[test]
    fn int_next_on_identity() {
        assert_eq!(IntFamily::next(&IntFamily::identity()), Path::single(0));
    }

    #[test]
    fn int_next_on_overflow_appends() {
        let k: Key<IntFamily> = Path::single(u64::MAX);
        let next = IntFamily::next(&k);
        assert_eq!(next, Path::from_words(vec![u64::MAX, 0]));
        assert!(next > k);
    }

    #[test]
    fn int_names_hash() {
        assert_eq!(IntFamily::name("port"), Path::single(hash_name("port")));
    }

    // --- String family ---

    #[test]
    fn str_array_index_is_decimal() {
        assert_eq!(StrFamily::array_index(12), Path::single("12".to_string()));
    }

    #[test]
    fn str_next_is_immediate_successor() {
        let k: Key<StrFamily> = Path::single("a".to_string());
        let next = StrFamily::next(&k);
        assert!(next > k);
        assert!(next < Path::single("a\u{1}".to_string()));
        assert!(next < Path::single("b".to_string()));
    }

    #[test]
    fn parse_names_resolves_each_segment() {
        let k = StrFamily::parse_names("config/server").unwrap();
        assert_eq!(k.to_string(), "config/server");

        let ik = IntFamily::parse_names("config/server").unwrap();
        assert_eq!(
            ik,
            Path::from_words(vec![hash_name("config"), hash_name("server")])
        );

        assert!(StrFamily::parse_names("a//b").is_err());
        assert!(StrFamily::parse_names("").unwrap().is_empty());
    }

    proptest! {
        #[test]
        fn compose_has_identity(words in proptest::collection::vec("[a-z]{0,4}", 0..6)) {
            let k: Key<StrFamily> = Path::from_words(words);
            prop_assert_eq!(StrFamily::compose(&StrFamily::identity(), &k), k.clone());
            prop_assert_eq!(StrFamily::compose(&k, &StrFamily::identity()), k);
        }

        #[test]
        fn compose_is_associative(
            a in proptest::collection::vec(any::<u64>(), 0..4),
            b in proptest::collection::vec(any::<u64>(), 0..4),
            c in proptest::collection::vec(any::<u64>(), 0..4),
        ) {
            let (a, b, c): (Key<IntFamily>, Key<IntFamily>, Key<IntFamily>) =
                (Path::from_words(a), Path::from_words(b), Path::from_words(c));
            prop_assert_eq!(
                IntFamily::compose(&IntFamily::compose(&a, &b), &c),
                IntFamily::compose(&a, &IntFamily::compose(&b, &c))
            );
        }

        #[test]
        fn next_is_strictly_greater(words in proptest::collection::vec(any::<u64>(), 0..5)) {
            let k: Key<IntFamily> = Path::from_words(words);
            prop_assert!(IntFamily::next(&k) > k);
        }

        #[test]
        fn str_next_is_strictly_greater(words in proptest::collection::vec("[a-z0-9]{0,4}", 0..5)) {
            let k: Key<StrFamily> = Path::from_words(words);
            prop_assert!(StrFamily::next(&k) > k);
        }
    }
}
