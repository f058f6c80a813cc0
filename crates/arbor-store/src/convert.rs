//! Type conversions between values and entries.
//!
//! [`TypeToBytes`] and [`BytesToType`] form an open registry keyed on the
//! value type. Each side declares a [`Mode`]:
//!
//! - **Binary** conversions see a stream over the entry at the descriptor's
//!   base key.
//! - **Structural** conversions see the descriptor and may decompose the
//!   value into children.
//!
//! The `Options` associated type carries per-call extras such as byte order.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use arbor_stream::{read_array, read_remaining, SizedStream};

use crate::descriptor::Descriptor;
use crate::entry::{EntryInput, EntryOutput};
use crate::storage::Storage;

/// How a conversion reaches the storage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Binary,
    Structural,
}

/// Byte order for scalar conversions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Endian {
    #[default]
    Little,
    Big,
}

/// Encode a value into an entry (binary) or a subtree (structural).
pub trait TypeToBytes {
    type Options: Default;

    const MODE: Mode = Mode::Binary;

    /// Binary encoding. Called with a fresh writer on the target entry.
    fn write_to(&self, output: &mut dyn EntryOutput, options: &Self::Options) {
        let _ = (output, options);
    }

    /// Structural encoding. Called with the target descriptor.
    fn write_tree<S: Storage>(&self, target: &Descriptor<'_, S>, options: &Self::Options) {
        let _ = (target, options);
    }
}

/// Decode a value from an entry (binary) or a subtree (structural).
///
/// Returning `None` makes `Descriptor::acquire` fall back to the default.
pub trait BytesToType: Sized {
    type Options: Default;

    const MODE: Mode = Mode::Binary;

    fn read_from(input: &mut dyn EntryInput, options: &Self::Options) -> Option<Self> {
        let _ = (input, options);
        None
    }

    fn read_tree<S: Storage>(source: &Descriptor<'_, S>, options: &Self::Options) -> Option<Self> {
        let _ = (source, options);
        None
    }
}

fn put(output: &mut dyn EntryOutput, bytes: &[u8]) {
    output.reserve(bytes.len());
    output.write(bytes);
}

// --- Scalars ---

macro_rules! endian_scalars {
    ($($ty:ty),* $(,)?) => {$(
        impl TypeToBytes for $ty {
            type Options = Endian;

            fn write_to(&self, output: &mut dyn EntryOutput, endian: &Endian) {
                let bytes = match endian {
                    Endian::Little => self.to_le_bytes(),
                    Endian::Big => self.to_be_bytes(),
                };
                put(output, &bytes);
            }
        }

        impl BytesToType for $ty {
            type Options = Endian;

            fn read_from(input: &mut dyn EntryInput, endian: &Endian) -> Option<Self> {
                let bytes = read_array(input)?;
                Some(match endian {
                    Endian::Little => <$ty>::from_le_bytes(bytes),
                    Endian::Big => <$ty>::from_be_bytes(bytes),
                })
            }
        }
    )*};
}

endian_scalars!(u8, u16, u32, u64, u128, i8, i16, i32, i64, i128, f32, f64);

/// `usize` travels as `u64`.
impl TypeToBytes for usize {
    type Options = Endian;

    fn write_to(&self, output: &mut dyn EntryOutput, endian: &Endian) {
        (*self as u64).write_to(output, endian);
    }
}

impl BytesToType for usize {
    type Options = Endian;

    fn read_from(input: &mut dyn EntryInput, endian: &Endian) -> Option<Self> {
        u64::read_from(input, endian).and_then(|v| usize::try_from(v).ok())
    }
}

/// `isize` travels as `i64`.
impl TypeToBytes for isize {
    type Options = Endian;

    fn write_to(&self, output: &mut dyn EntryOutput, endian: &Endian) {
        (*self as i64).write_to(output, endian);
    }
}

impl BytesToType for isize {
    type Options = Endian;

    fn read_from(input: &mut dyn EntryInput, endian: &Endian) -> Option<Self> {
        i64::read_from(input, endian).and_then(|v| isize::try_from(v).ok())
    }
}

impl TypeToBytes for bool {
    type Options = ();

    fn write_to(&self, output: &mut dyn EntryOutput, _: &()) {
        put(output, &[u8::from(*self)]);
    }
}

impl BytesToType for bool {
    type Options = ();

    fn read_from(input: &mut dyn EntryInput, _: &()) -> Option<Self> {
        match read_array::<1, _>(input)? {
            [0] => Some(false),
            [1] => Some(true),
            _ => None,
        }
    }
}

/// `char` travels as its `u32` scalar value.
impl TypeToBytes for char {
    type Options = Endian;

    fn write_to(&self, output: &mut dyn EntryOutput, endian: &Endian) {
        u32::from(*self).write_to(output, endian);
    }
}

impl BytesToType for char {
    type Options = Endian;

    fn read_from(input: &mut dyn EntryInput, endian: &Endian) -> Option<Self> {
        u32::read_from(input, endian).and_then(char::from_u32)
    }
}

// --- Text and bytes ---

/// Raw UTF-8; the length is the entry length.
impl TypeToBytes for str {
    type Options = ();

    fn write_to(&self, output: &mut dyn EntryOutput, _: &()) {
        put(output, self.as_bytes());
    }
}

impl TypeToBytes for String {
    type Options = ();

    fn write_to(&self, output: &mut dyn EntryOutput, options: &()) {
        self.as_str().write_to(output, options);
    }
}

impl BytesToType for String {
    type Options = ();

    fn read_from(input: &mut dyn EntryInput, _: &()) -> Option<Self> {
        String::from_utf8(read_remaining(input)).ok()
    }
}

impl TypeToBytes for [u8] {
    type Options = ();

    fn write_to(&self, output: &mut dyn EntryOutput, _: &()) {
        put(output, self);
    }
}

/// Uninterpreted entry bytes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct RawBytes(pub Vec<u8>);

impl TypeToBytes for RawBytes {
    type Options = ();

    fn write_to(&self, output: &mut dyn EntryOutput, _: &()) {
        put(output, &self.0);
    }
}

impl BytesToType for RawBytes {
    type Options = ();

    fn read_from(input: &mut dyn EntryInput, _: &()) -> Option<Self> {
        let remaining = input.length();
        let bytes = read_remaining(input);
        (bytes.len() == remaining).then_some(RawBytes(bytes))
    }
}

impl<T: TypeToBytes + ?Sized> TypeToBytes for &T {
    type Options = T::Options;

    const MODE: Mode = T::MODE;

    fn write_to(&self, output: &mut dyn EntryOutput, options: &Self::Options) {
        (**self).write_to(output, options);
    }

    fn write_tree<S: Storage>(&self, target: &Descriptor<'_, S>, options: &Self::Options) {
        (**self).write_tree(target, options);
    }
}

// --- Structural containers ---

/// The element count is a `u64` at the base key and elements live at
/// `array_index(0..len)`. Stale trailing elements are removed on store.
impl<T: TypeToBytes> TypeToBytes for Vec<T> {
    type Options = T::Options;

    const MODE: Mode = Mode::Structural;

    fn write_tree<S: Storage>(&self, target: &Descriptor<'_, S>, options: &T::Options) {
        target.store(&(self.len() as u64));
        for (index, item) in (0u64..).zip(self.iter()) {
            target.index(index).store_with(item, options);
        }
        let mut index = self.len() as u64;
        loop {
            let stale = target.index(index);
            if stale.remove_subtree() == 0 {
                break;
            }
            index += 1;
        }
    }
}

/// Reads exactly the stored count of elements. A missing count reads as
/// empty.
impl<T: BytesToType> BytesToType for Vec<T> {
    type Options = T::Options;

    const MODE: Mode = Mode::Structural;

    fn read_tree<S: Storage>(source: &Descriptor<'_, S>, options: &T::Options) -> Option<Self> {
        if !source.exists() {
            return Some(Vec::new());
        }
        let len: u64 = source.decode()?;
        (0..len)
            .map(|index| source.index(index).decode_with(options))
            .collect()
    }
}

/// `None` clears the subtree; `Some(v)` stores `v` at the same key.
impl<T: TypeToBytes> TypeToBytes for Option<T> {
    type Options = T::Options;

    const MODE: Mode = Mode::Structural;

    fn write_tree<S: Storage>(&self, target: &Descriptor<'_, S>, options: &T::Options) {
        match self {
            Some(value) => {
                target.store_with(value, options);
            }
            None => {
                target.remove_subtree();
            }
        }
    }
}

/// Absent key and subtree read as `None`.
impl<T: BytesToType> BytesToType for Option<T> {
    type Options = T::Options;

    const MODE: Mode = Mode::Structural;

    fn read_tree<S: Storage>(source: &Descriptor<'_, S>, options: &T::Options) -> Option<Self> {
        if !source.exists() && !source.has_subtree() {
            return Some(None);
        }
        source.decode_with(options).map(Some)
    }
}

// --- Serde-backed ---

/// Stores `T` with `bincode`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Bincode<T>(pub T);

impl<T: Serialize> TypeToBytes for Bincode<T> {
    type Options = ();

    fn write_to(&self, output: &mut dyn EntryOutput, _: &()) {
        match bincode::serialize(&self.0) {
            Ok(bytes) => put(output, &bytes),
            Err(error) => warn!(
                %error,
                type_name = std::any::type_name::<T>(),
                "bincode encode failed"
            ),
        }
    }
}

impl<T: DeserializeOwned> BytesToType for Bincode<T> {
    type Options = ();

    fn read_from(input: &mut dyn EntryInput, _: &()) -> Option<Self> {
        let bytes = read_remaining(input);
        if bytes.is_empty() {
            return None;
        }
        match bincode::deserialize(&bytes) {
            Ok(value) => Some(Bincode(value)),
            Err(error) => {
                warn!(
                    %error,
                    type_name = std::any::type_name::<T>(),
                    "bincode decode failed"
                );
                None
            }
        }
    }
}

/// Stores `T` as JSON text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Json<T>(pub T);

impl<T: Serialize> TypeToBytes for Json<T> {
    type Options = ();

    fn write_to(&self, output: &mut dyn EntryOutput, _: &()) {
        match serde_json::to_vec(&self.0) {
            Ok(bytes) => put(output, &bytes),
            Err(error) => warn!(
                %error,
                type_name = std::any::type_name::<T>(),
                "json encode failed"
            ),
        }
    }
}

impl<T: DeserializeOwned> BytesToType for Json<T> {
    type Options = ();

    fn read_from(input: &mut dyn EntryInput, _: &()) -> Option<Self> {
        let bytes = read_remaining(input);
        if bytes.is_empty() {
            return None;
        }
        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(Json(value)),
            Err(error) => {
                warn!(
                    %error,
                    type_name = std::any::type_name::<T>(),
                    "json decode failed"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DedicatedStorage;
    use arbor_key::{IntFamily, StrFamily};
    use arbor_stream::{SliceReader, VecWriter};
    use serde::Deserialize;

    fn encode<T: TypeToBytes + ?Sized>(value: &T, options: &T::Options) -> Vec<u8> {
        let mut out = VecWriter::new();
        value.write_to(&mut out, options);
        out.into_inner()
    }

    fn decode<T: BytesToType>(bytes: &[u8], options: &T::Options) -> Option<T> {
        T::read_from(&mut SliceReader::new(bytes), options)
    }

    // --- Scalars ---

    #[test]
    fn endian_option_controls_byte_order() {
        assert_eq!(encode(&0x0102_0304u32, &Endian::Little), [4, 3, 2, 1]);
        assert_eq!(encode(&0x0102_0304u32, &Endian::Big), [1, 2, 3, 4]);
        assert_eq!(decode::<u32>(&[1, 2, 3, 4], &Endian::Big), Some(0x0102_0304));
    }

    #[test]
    fn short_entry_does_not_decode() {
        assert_eq!(decode::<u64>(&[1, 2, 3], &Endian::Little), None);
        assert_eq!(decode::<i32>(&[], &Endian::Little), None);
    }

    #[test]
    fn usize_is_64_bit() {
        assert_eq!(encode(&7usize, &Endian::Little).len(), 8);
        assert_eq!(encode(&-7isize, &Endian::Little).len(), 8);
        assert_eq!(decode::<usize>(&encode(&7usize, &Endian::Little), &Endian::Little), Some(7));
    }

    #[test]
    fn bool_rejects_other_bytes() {
        assert_eq!(decode::<bool>(&[1], &()), Some(true));
        assert_eq!(decode::<bool>(&[0], &()), Some(false));
        assert_eq!(decode::<bool>(&[2], &()), None);
    }

    #[test]
    fn char_validates_scalar_value() {
        assert_eq!(decode::<char>(&encode(&'λ', &Endian::Little), &Endian::Little), Some('λ'));
        assert_eq!(decode::<char>(&0xD800u32.to_le_bytes(), &Endian::Little), None);
    }

    // --- Text and bytes ---

    #[test]
    fn strings_are_raw_utf8() {
        assert_eq!(encode("héllo", &()), "héllo".as_bytes());
        assert_eq!(decode::<String>(b"abc", &()), Some("abc".to_string()));
        assert_eq!(decode::<String>(&[0xff, 0xfe], &()), None);
    }

    #[test]
    fn raw_bytes_take_whole_entry() {
        assert_eq!(encode(&b"\x00\x01"[..], &()), [0, 1]);
        assert_eq!(decode::<RawBytes>(&[9, 8, 7], &()), Some(RawBytes(vec![9, 8, 7])));
    }

    #[test]
    fn references_forward() {
        let value = 5u16;
        assert_eq!(encode(&&value, &Endian::Big), [0, 5]);
        assert_eq!(<&Vec<u8> as TypeToBytes>::MODE, Mode::Structural);
    }

    // --- Structural ---

    #[test]
    fn vec_decomposes_into_elements() {
        let storage = DedicatedStorage::<StrFamily>::new();
        let d = Descriptor::root(&storage).child("list");
        d.set(vec![10u32, 20, 30]);
        assert_eq!(d.acquire::<u64>(), 3);
        assert_eq!(d.at("1").unwrap().acquire::<u32>(), 20);
        assert_eq!(d.acquire::<Vec<u32>>(), vec![10, 20, 30]);

        d.set(vec![1u32]);
        assert_eq!(d.acquire::<Vec<u32>>(), vec![1]);
        assert_eq!(storage.len(), 2);
    }

    #[test]
    fn nested_vecs_keep_empty_rows() {
        let storage = DedicatedStorage::<StrFamily>::new();
        let d = Descriptor::root(&storage).child("grid");
        let grid = vec![vec![1i8, 2], vec![], vec![3]];
        d.store(&grid);
        assert_eq!(d.acquire::<Vec<Vec<i8>>>(), grid);
    }

    #[test]
    fn empty_vec_is_distinct_from_none() {
        let storage = DedicatedStorage::<StrFamily>::new();
        let d = Descriptor::root(&storage).child("maybe");
        d.set(Some(Vec::<u16>::new()));
        assert_eq!(d.acquire::<Option<Vec<u16>>>(), Some(vec![]));

        d.set(None::<Vec<u16>>);
        assert_eq!(d.acquire::<Option<Vec<u16>>>(), None);
    }

    #[test]
    fn absent_elements_inside_a_vec() {
        let storage = DedicatedStorage::<IntFamily>::new();
        let d = Descriptor::root(&storage).child("sparse");
        let sparse = vec![Some(1u8), None, Some(3)];
        d.store(&sparse);
        assert_eq!(d.acquire::<Vec<Option<u8>>>(), sparse);
    }

    #[test]
    fn missing_vec_reads_empty() {
        let storage = DedicatedStorage::<StrFamily>::new();
        let d = Descriptor::root(&storage).child("none");
        assert_eq!(d.acquire::<Vec<u8>>(), Vec::<u8>::new());
        assert!(storage.is_empty());
    }

    #[test]
    fn option_clears_and_restores() {
        let storage = DedicatedStorage::<StrFamily>::new();
        let d = Descriptor::root(&storage).child("maybe");
        assert_eq!(d.acquire::<Option<u8>>(), None);
        assert!(!d.exists());

        d.set(Some(4u8));
        assert_eq!(d.acquire::<Option<u8>>(), Some(4));

        d.set(None::<u8>);
        assert!(!d.exists());
        assert_eq!(d.acquire::<Option<u8>>(), None);
    }

    // --- Serde-backed ---

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Endpoint {
        host: String,
        port: u16,
    }

    #[test]
    fn bincode_and_json_round_trip() {
        let storage = DedicatedStorage::<StrFamily>::new();
        let root = Descriptor::root(&storage);
        let endpoint = Endpoint {
            host: "localhost".into(),
            port: 8080,
        };

        root.child("bin").store(&Bincode(&endpoint));
        root.child("json").store(&Json(&endpoint));

        assert_eq!(root.child("bin").acquire::<Bincode<Endpoint>>().0, endpoint);
        assert_eq!(
            root.child("json").read_bytes(),
            br#"{"host":"localhost","port":8080}"#
        );
        assert_eq!(root.child("json").acquire::<Json<Endpoint>>().0, endpoint);
    }

    #[test]
    fn corrupt_json_falls_back_to_default() {
        let subscriber = tracing_subscriber::fmt().with_test_writer().finish();
        tracing::subscriber::with_default(subscriber, || {
            let storage = DedicatedStorage::<StrFamily>::new();
            let d = Descriptor::root(&storage).child("json");
            d.write_bytes(b"{not json");
            assert_eq!(d.acquire::<Json<Endpoint>>(), Json(Endpoint::default()));
            assert!(d.decode::<Json<Endpoint>>().is_none());
        });
    }
}
