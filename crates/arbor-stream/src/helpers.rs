use crate::sink::Sink;
use crate::traits::{AlignableStream, InputStream, OutputStream, SizedStream};

/// Size of the intermediate buffer used by [`copy`].
pub const COPY_BUFFER_SIZE: usize = 4096;

/// Seek forward the fewest bytes that make `offset()` a multiple of
/// `alignment`. Returns the number of bytes skipped, always in
/// `0..alignment`.
///
/// Alignments of 0 and 1 are no-ops.
pub fn align<S: AlignableStream + ?Sized>(stream: &mut S, alignment: usize) -> usize {
    if alignment <= 1 {
        return 0;
    }
    let pad = (alignment - stream.offset() % alignment) % alignment;
    if pad > 0 {
        stream.seek(pad);
    }
    pad
}

/// Transfer `n` bytes from `input` to `output` through a fixed buffer.
///
/// Returns the number of bytes that reached `output`. Stops early when
/// either side goes invalid.
pub fn copy<I, O>(input: &mut I, output: &mut O, n: usize) -> usize
where
    I: InputStream + ?Sized,
    O: OutputStream + ?Sized,
{
    let mut buf = [0u8; COPY_BUFFER_SIZE];
    let mut copied = 0;
    while copied < n {
        let chunk = (n - copied).min(COPY_BUFFER_SIZE);
        input.read(&mut buf[..chunk]);
        if !input.valid() {
            break;
        }
        output.write(&buf[..chunk]);
        if !output.valid() {
            break;
        }
        copied += chunk;
    }
    copied
}

/// Read everything left in a sized input stream.
pub fn read_remaining<I: InputStream + SizedStream + ?Sized>(input: &mut I) -> Vec<u8> {
    let mut out = vec![0u8; input.length()];
    input.read(&mut out);
    out
}

/// Read exactly `N` bytes, or `None` if the stream overran.
pub fn read_array<const N: usize, I: InputStream + ?Sized>(input: &mut I) -> Option<[u8; N]> {
    let mut out = [0u8; N];
    input.read(&mut out);
    input.valid().then_some(out)
}

/// Count the bytes an encoder would write, without storing them.
pub fn measure(encode: impl FnOnce(&mut dyn OutputStream)) -> usize {
    let mut sink = Sink::new();
    encode(&mut sink);
    sink.offset()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slice::SliceReader;
    use crate::traits::Stream;
    use crate::vec::VecWriter;
    use proptest::prelude::*;

    #[test]
    fn align_pads_to_boundary() {
        let mut w = VecWriter::new();
        w.write(b"abc");
        assert_eq!(align(&mut w, 8), 5);
        assert_eq!(w.offset(), 8);
        assert_eq!(align(&mut w, 8), 0);
    }

    #[test]
    fn align_trivial_alignments() {
        let mut w = VecWriter::new();
        w.write(b"abc");
        assert_eq!(align(&mut w, 0), 0);
        assert_eq!(align(&mut w, 1), 0);
        assert_eq!(w.offset(), 3);
    }

    #[test]
    fn copy_spans_multiple_chunks() {
        let data: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
        let mut r = SliceReader::new(&data);
        let mut w = VecWriter::new();
        assert_eq!(copy(&mut r, &mut w, data.len()), data.len());
        assert_eq!(w.as_slice(), &data[..]);
    }

    #[test]
    fn copy_stops_on_short_input() {
        let mut r = SliceReader::new(b"abc");
        let mut w = VecWriter::new();
        assert_eq!(copy(&mut r, &mut w, 10), 0);
        assert!(!r.valid());
        assert!(w.is_empty());
    }

    #[test]
    fn read_remaining_and_array() {
        let mut r = SliceReader::new(b"\x01\x02rest");
        assert_eq!(read_array::<2, _>(&mut r), Some([1, 2]));
        assert_eq!(read_remaining(&mut r), b"rest".to_vec());
        assert_eq!(read_array::<1, _>(&mut r), None);
    }

    #[test]
    fn measure_counts_encoded_bytes() {
        let n = measure(|out| {
            out.write(b"hello");
            out.seek(3);
        });
        assert_eq!(n, 8);
    }

    proptest! {
        #[test]
        fn align_lands_on_multiple(start in 0usize..512, alignment in 1usize..64) {
            let mut w = VecWriter::new();
            w.seek(start);
            let skipped = align(&mut w, alignment);
            prop_assert_eq!(w.offset() % alignment, 0);
            prop_assert!(skipped < alignment);
            prop_assert_eq!(w.offset(), start + skipped);
        }
    }
}
