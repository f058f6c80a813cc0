//! Streams over the `bytes` crate's cursor traits.
//!
//! [`BytesReader`] wraps any [`Buf`] (a `Bytes`, a `&[u8]`, a chain of
//! buffers) and [`BytesWriter`] wraps any [`BufMut`] (a `BytesMut`, a
//! `Vec<u8>`, a `&mut [u8]`). These are the range-backed streams: the
//! bytes may live in several non-contiguous chunks. [`BytesPipe`] is a
//! first-in first-out buffer that is both an input and an output stream.

use bytes::{Buf, BufMut, BytesMut};

use crate::poly::Erasable;
use crate::traits::{
    AlignableStream, InputStream, OutputStream, ReservableOutputStream, SizedStream, Stream,
};

// ---------------------------------------------------------------------------
// BytesReader
// ---------------------------------------------------------------------------

/// Input stream over a [`Buf`].
#[derive(Clone, Debug)]
pub struct BytesReader<B> {
    inner: B,
    offset: usize,
    valid: bool,
}

impl<B: Buf> BytesReader<B> {
    /// Wrap a buffer.
    pub fn new(inner: B) -> Self {
        Self {
            inner,
            offset: 0,
            valid: true,
        }
    }

    /// Return the buffer, advanced past the consumed bytes.
    pub fn into_inner(self) -> B {
        self.inner
    }

    fn invalidate(&mut self) {
        let rest = self.inner.remaining();
        self.inner.advance(rest);
        self.valid = false;
    }
}

impl<B: Buf> Stream for BytesReader<B> {
    fn seek(&mut self, n: usize) {
        if !self.valid || n > self.inner.remaining() {
            self.invalidate();
            return;
        }
        self.inner.advance(n);
        self.offset += n;
    }

    fn valid(&self) -> bool {
        self.valid
    }
}

impl<B: Buf> SizedStream for BytesReader<B> {
    fn length(&self) -> usize {
        self.inner.remaining()
    }
}

impl<B: Buf> AlignableStream for BytesReader<B> {
    fn offset(&self) -> usize {
        self.offset
    }
}

impl<B: Buf> InputStream for BytesReader<B> {
    fn read(&mut self, dst: &mut [u8]) {
        if !self.valid || dst.len() > self.inner.remaining() {
            dst.fill(0);
            self.invalidate();
            return;
        }
        self.inner.copy_to_slice(dst);
        self.offset += dst.len();
    }
}

impl<B: Buf> Erasable for BytesReader<B> {
    fn as_sized(&self) -> Option<&dyn SizedStream> {
        Some(self)
    }

    fn as_alignable(&self) -> Option<&dyn AlignableStream> {
        Some(self)
    }

    fn as_input(&mut self) -> Option<&mut dyn InputStream> {
        Some(self)
    }
}

// ---------------------------------------------------------------------------
// BytesWriter
// ---------------------------------------------------------------------------

/// Output stream over a [`BufMut`].
///
/// `length` reports [`BufMut::remaining_mut`], which is effectively
/// unbounded for growable buffers.
#[derive(Debug)]
pub struct BytesWriter<B> {
    inner: B,
    offset: usize,
    valid: bool,
}

impl<B: BufMut> BytesWriter<B> {
    /// Wrap a buffer.
    pub fn new(inner: B) -> Self {
        Self {
            inner,
            offset: 0,
            valid: true,
        }
    }

    /// Return the buffer with everything written so far.
    pub fn into_inner(self) -> B {
        self.inner
    }
}

impl<B: BufMut> Stream for BytesWriter<B> {
    fn seek(&mut self, n: usize) {
        if !self.valid || n > self.inner.remaining_mut() {
            self.valid = false;
            return;
        }
        self.inner.put_bytes(0, n);
        self.offset += n;
    }

    fn valid(&self) -> bool {
        self.valid
    }
}

impl<B: BufMut> SizedStream for BytesWriter<B> {
    fn length(&self) -> usize {
        self.inner.remaining_mut()
    }
}

impl<B: BufMut> AlignableStream for BytesWriter<B> {
    fn offset(&self) -> usize {
        self.offset
    }
}

impl<B: BufMut> OutputStream for BytesWriter<B> {
    fn write(&mut self, src: &[u8]) {
        if !self.valid || src.len() > self.inner.remaining_mut() {
            self.valid = false;
            return;
        }
        self.inner.put_slice(src);
        self.offset += src.len();
    }
}

impl<B: BufMut> Erasable for BytesWriter<B> {
    fn as_sized(&self) -> Option<&dyn SizedStream> {
        Some(self)
    }

    fn as_alignable(&self) -> Option<&dyn AlignableStream> {
        Some(self)
    }

    fn as_output(&mut self) -> Option<&mut dyn OutputStream> {
        Some(self)
    }
}

// ---------------------------------------------------------------------------
// BytesPipe
// ---------------------------------------------------------------------------

/// Duplex stream: writes append to the back, reads consume from the front.
///
/// `length` is the number of unread bytes. `offset` counts bytes moved in
/// either direction. `seek` discards unread bytes.
#[derive(Clone, Debug)]
pub struct BytesPipe {
    buf: BytesMut,
    offset: usize,
    valid: bool,
}

impl BytesPipe {
    /// Create an empty pipe.
    pub fn new() -> Self {
        Self {
            buf: BytesMut::new(),
            offset: 0,
            valid: true,
        }
    }

    /// The unread bytes.
    pub fn unread(&self) -> &[u8] {
        &self.buf
    }
}

impl Default for BytesPipe {
    fn default() -> Self {
        Self::new()
    }
}

impl Stream for BytesPipe {
    fn seek(&mut self, n: usize) {
        if !self.valid || n > self.buf.len() {
            self.buf.clear();
            self.valid = false;
            return;
        }
        self.buf.advance(n);
        self.offset += n;
    }

    fn valid(&self) -> bool {
        self.valid
    }
}

impl SizedStream for BytesPipe {
    fn length(&self) -> usize {
        self.buf.len()
    }
}

impl AlignableStream for BytesPipe {
    fn offset(&self) -> usize {
        self.offset
    }
}

impl InputStream for BytesPipe {
    fn read(&mut self, dst: &mut [u8]) {
        if !self.valid || dst.len() > self.buf.len() {
            dst.fill(0);
            self.buf.clear();
            self.valid = false;
            return;
        }
        self.buf.copy_to_slice(dst);
        self.offset += dst.len();
    }
}

impl OutputStream for BytesPipe {
    fn write(&mut self, src: &[u8]) {
        if !self.valid {
            return;
        }
        self.buf.extend_from_slice(src);
        self.offset += src.len();
    }
}

impl ReservableOutputStream for BytesPipe {
    fn reserve(&mut self, n: usize) {
        self.buf.reserve(n);
    }
}

impl Erasable for BytesPipe {
    fn as_sized(&self) -> Option<&dyn SizedStream> {
        Some(self)
    }

    fn as_alignable(&self) -> Option<&dyn AlignableStream> {
        Some(self)
    }

    fn as_input(&mut self) -> Option<&mut dyn InputStream> {
        Some(self)
    }

    fn as_output(&mut self) -> Option<&mut dyn OutputStream> {
        Some(self)
    }

    fn as_reservable(&mut self) -> Option<&mut dyn ReservableOutputStream> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::{Bytes, BytesMut};

    #[test]
    fn reads_across_chained_chunks() {
        let chained = Bytes::from_static(b"abc").chain(Bytes::from_static(b"def"));
        let mut r = BytesReader::new(chained);
        let mut buf = [0u8; 4];
        r.read(&mut buf);
        assert_eq!(&buf, b"abcd");
        assert_eq!(r.length(), 2);
        assert_eq!(r.offset(), 4);
    }

    #[test]
    fn reader_seek_past_end() {
        let mut r = BytesReader::new(Bytes::from_static(b"ab"));
        r.seek(3);
        assert!(!r.valid());
        assert_eq!(r.length(), 0);
    }

    #[test]
    fn writer_into_bytes_mut() {
        let mut w = BytesWriter::new(BytesMut::new());
        w.write(b"xy");
        w.seek(1);
        w.write(b"z");
        assert_eq!(w.offset(), 4);
        assert_eq!(&w.into_inner()[..], b"xy\0z");
    }

    #[test]
    fn writer_into_fixed_slice_overflows() {
        let mut backing = [0u8; 2];
        let mut w = BytesWriter::new(&mut backing[..]);
        w.write(b"abc");
        assert!(!w.valid());
        assert_eq!(w.offset(), 0);
    }

    #[test]
    fn pipe_is_first_in_first_out() {
        let mut p = BytesPipe::new();
        p.write(b"hello");
        p.seek(1);
        let mut buf = [0u8; 3];
        p.read(&mut buf);
        assert_eq!(&buf, b"ell");
        assert_eq!(p.unread(), b"o");
        assert_eq!(p.offset(), 9);
        assert_eq!(p.length(), 1);
    }

    #[test]
    fn pipe_underflow_invalidates() {
        let mut p = BytesPipe::new();
        p.write(b"a");
        let mut buf = [0u8; 2];
        p.read(&mut buf);
        assert!(!p.valid());
        p.write(b"b");
        assert_eq!(p.length(), 0);
    }
}
