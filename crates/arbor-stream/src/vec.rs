use crate::poly::Erasable;
use crate::traits::{AlignableStream, OutputStream, ReservableOutputStream, Stream};

/// Growable output stream backed by a `Vec<u8>`.
///
/// Never goes invalid. Seeking appends zero bytes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VecWriter {
    buf: Vec<u8>,
}

impl VecWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty writer with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// The bytes written so far.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Consume the writer and return its buffer.
    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

impl Stream for VecWriter {
    fn seek(&mut self, n: usize) {
        self.buf.resize(self.buf.len() + n, 0);
    }

    fn valid(&self) -> bool {
        true
    }
}

impl AlignableStream for VecWriter {
    fn offset(&self) -> usize {
        self.buf.len()
    }
}

impl OutputStream for VecWriter {
    fn write(&mut self, src: &[u8]) {
        self.buf.extend_from_slice(src);
    }
}

impl ReservableOutputStream for VecWriter {
    fn reserve(&mut self, n: usize) {
        self.buf.reserve(n);
    }
}

impl Erasable for VecWriter {
    fn as_alignable(&self) -> Option<&dyn AlignableStream> {
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

    #[test]
    fn writes_and_seeks_append() {
        let mut w = VecWriter::new();
        w.write(b"ab");
        w.seek(3);
        w.write(b"c");
        assert_eq!(w.as_slice(), b"ab\0\0\0c");
        assert_eq!(w.offset(), 6);
        assert!(w.valid());
    }

    #[test]
    fn reserve_does_not_change_content() {
        let mut w = VecWriter::with_capacity(1);
        w.write(b"x");
        w.reserve(1024);
        assert_eq!(w.len(), 1);
        assert_eq!(w.into_inner(), b"x".to_vec());
    }

    #[test]
    fn empty_writer() {
        let w = VecWriter::new();
        assert!(w.is_empty());
        assert_eq!(w.offset(), 0);
    }
}
