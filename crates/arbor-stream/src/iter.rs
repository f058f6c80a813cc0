use crate::poly::Erasable;
use crate::traits::{AlignableStream, InputStream, Stream};

/// Input stream pulling bytes from any byte iterator.
///
/// The iterator is consumed lazily; `seek` skips items without copying.
/// Running out of items invalidates the stream.
#[derive(Clone, Debug)]
pub struct IterReader<I> {
    iter: I,
    offset: usize,
    valid: bool,
}

impl<I: Iterator<Item = u8>> IterReader<I> {
    /// Wrap anything that yields bytes.
    pub fn new<T>(bytes: T) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        Self {
            iter: bytes.into_iter(),
            offset: 0,
            valid: true,
        }
    }

    /// Return the underlying iterator, positioned after the bytes consumed.
    pub fn into_inner(self) -> I {
        self.iter
    }
}

impl<I: Iterator<Item = u8>> Stream for IterReader<I> {
    fn seek(&mut self, n: usize) {
        if !self.valid || n == 0 {
            return;
        }
        if self.iter.nth(n - 1).is_none() {
            self.valid = false;
            return;
        }
        self.offset += n;
    }

    fn valid(&self) -> bool {
        self.valid
    }
}

impl<I: Iterator<Item = u8>> AlignableStream for IterReader<I> {
    fn offset(&self) -> usize {
        self.offset
    }
}

impl<I: Iterator<Item = u8>> InputStream for IterReader<I> {
    fn read(&mut self, dst: &mut [u8]) {
        if !self.valid {
            dst.fill(0);
            return;
        }
        for (i, slot) in dst.iter_mut().enumerate() {
            match self.iter.next() {
                Some(byte) => *slot = byte,
                None => {
                    self.offset += i;
                    self.valid = false;
                    dst.fill(0);
                    return;
                }
            }
        }
        self.offset += dst.len();
    }
}

impl<I: Iterator<Item = u8>> Erasable for IterReader<I> {
    fn as_alignable(&self) -> Option<&dyn AlignableStream> {
        Some(self)
    }

    fn as_input(&mut self) -> Option<&mut dyn InputStream> {
        Some(self)
    }
}
