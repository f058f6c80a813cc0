use crate::poly::Erasable;
use crate::traits::{
    AlignableStream, InputStream, OutputStream, PersistentDataStream, SizedStream, Stream,
};

// ---------------------------------------------------------------------------
// SliceReader
// ---------------------------------------------------------------------------

/// Contiguous input stream over a borrowed byte slice.
///
/// This is the reader handed out by in-memory entries. It implements every
/// input tier including [`PersistentDataStream`].
#[derive(Clone, Debug)]
pub struct SliceReader<'a> {
    data: &'a [u8],
    pos: usize,
    valid: bool,
}

impl<'a> SliceReader<'a> {
    /// Create a reader positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            valid: true,
        }
    }

    /// The remaining bytes, tied to the lifetime of the underlying slice.
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    fn invalidate(&mut self) {
        self.pos = self.data.len();
        self.valid = false;
    }
}

impl Stream for SliceReader<'_> {
    fn seek(&mut self, n: usize) {
        if !self.valid || n > self.data.len() - self.pos {
            self.invalidate();
            return;
        }
        self.pos += n;
    }

    fn valid(&self) -> bool {
        self.valid
    }
}

impl SizedStream for SliceReader<'_> {
    fn length(&self) -> usize {
        self.data.len() - self.pos
    }
}

impl AlignableStream for SliceReader<'_> {
    fn offset(&self) -> usize {
        self.pos
    }
}

impl InputStream for SliceReader<'_> {
    fn read(&mut self, dst: &mut [u8]) {
        if !self.valid || dst.len() > self.data.len() - self.pos {
            dst.fill(0);
            self.invalidate();
            return;
        }
        let end = self.pos + dst.len();
        dst.copy_from_slice(&self.data[self.pos..end]);
        self.pos = end;
    }
}

impl PersistentDataStream for SliceReader<'_> {
    fn data(&self) -> &[u8] {
        &self.data[self.pos..]
    }
}

impl Erasable for SliceReader<'_> {
    fn as_sized(&self) -> Option<&dyn SizedStream> {
        Some(self)
    }

    fn as_alignable(&self) -> Option<&dyn AlignableStream> {
        Some(self)
    }

    fn as_input(&mut self) -> Option<&mut dyn InputStream> {
        Some(self)
    }

    fn as_persistent(&self) -> Option<&dyn PersistentDataStream> {
        Some(self)
    }
}

// ---------------------------------------------------------------------------
// SliceWriter
// ---------------------------------------------------------------------------

/// Bounded output stream over a borrowed mutable slice.
///
/// Writing or seeking beyond the end of the slice invalidates the stream.
/// Seeked-over bytes keep whatever the slice held.
#[derive(Debug)]
pub struct SliceWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
    valid: bool,
}

impl<'a> SliceWriter<'a> {
    /// Create a writer positioned at the start of `buf`.
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            valid: true,
        }
    }

    /// The bytes written (or seeked over) so far.
    pub fn written(&self) -> &[u8] {
        &self.buf[..self.pos]
    }

    fn invalidate(&mut self) {
        self.pos = self.buf.len();
        self.valid = false;
    }
}

impl Stream for SliceWriter<'_> {
    fn seek(&mut self, n: usize) {
        if !self.valid || n > self.buf.len() - self.pos {
            self.invalidate();
            return;
        }
        self.pos += n;
    }

    fn valid(&self) -> bool {
        self.valid
    }
}

impl SizedStream for SliceWriter<'_> {
    fn length(&self) -> usize {
        self.buf.len() - self.pos
    }
}

impl AlignableStream for SliceWriter<'_> {
    fn offset(&self) -> usize {
        self.pos
    }
}

impl OutputStream for SliceWriter<'_> {
    fn write(&mut self, src: &[u8]) {
        if !self.valid || src.len() > self.buf.len() - self.pos {
            self.invalidate();
            return;
        }
        let end = self.pos + src.len();
        self.buf[self.pos..end].copy_from_slice(src);
        self.pos = end;
    }
}

impl Erasable for SliceWriter<'_> {
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
