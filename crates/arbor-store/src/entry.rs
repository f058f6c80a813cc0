//! Entry payloads.

use std::fmt;

use arbor_stream::{
    AlignableStream, InputStream, OutputStream, ReservableOutputStream, SizedStream, SliceReader,
    Stream,
};

/// Input tiers every entry reader provides.
pub trait EntryInput: InputStream + SizedStream + AlignableStream {}

impl<T: InputStream + SizedStream + AlignableStream + ?Sized> EntryInput for T {}

/// Output tiers every entry writer provides.
pub trait EntryOutput: ReservableOutputStream + AlignableStream {}

impl<T: ReservableOutputStream + AlignableStream + ?Sized> EntryOutput for T {}

/// Byte payload owned by a storage.
///
/// Entry contents are untyped; interpretation belongs to the conversion
/// traits of the requesting type.
pub trait Entry: Default {
    type Reader<'a>: EntryInput
    where
        Self: 'a;
    type Writer<'a>: EntryOutput
    where
        Self: 'a;

    /// Contiguous reader over the current payload.
    fn reader(&self) -> Self::Reader<'_>;

    /// Writer that replaces the payload.
    fn writer(&mut self) -> Self::Writer<'_>;

    /// Payload size in bytes.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Entry backed by its own heap buffer.
///
/// Entries move but never copy: there is no `Clone`.
#[derive(Default, PartialEq, Eq)]
pub struct DedicatedEntry {
    bytes: Vec<u8>,
}

impl DedicatedEntry {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Entry for DedicatedEntry {
    type Reader<'a> = SliceReader<'a>;
    type Writer<'a> = EntryWriter<'a>;

    fn reader(&self) -> SliceReader<'_> {
        SliceReader::new(&self.bytes)
    }

    fn writer(&mut self) -> EntryWriter<'_> {
        EntryWriter::new(&mut self.bytes)
    }

    fn len(&self) -> usize {
        self.bytes.len()
    }
}

const DEBUG_PREVIEW: usize = 16;

impl fmt::Debug for DedicatedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = self.bytes.len().min(DEBUG_PREVIEW);
        let mut preview = hex::encode(&self.bytes[..shown]);
        if shown < self.bytes.len() {
            preview.push_str("..");
        }
        f.debug_struct("DedicatedEntry")
            .field("len", &self.bytes.len())
            .field("bytes", &preview)
            .finish()
    }
}

/// Writer over a [`DedicatedEntry`].
///
/// Opening the writer empties the payload. Without a reservation the payload
/// grows with every write; after `reserve(n)` it is sized to exactly
/// `offset + n` bytes and writes past that bound invalidate the writer.
/// Bytes reserved but never written stay zero.
pub struct EntryWriter<'a> {
    bytes: &'a mut Vec<u8>,
    offset: usize,
    limit: Option<usize>,
    valid: bool,
}

impl<'a> EntryWriter<'a> {
    fn new(bytes: &'a mut Vec<u8>) -> Self {
        bytes.clear();
        Self {
            bytes,
            offset: 0,
            limit: None,
            valid: true,
        }
    }

    /// Advance over `n` bytes, zero-filling as needed. Returns the range
    /// start, or `None` if the writer is or became invalid.
    fn advance(&mut self, n: usize) -> Option<usize> {
        if !self.valid {
            return None;
        }
        let end = match self.offset.checked_add(n) {
            Some(end) if self.limit.map_or(true, |limit| end <= limit) => end,
            _ => {
                self.valid = false;
                return None;
            }
        };
        if end > self.bytes.len() {
            self.bytes.resize(end, 0);
        }
        let start = self.offset;
        self.offset = end;
        Some(start)
    }
}

impl Stream for EntryWriter<'_> {
    fn seek(&mut self, n: usize) {
        self.advance(n);
    }

    fn valid(&self) -> bool {
        self.valid
    }
}

impl SizedStream for EntryWriter<'_> {
    /// Bytes left before the reservation bound, or `usize::MAX - offset`
    /// when nothing was reserved.
    fn length(&self) -> usize {
        match self.limit {
            Some(limit) => limit.saturating_sub(self.offset),
            None => usize::MAX - self.offset,
        }
    }
}

impl AlignableStream for EntryWriter<'_> {
    fn offset(&self) -> usize {
        self.offset
    }
}

impl OutputStream for EntryWriter<'_> {
    fn write(&mut self, src: &[u8]) {
        if let Some(start) = self.advance(src.len()) {
            self.bytes[start..start + src.len()].copy_from_slice(src);
        }
    }
}

impl ReservableOutputStream for EntryWriter<'_> {
    fn reserve(&mut self, n: usize) {
        if !self.valid {
            return;
        }
        let Some(limit) = self.offset.checked_add(n) else {
            self.valid = false;
            return;
        };
        self.bytes.truncate(self.offset);
        self.bytes.reserve_exact(n);
        self.bytes.resize(limit, 0);
        self.limit = Some(limit);
    }
}

impl fmt::Debug for EntryWriter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryWriter")
            .field("offset", &self.offset)
            .field("limit", &self.limit)
            .field("valid", &self.valid)
            .finish()
    }
}
