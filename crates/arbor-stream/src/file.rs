//! File-backed streams.
//!
//! [`FileReader`] and [`FileWriter`] go through buffered `std::fs::File`
//! handles; I/O failures turn the stream invalid rather than surfacing as
//! errors. [`MappedReader`] maps the whole file and serves it as a
//! persistent-data stream.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use memmap2::Mmap;
use tracing::warn;

use crate::error::{StreamError, StreamResult};
use crate::poly::Erasable;
use crate::traits::{
    AlignableStream, InputStream, OutputStream, PersistentDataStream, SizedStream, Stream,
};

// ---------------------------------------------------------------------------
// FileReader
// ---------------------------------------------------------------------------

/// Buffered input stream over a file, starting at its first byte.
#[derive(Debug)]
pub struct FileReader {
    inner: BufReader<File>,
    len: usize,
    offset: usize,
    valid: bool,
}

impl FileReader {
    /// Open `path` for reading.
    pub fn open(path: &Path) -> StreamResult<Self> {
        let file = File::open(path).map_err(|source| StreamError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let len = file.metadata()?.len() as usize;
        Ok(Self {
            inner: BufReader::new(file),
            len,
            offset: 0,
            valid: true,
        })
    }
}

impl Stream for FileReader {
    fn seek(&mut self, n: usize) {
        if !self.valid || n > self.len - self.offset {
            self.valid = false;
            return;
        }
        if let Err(e) = self.inner.seek_relative(n as i64) {
            warn!(offset = self.offset, error = %e, "file seek failed");
            self.valid = false;
            return;
        }
        self.offset += n;
    }

    fn valid(&self) -> bool {
        self.valid
    }
}

impl SizedStream for FileReader {
    fn length(&self) -> usize {
        self.len.saturating_sub(self.offset)
    }
}

impl AlignableStream for FileReader {
    fn offset(&self) -> usize {
        self.offset
    }
}

impl InputStream for FileReader {
    fn read(&mut self, dst: &mut [u8]) {
        if !self.valid || dst.len() > self.len - self.offset {
            dst.fill(0);
            self.valid = false;
            return;
        }
        if let Err(e) = self.inner.read_exact(dst) {
            warn!(offset = self.offset, error = %e, "file read failed");
            dst.fill(0);
            self.valid = false;
            return;
        }
        self.offset += dst.len();
    }
}

impl Erasable for FileReader {
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
// FileWriter
// ---------------------------------------------------------------------------

/// Buffered output stream that creates (or truncates) a file.
///
/// Seeking writes zero bytes. Call [`finish`](Self::finish) to flush and
/// learn whether every write landed; dropping the writer flushes silently.
#[derive(Debug)]
pub struct FileWriter {
    inner: BufWriter<File>,
    offset: usize,
    valid: bool,
}

impl FileWriter {
    /// Create `path`, truncating any existing file.
    pub fn create(path: &Path) -> StreamResult<Self> {
        let file = File::create(path).map_err(|source| StreamError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            inner: BufWriter::new(file),
            offset: 0,
            valid: true,
        })
    }

    /// Flush buffered bytes to disk.
    pub fn finish(mut self) -> StreamResult<usize> {
        if !self.valid {
            return Err(StreamError::Invalid {
                offset: self.offset,
            });
        }
        self.inner.flush()?;
        self.inner.get_ref().sync_all()?;
        Ok(self.offset)
    }

    fn put(&mut self, src: &[u8]) {
        if !self.valid {
            return;
        }
        if let Err(e) = self.inner.write_all(src) {
            warn!(offset = self.offset, error = %e, "file write failed");
            self.valid = false;
            return;
        }
        self.offset += src.len();
    }
}

impl Stream for FileWriter {
    fn seek(&mut self, n: usize) {
        const ZEROS: [u8; 512] = [0; 512];
        let mut left = n;
        while left > 0 && self.valid {
            let chunk = left.min(ZEROS.len());
            self.put(&ZEROS[..chunk]);
            left -= chunk;
        }
    }

    fn valid(&self) -> bool {
        self.valid
    }
}

impl AlignableStream for FileWriter {
    fn offset(&self) -> usize {
        self.offset
    }
}

impl OutputStream for FileWriter {
    fn write(&mut self, src: &[u8]) {
        self.put(src);
    }
}

impl Erasable for FileWriter {
    fn as_alignable(&self) -> Option<&dyn AlignableStream> {
        Some(self)
    }

    fn as_output(&mut self) -> Option<&mut dyn OutputStream> {
        Some(self)
    }
}

// ---------------------------------------------------------------------------
// MappedReader
// ---------------------------------------------------------------------------

/// Persistent-data input stream over a memory-mapped file.
pub struct MappedReader {
    map: Mmap,
    pos: usize,
    valid: bool,
}

impl MappedReader {
    /// Map `path` read-only.
    pub fn open(path: &Path) -> StreamResult<Self> {
        let file = File::open(path).map_err(|source| StreamError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        // SAFETY: the map is read-only and private to this reader. Callers
        // must not truncate the file while the reader is alive.
        let map = unsafe { Mmap::map(&file)? };
        Ok(Self {
            map,
            pos: 0,
            valid: true,
        })
    }
}

impl std::fmt::Debug for MappedReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappedReader")
            .field("len", &self.map.len())
            .field("pos", &self.pos)
            .field("valid", &self.valid)
            .finish()
    }
}

impl Stream for MappedReader {
    fn seek(&mut self, n: usize) {
        if !self.valid || n > self.map.len() - self.pos {
            self.pos = self.map.len();
            self.valid = false;
            return;
        }
        self.pos += n;
    }

    fn valid(&self) -> bool {
        self.valid
    }
}

impl SizedStream for MappedReader {
    fn length(&self) -> usize {
        self.map.len() - self.pos
    }
}

impl AlignableStream for MappedReader {
    fn offset(&self) -> usize {
        self.pos
    }
}

impl InputStream for MappedReader {
    fn read(&mut self, dst: &mut [u8]) {
        if !self.valid || dst.len() > self.map.len() - self.pos {
            dst.fill(0);
            self.pos = self.map.len();
            self.valid = false;
            return;
        }
        let end = self.pos + dst.len();
        dst.copy_from_slice(&self.map[self.pos..end]);
        self.pos = end;
    }
}

impl PersistentDataStream for MappedReader {
    fn data(&self) -> &[u8] {
        &self.map[self.pos..]
    }
}

impl Erasable for MappedReader {
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
