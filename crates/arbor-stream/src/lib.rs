//! Capability-tiered byte streams for the Arbor tree store.
//!
//! Every entry payload in Arbor is read and written through a *stream*: a
//! cursor over a sequence of bytes. Capabilities are split into tiers so a
//! consumer can ask for exactly what it needs:
//!
//! - [`Stream`] -- forward-only `seek` and `valid`
//! - [`SizedStream`] -- bytes remaining (`length`)
//! - [`AlignableStream`] -- bytes moved through this cursor (`offset`)
//! - [`InputStream`] / [`OutputStream`] -- `read` / `write`
//! - [`ReservableOutputStream`] -- `reserve` hint
//! - [`PersistentDataStream`] -- a stable view over the remaining bytes
//!
//! # Failure Model
//!
//! Primitives never fail fast. An out-of-range `seek`, `read` or `write`
//! flips the stream to invalid and subsequent calls become no-ops; callers
//! inspect [`Stream::valid`] when they care. The one exception is
//! [`PolyStream`]: invoking a tier the erased stream does not implement
//! aborts the process.
//!
//! # Concrete Streams
//!
//! - [`SliceReader`] / [`SliceWriter`] -- contiguous memory
//! - [`VecWriter`] -- growable, reservable buffer
//! - [`BytesReader`] / [`BytesWriter`] -- `bytes::Buf` / `bytes::BufMut`
//! - [`BytesPipe`] -- first-in first-out duplex buffer
//! - [`IterReader`] -- any byte iterator
//! - [`FileReader`] / [`FileWriter`] / [`MappedReader`] -- files
//! - [`Sink`] -- discards bytes, counts them

pub mod buf;
pub mod error;
pub mod file;
pub mod helpers;
pub mod iter;
pub mod poly;
pub mod sink;
pub mod slice;
pub mod traits;
pub mod vec;

pub use buf::{BytesPipe, BytesReader, BytesWriter};
pub use error::{StreamError, StreamResult};
pub use file::{FileReader, FileWriter, MappedReader};
pub use helpers::{align, copy, measure, read_array, read_remaining, COPY_BUFFER_SIZE};
pub use iter::IterReader;
pub use poly::{Capability, Erasable, PolyStream};
pub use sink::Sink;
pub use slice::{SliceReader, SliceWriter};
pub use traits::{
    AlignableStream, InputStream, OutputStream, PersistentDataStream, ReservableOutputStream,
    SizedStream, Stream,
};
pub use vec::VecWriter;
