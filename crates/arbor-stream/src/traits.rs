/// Base stream tier: a forward-only cursor with a validity flag.
///
/// All implementations must satisfy these invariants:
/// - `seek(n)` only moves forward. Seeking past the end leaves the stream
///   invalid.
/// - Once invalid, a stream stays invalid. Further reads, writes and seeks
///   are no-ops (reads zero-fill their destination).
/// - No primitive panics or returns an error on misuse.
pub trait Stream {
    /// Advance the cursor by `n` bytes.
    fn seek(&mut self, n: usize);

    /// Returns `false` once any operation has overrun the stream.
    fn valid(&self) -> bool;
}

/// A stream that knows how many bytes remain.
pub trait SizedStream: Stream {
    /// Bytes remaining between the cursor and the end.
    fn length(&self) -> usize;
}

/// A stream that counts the bytes moved through this cursor.
///
/// The offset is relative to the cursor's creation, not to any absolute
/// position of the underlying storage. It never decreases.
pub trait AlignableStream: Stream {
    /// Bytes read, written or seeked since creation.
    fn offset(&self) -> usize;
}

/// A stream bytes can be copied out of.
pub trait InputStream: Stream {
    /// Copy `dst.len()` bytes out of the stream.
    ///
    /// On overrun the stream goes invalid and `dst` is zero-filled.
    fn read(&mut self, dst: &mut [u8]);
}

/// A stream bytes can be copied into.
pub trait OutputStream: Stream {
    /// Copy all of `src` into the stream.
    ///
    /// On overrun the stream goes invalid and nothing is written.
    fn write(&mut self, src: &[u8]);
}

/// An output stream that accepts a size hint.
pub trait ReservableOutputStream: OutputStream {
    /// Announce that `n` more bytes will follow.
    ///
    /// Implementations may pre-allocate, and may reallocate their buffer
    /// while doing so.
    fn reserve(&mut self, n: usize);
}

/// An input stream whose remaining bytes are addressable in place.
pub trait PersistentDataStream: InputStream + SizedStream {
    /// The remaining bytes, valid for [`length`](SizedStream::length) bytes.
    fn data(&self) -> &[u8];
}

// ---------------------------------------------------------------------------
// Forwarding impls for mutable references
// ---------------------------------------------------------------------------

impl<S: Stream + ?Sized> Stream for &mut S {
    fn seek(&mut self, n: usize) {
        (**self).seek(n);
    }

    fn valid(&self) -> bool {
        (**self).valid()
    }
}

impl<S: SizedStream + ?Sized> SizedStream for &mut S {
    fn length(&self) -> usize {
        (**self).length()
    }
}

impl<S: AlignableStream + ?Sized> AlignableStream for &mut S {
    fn offset(&self) -> usize {
        (**self).offset()
    }
}

impl<S: InputStream + ?Sized> InputStream for &mut S {
    fn read(&mut self, dst: &mut [u8]) {
        (**self).read(dst);
    }
}

impl<S: OutputStream + ?Sized> OutputStream for &mut S {
    fn write(&mut self, src: &[u8]) {
        (**self).write(src);
    }
}

impl<S: ReservableOutputStream + ?Sized> ReservableOutputStream for &mut S {
    fn reserve(&mut self, n: usize) {
        (**self).reserve(n);
    }
}

impl<S: PersistentDataStream + ?Sized> PersistentDataStream for &mut S {
    fn data(&self) -> &[u8] {
        (**self).data()
    }
}
