use crate::poly::Erasable;
use crate::traits::{AlignableStream, OutputStream, ReservableOutputStream, Stream};

/// Write-only stream that discards its input and counts it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Sink {
    offset: usize,
}

impl Sink {
    /// Create a sink at offset zero.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Stream for Sink {
    fn seek(&mut self, n: usize) {
        self.offset += n;
    }

    fn valid(&self) -> bool {
        true
    }
}

impl AlignableStream for Sink {
    fn offset(&self) -> usize {
        self.offset
    }
}

impl OutputStream for Sink {
    fn write(&mut self, src: &[u8]) {
        self.offset += src.len();
    }
}

impl ReservableOutputStream for Sink {
    fn reserve(&mut self, _n: usize) {}
}

impl Erasable for Sink {
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
