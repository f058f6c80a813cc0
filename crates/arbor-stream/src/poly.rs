//! Type-erased streams.
//!
//! [`PolyStream`] boxes any [`Erasable`] stream behind a single type that
//! implements *every* tier. Tiers the underlying stream lacks are a
//! programming error: invoking one logs and aborts the process. Use
//! [`PolyStream::supports`] to check first.

use std::fmt;

use tracing::error;

use crate::traits::{
    AlignableStream, InputStream, OutputStream, PersistentDataStream, ReservableOutputStream,
    SizedStream, Stream,
};

/// A stream tier above the base [`Stream`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    Sized,
    Alignable,
    Input,
    Output,
    Reservable,
    PersistentData,
}

impl Capability {
    /// All tiers, lowest first.
    pub const ALL: [Capability; 6] = [
        Self::Sized,
        Self::Alignable,
        Self::Input,
        Self::Output,
        Self::Reservable,
        Self::PersistentData,
    ];
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sized => write!(f, "sized"),
            Self::Alignable => write!(f, "alignable"),
            Self::Input => write!(f, "input"),
            Self::Output => write!(f, "output"),
            Self::Reservable => write!(f, "reservable"),
            Self::PersistentData => write!(f, "persistent-data"),
        }
    }
}

/// A stream that can report which tiers it implements.
///
/// Each accessor defaults to `None`; a stream overrides the ones it
/// supports by returning `Some(self)`.
pub trait Erasable: Stream {
    fn as_sized(&self) -> Option<&dyn SizedStream> {
        None
    }

    fn as_alignable(&self) -> Option<&dyn AlignableStream> {
        None
    }

    fn as_input(&mut self) -> Option<&mut dyn InputStream> {
        None
    }

    fn as_output(&mut self) -> Option<&mut dyn OutputStream> {
        None
    }

    fn as_reservable(&mut self) -> Option<&mut dyn ReservableOutputStream> {
        None
    }

    fn as_persistent(&self) -> Option<&dyn PersistentDataStream> {
        None
    }
}

impl<S: Erasable + ?Sized> Erasable for &mut S {
    fn as_sized(&self) -> Option<&dyn SizedStream> {
        (**self).as_sized()
    }

    fn as_alignable(&self) -> Option<&dyn AlignableStream> {
        (**self).as_alignable()
    }

    fn as_input(&mut self) -> Option<&mut dyn InputStream> {
        (**self).as_input()
    }

    fn as_output(&mut self) -> Option<&mut dyn OutputStream> {
        (**self).as_output()
    }

    fn as_reservable(&mut self) -> Option<&mut dyn ReservableOutputStream> {
        (**self).as_reservable()
    }

    fn as_persistent(&self) -> Option<&dyn PersistentDataStream> {
        (**self).as_persistent()
    }
}

/// A boxed stream exposing all tiers.
pub struct PolyStream<'a> {
    inner: Box<dyn Erasable + 'a>,
}

impl<'a> PolyStream<'a> {
    /// Erase a stream. Pass `&mut stream` to keep ownership.
    pub fn new<S: Erasable + 'a>(stream: S) -> Self {
        Self {
            inner: Box::new(stream),
        }
    }

    /// Whether the erased stream implements `capability`.
    pub fn supports(&mut self, capability: Capability) -> bool {
        match capability {
            Capability::Sized => self.inner.as_sized().is_some(),
            Capability::Alignable => self.inner.as_alignable().is_some(),
            Capability::Input => self.inner.as_input().is_some(),
            Capability::Output => self.inner.as_output().is_some(),
            Capability::Reservable => self.inner.as_reservable().is_some(),
            Capability::PersistentData => self.inner.as_persistent().is_some(),
        }
    }

    /// Every tier the erased stream implements.
    pub fn capabilities(&mut self) -> Vec<Capability> {
        Capability::ALL
            .into_iter()
            .filter(|c| self.supports(*c))
            .collect()
    }
}

impl fmt::Debug for PolyStream<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolyStream")
            .field("valid", &self.inner.valid())
            .finish_non_exhaustive()
    }
}

/// The only process-terminating path in Arbor.
#[cold]
fn missing_capability(capability: Capability) -> ! {
    error!(%capability, "polymorphic stream lacks capability; aborting");
    std::process::abort()
}

impl Stream for PolyStream<'_> {
    fn seek(&mut self, n: usize) {
        self.inner.seek(n);
    }

    fn valid(&self) -> bool {
        self.inner.valid()
    }
}

impl SizedStream for PolyStream<'_> {
    fn length(&self) -> usize {
        match self.inner.as_sized() {
            Some(s) => s.length(),
            None => missing_capability(Capability::Sized),
        }
    }
}

impl AlignableStream for PolyStream<'_> {
    fn offset(&self) -> usize {
        match self.inner.as_alignable() {
            Some(s) => s.offset(),
            None => missing_capability(Capability::Alignable),
        }
    }
}

impl InputStream for PolyStream<'_> {
    fn read(&mut self, dst: &mut [u8]) {
        match self.inner.as_input() {
            Some(s) => s.read(dst),
            None => missing_capability(Capability::Input),
        }
    }
}

impl OutputStream for PolyStream<'_> {
    fn write(&mut self, src: &[u8]) {
        match self.inner.as_output() {
            Some(s) => s.write(src),
            None => missing_capability(Capability::Output),
        }
    }
}

impl ReservableOutputStream for PolyStream<'_> {
    fn reserve(&mut self, n: usize) {
        match self.inner.as_reservable() {
            Some(s) => s.reserve(n),
            None => missing_capability(Capability::Reservable),
        }
    }
}

impl PersistentDataStream for PolyStream<'_> {
    fn data(&self) -> &[u8] {
        match self.inner.as_persistent() {
            Some(s) => s.data(),
            None => missing_capability(Capability::PersistentData),
        }
    }
}
