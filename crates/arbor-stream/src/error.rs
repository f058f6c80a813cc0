use std::path::PathBuf;

/// Errors from stream constructors and explicit flushes.
///
/// Reads, writes and seeks never return these; they flip [`valid`] instead.
///
/// [`valid`]: crate::Stream::valid
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// I/O error from the underlying file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file could not be opened or created.
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The stream went invalid before it was finished.
    #[error("stream invalid at offset {offset}")]
    Invalid { offset: usize },
}

/// Result alias for stream construction and finishing.
pub type StreamResult<T> = Result<T, StreamError>;
