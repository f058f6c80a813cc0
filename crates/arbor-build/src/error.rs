/// Errors that abort a build.
///
/// Entries written before the error persist; there is no rollback.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BuildError {
    /// A children source yielded a key not strictly after its predecessor.
    #[error("child {key:?} under {parent:?} is not after previous child {previous:?}")]
    OutOfOrder {
        parent: String,
        previous: String,
        key: String,
    },

    /// A custom builder reported a failure.
    #[error("custom build failed at {key:?}: {reason}")]
    Custom { key: String, reason: String },
}

/// Result alias for build operations.
pub type BuildResult<T> = Result<T, BuildError>;
