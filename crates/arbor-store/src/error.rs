/// Errors from the fallible descriptor read surface.
///
/// The plain read path (`Descriptor::acquire`) never fails: a missing or
/// undecodable entry yields the type's default value.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    /// Nothing is stored at or below the key.
    #[error("no entry at key {key:?}")]
    NotFound { key: String },

    /// The entry exists but its bytes do not decode as the requested type.
    #[error("entry at key {key:?} does not decode as {type_name}")]
    Decode {
        key: String,
        type_name: &'static str,
    },
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
