use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArborError {
    #[error("key error: {0}")]
    Key(#[from] arbor_key::KeyError),

    #[error("store error: {0}")]
    Store(#[from] arbor_store::StoreError),

    #[error("build error: {0}")]
    Build(#[from] arbor_build::BuildError),

    #[error("text error: {0}")]
    Text(#[from] arbor_text::TextError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<arbor_text::ParseError> for ArborError {
    fn from(err: arbor_text::ParseError) -> Self {
        Self::Text(err.into())
    }
}

pub type ArborResult<T> = Result<T, ArborError>;
