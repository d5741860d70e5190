use thiserror::Error;

/// Boxed error reported by the byte source under an [`crate::NdjsonStream`].
pub type SourceError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum NdjsonError {
    #[error("response has no readable body")]
    EmptyBody,

    #[error("stream source failed: {0}")]
    Source(#[source] SourceError),
}

impl NdjsonError {
    pub fn source_error(error: impl Into<SourceError>) -> Self {
        Self::Source(error.into())
    }
}
