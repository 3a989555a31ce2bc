use burrow_api::ApiError;
use burrow_ingest::IngestError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("no syntax node at offset {offset}")]
    UnresolvablePosition { offset: usize },
    #[error("completion cancelled")]
    Cancelled,
    #[error("collaborator error: {0}")]
    Api(#[from] ApiError),
    #[error("unimported scan failed: {0}")]
    Scan(String),
    #[error("invalid options: {0}")]
    Config(#[from] serde_json::Error),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CompletionError {
    /// Cancellation is user-driven and must not be reported as a failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, CompletionError::Cancelled)
    }
}

impl From<IngestError> for CompletionError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::Cancelled => CompletionError::Cancelled,
            other => CompletionError::Scan(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, CompletionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ingest_cancellation_stays_distinguishable() {
        let err = CompletionError::from(IngestError::Cancelled);
        assert!(err.is_cancelled());

        let err = CompletionError::from(IngestError::Join("panicked".into()));
        assert!(!err.is_cancelled());
        assert!(err.to_string().contains("panicked"));
    }
}
