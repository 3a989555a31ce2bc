use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("scan cancelled")]
    Cancelled,
    #[error("execution failed: {0}")]
    Execution(String),
    #[error("task join failed: {0}")]
    Join(String),
}

impl IngestError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, IngestError::Cancelled)
    }
}
