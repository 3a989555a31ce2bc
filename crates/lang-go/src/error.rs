use std::path::PathBuf;

use burrow_ingest::IngestError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to load Go grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),
    #[error("failed to parse {0}")]
    Parse(PathBuf),
}

impl From<ScanError> for IngestError {
    fn from(value: ScanError) -> Self {
        IngestError::Execution(value.to_string())
    }
}
