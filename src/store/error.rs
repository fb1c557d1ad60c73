use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Document not found: {0}")]
    NotFound(String),
    #[error("Backend rejected the request: {0}")]
    Rejected(String),
    #[error("Backend is closed")]
    Closed,
}
