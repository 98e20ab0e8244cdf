#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Failed to read snapshot: {0}")]
    SnapshotIo(#[from] std::io::Error),

    #[error("Failed to parse snapshot: {0}")]
    SnapshotParse(#[from] serde_json::Error),

    #[error("Validation failed: {0}")]
    Validation(String),
}
