use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("hour offset {0} outside the 24 hour window")]
    HourOutOfRange(u8),
    #[error("hour {0} already populated")]
    AlreadyPopulated(u8),
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("invalid hour file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
