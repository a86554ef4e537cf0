use thiserror::Error;

pub type Result<T> = std::result::Result<T, PaymentError>;

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("validation error: {0}")]
    ValidationError(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("storage error: {0}")]
    StorageError(String),
    #[error("transport error: {0}")]
    TransportError(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[cfg(feature = "storage-rocksdb")]
    #[error("RocksDB error: {0}")]
    RocksDbError(#[from] rocksdb::Error),
}

impl From<serde_json::Error> for PaymentError {
    fn from(err: serde_json::Error) -> Self {
        Self::StorageError(format!("serialization error: {err}"))
    }
}

impl From<reqwest::Error> for PaymentError {
    fn from(err: reqwest::Error) -> Self {
        Self::TransportError(err.to_string())
    }
}
