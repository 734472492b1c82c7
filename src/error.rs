use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("No indexed points available for snapping")]
    NoPointsFound,
    #[error("Trip columns have mismatched lengths")]
    MismatchedColumns,
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}
