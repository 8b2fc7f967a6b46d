use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read target file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
