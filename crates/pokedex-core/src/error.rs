//! Error types for the Pokédex service.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
