use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("could not read `{path}`: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("could not write `{path}`: {source}")]
    Write { path: PathBuf, source: std::io::Error },
    #[error("invalid storage key `{0}`")]
    InvalidKey(String),
    #[error("could not encode stored value: {0}")]
    Encode(#[from] serde_json::Error),
}
