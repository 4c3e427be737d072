#![forbid(unsafe_code)]

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PakError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("{} does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("invalid pak: {0}")]
    Format(String),

    #[error("cannot encode: {0}")]
    Encoding(String),

    #[error("path is outside input dir: {0}")]
    Outside(String),
}

pub type PakResult<T> = Result<T, PakError>;
