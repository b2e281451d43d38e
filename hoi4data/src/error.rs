//! Error types for reading and writing mod data files.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or regenerating game data.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    /// A file was read but its content could not be understood.
    #[error("`{}` parse error: {message}", path.display())]
    Parse {
        /// The file that failed.
        path: PathBuf,
        /// What went wrong, usually the inner error rendered as text.
        message: String,
    },
    /// A color block used a keyword other than `rgb` or `hsv`.
    #[error("unknown color type `{0}`")]
    UnknownColorMode(String),
    /// No unused color could be drawn after the maximum number of attempts.
    #[error("cannot generate more distinct colors after {0} attempts")]
    ColorSpaceExhausted(usize),
    /// The input held no `{ ... }` block.
    #[error("no braced block found")]
    MissingBlock,
    /// Ideology ids and colors did not pair up.
    #[error("ideology format error: {ids} ids but {colors} colors")]
    IdeologyFormat { ids: usize, colors: usize },
    /// A value inside an otherwise well-formed entry could not be converted.
    #[error("invalid value `{value}` for {field}")]
    InvalidValue { field: &'static str, value: String },
}

impl DataError {
    /// Wraps any error raised while handling `path` into a [`DataError::Parse`].
    pub fn parse(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        DataError::Parse {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
