//! Error types shared by every transform.

use arrow::datatypes::DataType;
use arrow::error::ArrowError;
use std::path::PathBuf;
use std::string::FromUtf8Error;
use thiserror::Error;

/// Errors returned by the readers and table transforms.
#[derive(Error, Debug)]
pub enum TransformError {
    /// The file does not exist.
    #[error("file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    /// The file exists but may not be read.
    #[error("permission denied: {}", .path.display())]
    PermissionDenied { path: PathBuf },

    /// The file content is not valid UTF-8.
    #[error("{} is not valid UTF-8: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: FromUtf8Error,
    },

    /// Any other filesystem failure.
    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A referenced column is not part of the batch schema.
    #[error("column not found: {0}")]
    ColumnNotFound(String),

    /// A datetime operation was applied to a column of another type.
    #[error("column {column} has type {found}, expected a timestamp or date")]
    TypeMismatch { column: String, found: DataType },

    /// `group_data` was called without any group column.
    #[error("at least one group column is required")]
    EmptyGroup,

    /// Every column of the batch is a group column, so there is nothing to count.
    #[error("no column left to count once the group columns are removed")]
    NoValueColumn,

    /// Failure inside an Arrow kernel.
    #[error("arrow error: {0}")]
    Arrow(#[from] ArrowError),
}

impl TransformError {
    /// Classify an I/O failure on `path` into the matching variant.
    pub(crate) fn from_io(path: PathBuf, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => TransformError::NotFound { path },
            std::io::ErrorKind::PermissionDenied => TransformError::PermissionDenied { path },
            _ => TransformError::Io { path, source },
        }
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, TransformError>;
