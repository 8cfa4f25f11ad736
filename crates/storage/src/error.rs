//! Storage Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. The underlying [`std::io::Error`] is
//! kept as the child of each raised kind.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A storage error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for storage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A directory (or the walk root) could not be read.
    #[display("failed to read directory: {}", _0.display())]
    Traverse(#[error(not(source))] PathBuf),
    /// Path is not located under the root it was supposed to be relative to.
    #[display("path is not under root: {}", _0.display())]
    OutsideRoot(#[error(not(source))] PathBuf),
    /// Path has no usable file name (empty, or not valid UTF-8).
    #[display("invalid path: {}", _0.display())]
    InvalidPath(#[error(not(source))] PathBuf),
    /// A directory could not be created.
    #[display("failed to create directory: {}", _0.display())]
    CreateDir(#[error(not(source))] PathBuf),
    /// Source file could not be opened for reading.
    #[display("failed to open file: {}", _0.display())]
    Open(#[error(not(source))] PathBuf),
    /// Destination file could not be created or truncated.
    #[display("failed to create file: {}", _0.display())]
    Create(#[error(not(source))] PathBuf),
    /// Reading from the source or writing into the destination failed midway.
    #[display("failed to copy data into: {}", _0.display())]
    Transfer(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Transfer(_))
    }
}
