//! Error types for the [`mirror`](super) module.
//!
//! Uses [`exn`] for automatic location tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A mirror error with automatic location tracking via [`exn::Exn`].
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for mirror operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies the step of the per-file pipeline that failed.
///
/// Every variant is fatal for the whole run: the first failure stops the
/// traversal, and work completed before it is kept.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Walking the input tree failed.
    #[display("failed to walk input directory")]
    Traversal,
    /// The entry could not be expressed relative to the input root.
    #[display("failed to get relative path of {}", _0.display())]
    RelativePath(#[error(not(source))] PathBuf),
    /// The file name cannot be used as a ledger key (not valid UTF-8).
    #[display("file name of {} is not valid UTF-8", _0.display())]
    InvalidName(#[error(not(source))] PathBuf),
    /// The destination directory could not be created.
    #[display("failed to create directory {}", _0.display())]
    CreateDirectory(#[error(not(source))] PathBuf),
    /// The ledger for a destination directory could not be opened.
    #[display("failed to open ledger in {}", _0.display())]
    OpenLedger(#[error(not(source))] PathBuf),
    /// Checking the ledger for a file name failed.
    #[display("failed to check ledger for {_0}")]
    CheckLedger(#[error(not(source))] String),
    /// Copying the file to its destination failed.
    #[display("failed to copy file to {}", _0.display())]
    Copy(#[error(not(source))] PathBuf),
    /// The file was copied, but recording it in the ledger failed. The copy
    /// is left in place.
    #[display("failed to register {_0} in ledger")]
    Register(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
