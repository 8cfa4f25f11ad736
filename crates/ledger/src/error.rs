//! Ledger Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A ledger error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for ledger operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The ledger database could not be opened or created.
    #[display("failed to open ledger {}", _0.display())]
    Open(#[error(not(source))] PathBuf),
    /// The ledger table could not be ensured.
    #[display("failed to initialise ledger {}", _0.display())]
    Migration(#[error(not(source))] PathBuf),
    /// Looking up a name failed.
    #[display("failed to check ledger for {_0}")]
    Read(#[error(not(source))] String),
    /// Recording a name failed.
    #[display("failed to record {_0} in ledger")]
    Write(#[error(not(source))] String),
    /// The name is already recorded; inserting it twice is a caller bug.
    #[display("{_0} is already recorded in ledger")]
    AlreadyRecorded(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Read(_) | ErrorKind::Write(_))
    }
}
