//! Per-directory ledger of already copied file names.
//!
//! Every destination directory owns an independent ledger, persisted as
//! [`LEDGER_FILE_NAME`] inside that directory. A ledger only knows about base
//! file names: it answers "has this name been copied here before?" and records
//! new names once they have been copied. Copying or archiving an output
//! directory therefore carries its own record of what is inside it.
//!
//! # Architecture
//! - [`LedgerStore`] opens (or creates) the ledger for a directory and hands
//!   back a shared [`LedgerHandle`].
//! - [`Ledger`] is the per-directory capability set: exists, insert, close.
//! - [`LedgerCache`] memoises open handles for the duration of one run and
//!   closes all of them exactly once at the end.
//!
//! [`SqliteStore`] is the real implementation. The `mock` feature adds
//! [`MemoryStore`], an in-process fake intended for other crates' tests.

mod cache;
mod db;
pub mod error;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod sqlite;

pub use crate::cache::LedgerCache;
pub use crate::db::Database;
#[cfg(any(test, feature = "mock"))]
pub use crate::mock::{MemoryLedger, MemoryStore};
pub use crate::sqlite::{SqliteLedger, SqliteStore};
use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

/// Fixed name of the ledger file created inside each destination directory.
pub const LEDGER_FILE_NAME: &str = "igcopy.db";

pub type LedgerHandle = Arc<dyn Ledger>;

/// The record of file names already copied into one directory.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Returns `true` if `name` has previously been recorded.
    async fn exists(&self, name: &str) -> Result<bool>;

    /// Record `name` as copied.
    ///
    /// Returns [`AlreadyRecorded`](crate::error::ErrorKind::AlreadyRecorded)
    /// if the name is already present; callers are expected to check with
    /// [`exists()`](Self::exists) first.
    async fn insert(&self, name: &str) -> Result<()>;

    /// Release the underlying resources. Best effort and idempotent.
    async fn close(&self);
}

/// Opens the ledger that belongs to a directory.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Open or create the ledger for `dir`, ensuring its table exists.
    async fn open(&self, dir: &Path) -> Result<LedgerHandle>;
}
