//! Memoised ledger handles for the duration of one run.

use crate::error::Result;
use crate::{LedgerHandle, LedgerStore};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Open ledgers keyed by the directory they belong to.
///
/// The first request for a directory opens its ledger through the wrapped
/// [`LedgerStore`]; every later request for the same directory reuses that
/// handle. [`close_all()`](Self::close_all) must be called once the run is
/// over, whether it succeeded or not.
///
/// Not intended for concurrent use: one traversal owns one cache.
pub struct LedgerCache<S> {
    store: S,
    open: HashMap<PathBuf, LedgerHandle>,
}
impl<S: LedgerStore> LedgerCache<S> {
    pub fn new(store: S) -> Self {
        Self { store, open: HashMap::new() }
    }

    /// Get the ledger for `dir`, opening it on first use.
    pub async fn get_or_open(&mut self, dir: &Path) -> Result<LedgerHandle> {
        if let Some(ledger) = self.open.get(dir) {
            return Ok(ledger.clone());
        }
        let ledger = self.store.open(dir).await?;
        self.open.insert(dir.to_path_buf(), ledger.clone());
        Ok(ledger)
    }

    /// Close every open ledger exactly once and forget about them.
    pub async fn close_all(&mut self) {
        for (dir, ledger) in self.open.drain() {
            ledger.close().await;
            tracing::debug!(dir = %dir.display(), "closed ledger");
        }
    }

    /// Number of currently open ledgers.
    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    /// The wrapped store.
    pub fn store(&self) -> &S {
        &self.store
    }
}
