//! In-memory ledgers for testing.

use crate::error::{ErrorKind, Result};
use crate::{Ledger, LedgerHandle, LedgerStore};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// In-memory ledger for testing.
///
/// Names are kept in a `HashSet` behind a [`RwLock`]. The number of times
/// [`close()`](Ledger::close) was called is counted so tests can assert that
/// every handle is released exactly once.
#[derive(Default)]
pub struct MemoryLedger {
    names: RwLock<HashSet<String>>,
    failing: HashSet<String>,
    closes: AtomicUsize,
}
impl MemoryLedger {
    /// Every recorded name, sorted.
    pub async fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.names.read().await.iter().cloned().collect();
        names.sort();
        names
    }

    /// How many times this ledger has been closed.
    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    async fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.names.read().await.contains(name))
    }

    async fn insert(&self, name: &str) -> Result<()> {
        if self.failing.contains(name) {
            exn::bail!(ErrorKind::Write(name.to_string()));
        }
        if !self.names.write().await.insert(name.to_string()) {
            exn::bail!(ErrorKind::AlreadyRecorded(name.to_string()));
        }
        Ok(())
    }

    async fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

/// In-memory ledger store for testing.
///
/// Re-opening the same directory returns the same [`MemoryLedger`], so
/// recorded names survive across "runs" exactly as they would on disk. Clones
/// share state.
#[derive(Clone, Default)]
pub struct MemoryStore {
    ledgers: Arc<RwLock<HashMap<PathBuf, Arc<MemoryLedger>>>>,
    failing: HashSet<String>,
    opens: Arc<AtomicUsize>,
}
impl MemoryStore {
    /// Make every ledger opened from now on reject inserting `name`.
    pub fn failing_on(mut self, name: impl Into<String>) -> Self {
        self.failing.insert(name.into());
        self
    }

    /// The ledger previously opened for `dir`, if any.
    pub async fn ledger(&self, dir: impl AsRef<Path>) -> Option<Arc<MemoryLedger>> {
        self.ledgers.read().await.get(dir.as_ref()).cloned()
    }

    /// Every directory a ledger has been opened for, sorted.
    pub async fn directories(&self) -> Vec<PathBuf> {
        let mut dirs: Vec<_> = self.ledgers.read().await.keys().cloned().collect();
        dirs.sort();
        dirs
    }

    /// How many times [`open()`](LedgerStore::open) has been called.
    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn open(&self, dir: &Path) -> Result<LedgerHandle> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        let mut ledgers = self.ledgers.write().await;
        let ledger = ledgers.entry(dir.to_path_buf()).or_insert_with(|| {
            Arc::new(MemoryLedger {
                failing: self.failing.clone(),
                ..MemoryLedger::default()
            })
        });
        let handle: LedgerHandle = ledger.clone();
        Ok(handle)
    }
}
