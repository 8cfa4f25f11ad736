//! SQLite-backed ledger, one database file per directory.

use crate::db::{DEFAULT_BUSY_TIMEOUT, Database};
use crate::error::{ErrorKind, Result};
use crate::{LEDGER_FILE_NAME, Ledger, LedgerHandle, LedgerStore};
use async_trait::async_trait;
use exn::ResultExt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

/// Opens [`SqliteLedger`]s stored as [`LEDGER_FILE_NAME`] inside each directory.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    busy_timeout: Duration,
}
impl Default for SqliteStore {
    fn default() -> Self {
        Self { busy_timeout: DEFAULT_BUSY_TIMEOUT }
    }
}
impl SqliteStore {
    pub fn new(busy_timeout: Duration) -> Self {
        Self { busy_timeout }
    }
}

#[async_trait]
impl LedgerStore for SqliteStore {
    #[instrument(skip(self), fields(dir = %dir.display()))]
    async fn open(&self, dir: &Path) -> Result<LedgerHandle> {
        let db = Database::connect(dir.join(LEDGER_FILE_NAME), self.busy_timeout).await?;
        tracing::debug!(path = %db.path().display(), "opened ledger");
        let handle: LedgerHandle = Arc::new(SqliteLedger::from(db));
        Ok(handle)
    }
}

/// A ledger backed by a single SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteLedger {
    db: Database,
}
impl From<Database> for SqliteLedger {
    fn from(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Ledger for SqliteLedger {
    async fn exists(&self, name: &str) -> Result<bool> {
        let (count,): (i64,) = sqlx::query_as(include_str!("../queries/exists.sql"))
            .bind(name)
            .fetch_one(self.db.pool())
            .await
            .or_raise(|| ErrorKind::Read(name.to_string()))?;
        Ok(count > 0)
    }

    async fn insert(&self, name: &str) -> Result<()> {
        match sqlx::query(include_str!("../queries/insert.sql")).bind(name).execute(self.db.pool()).await {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                exn::bail!(ErrorKind::AlreadyRecorded(name.to_string()))
            },
            Err(e) => Err(e).or_raise(|| ErrorKind::Write(name.to_string())),
        }
    }

    async fn close(&self) {
        self.db.close().await;
    }
}
