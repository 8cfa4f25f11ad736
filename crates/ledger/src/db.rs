//! Database connection and pool management.

use exn::ResultExt;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::instrument;

use crate::error::{ErrorKind, Result};

/// Embedded migrations that are run automatically on connect.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
/// A ledger is only ever touched by one traversal at a time.
const MAX_CONNECTIONS: u32 = 1;
pub(crate) const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_millis(1500);

/// Connection pool for a single ledger database file.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
    path: PathBuf,
}

impl Database {
    async fn new(options: SqliteConnectOptions, path: PathBuf) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await
            .or_raise(|| ErrorKind::Open(path.clone()))?;
        let db = Self { pool, path };
        if let Err(e) = db.migrate().await {
            db.close().await;
            return Err(e);
        }
        Ok(db)
    }

    /// Connect to the ledger database at the given path.
    ///
    /// Creates the database file if it doesn't exist and runs migrations.
    pub async fn connect(path: impl AsRef<Path>, busy_timeout: Duration) -> Result<Self> {
        let path = path.as_ref();
        let options = Self::base_options(busy_timeout).filename(path).create_if_missing(true);
        Self::new(options, path.to_path_buf()).await
    }

    /// Connect to a throwaway in-memory ledger. Left public for other crates' tests.
    pub async fn connect_in_memory() -> Result<Self> {
        let options = Self::base_options(DEFAULT_BUSY_TIMEOUT).filename(":memory:");
        Self::new(options, PathBuf::from(":memory:")).await
    }

    /// Base connection options shared between file and in-memory databases.
    fn base_options(busy_timeout: Duration) -> SqliteConnectOptions {
        SqliteConnectOptions::new()
            // Rollback journal instead of WAL: the ledger has to stay a single
            // file that travels with the directory it describes.
            .journal_mode(SqliteJournalMode::Delete)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(busy_timeout)
    }

    /// Run database migrations.
    ///
    /// This is called automatically by `connect` and `connect_in_memory`.
    #[instrument("ensuring ledger table", skip(self), fields(path = %self.path.display()))]
    async fn migrate(&self) -> Result<()> {
        MIGRATOR.run(&self.pool).await.or_raise(|| ErrorKind::Migration(self.path.clone()))
    }

    /// Get a reference to the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Path of the database file (`:memory:` for in-memory databases).
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Close the database connection pool.
    ///
    /// Safe to call more than once; subsequent calls are no-ops.
    pub async fn close(&self) {
        if self.pool.is_closed() {
            return;
        }
        // Let SQLite update query planner statistics
        _ = sqlx::query("PRAGMA optimize").execute(&self.pool).await;
        self.pool.close().await;
    }
}
