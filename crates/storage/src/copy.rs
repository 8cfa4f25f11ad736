//! Byte-for-byte file copies.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::path::Path;
use tokio::fs::{self, File};
use tokio::io::{self, AsyncWriteExt};
use tracing::instrument;

/// Copy the contents of `source` into `destination`, returning the number of
/// bytes copied.
///
/// The destination is created, or truncated if it already exists. Its parent
/// directory must exist. Permissions and timestamps are not replicated.
#[instrument(level = "debug", skip_all, fields(source = %source.display(), destination = %destination.display()))]
pub async fn copy_file(source: &Path, destination: &Path) -> Result<u64> {
    let mut reader = File::open(source).await.or_raise(|| ErrorKind::Open(source.to_path_buf()))?;
    let mut writer = File::create(destination).await.or_raise(|| ErrorKind::Create(destination.to_path_buf()))?;
    let bytes = io::copy(&mut reader, &mut writer).await.or_raise(|| ErrorKind::Transfer(destination.to_path_buf()))?;
    // Tokio hands writes to a background thread; flushing surfaces their errors.
    writer.flush().await.or_raise(|| ErrorKind::Transfer(destination.to_path_buf()))?;
    tracing::debug!(bytes, "copied file");
    Ok(bytes)
}

/// Create `dir` and any missing parents. Succeeds if it already exists.
pub async fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).await.or_raise(|| ErrorKind::CreateDir(dir.to_path_buf()))
}
