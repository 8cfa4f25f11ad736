//! Deterministic, depth-first walk of a local directory tree.

use crate::error::{ErrorKind, Result};
use async_stream::stream;
use exn::ResultExt;
use futures::Stream;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::vec::IntoIter;
use tokio::fs;

pub type EntryStream<'a> = Pin<Box<dyn Stream<Item = Result<SourceEntry>> + Send + 'a>>;

/// A filesystem entry discovered by [`walk`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    /// Path of the entry, rooted at the path the walk started from.
    pub path: PathBuf,
    /// Whether the entry is a directory. Symlinks are never followed below
    /// the walk root, so a symlink to a directory is reported as a file.
    pub is_dir: bool,
}

/// Walk `root` recursively, yielding every entry exactly once.
///
/// Ordering is pre-order (a directory is yielded before its contents) with
/// each directory's entries sorted by file name, so two walks over an
/// unchanged tree yield identical sequences. The root itself is the first
/// entry. A symlinked root is followed.
///
/// The stream ends after the first error: an unreadable directory
/// terminates the walk instead of being skipped.
///
/// # Examples
///
/// ```no_run
/// use futures::TryStreamExt;
/// use std::path::Path;
/// # async fn example() -> igcopy_storage::error::Result<()> {
/// let mut entries = igcopy_storage::walk(Path::new("photos"));
/// while let Some(entry) = entries.try_next().await? {
///     if !entry.is_dir {
///         println!("{}", entry.path.display());
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub fn walk(root: &Path) -> EntryStream<'_> {
    Box::pin(stream! {
        let top = match stat_root(root).await {
            Ok(top) => top,
            Err(e) => {
                yield Err(e);
                return;
            },
        };
        let descend = top.is_dir;
        yield Ok(top);
        if !descend {
            return;
        }

        let mut stack = match read_sorted(root).await {
            Ok(children) => vec![children],
            Err(e) => {
                yield Err(e);
                return;
            },
        };
        while let Some(level) = stack.last_mut() {
            let Some(entry) = level.next() else {
                stack.pop();
                continue;
            };
            let subdir = entry.is_dir.then(|| entry.path.clone());
            yield Ok(entry);
            if let Some(dir) = subdir {
                match read_sorted(&dir).await {
                    Ok(children) => stack.push(children),
                    Err(e) => {
                        yield Err(e);
                        return;
                    },
                }
            }
        }
    })
}

async fn stat_root(root: &Path) -> Result<SourceEntry> {
    let metadata = fs::metadata(root).await.or_raise(|| ErrorKind::Traverse(root.to_path_buf()))?;
    Ok(SourceEntry { path: root.to_path_buf(), is_dir: metadata.is_dir() })
}

/// Read a directory's entries, sorted by file name.
async fn read_sorted(dir: &Path) -> Result<IntoIter<SourceEntry>> {
    let mut entries = fs::read_dir(dir).await.or_raise(|| ErrorKind::Traverse(dir.to_path_buf()))?;
    let mut children = Vec::new();
    while let Some(entry) = entries.next_entry().await.or_raise(|| ErrorKind::Traverse(dir.to_path_buf()))? {
        // `DirEntry::file_type` does not traverse symlinks.
        let file_type = entry.file_type().await.or_raise(|| ErrorKind::Traverse(entry.path()))?;
        children.push(SourceEntry { path: entry.path(), is_dir: file_type.is_dir() });
    }
    children.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
    tracing::trace!(dir = %dir.display(), entries = children.len(), "read directory");
    Ok(children.into_iter())
}
