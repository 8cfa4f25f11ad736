//! Mapping source paths onto the mirrored destination tree.

use exn::{OptionExt, ResultExt};
use std::path::{Path, PathBuf};

use crate::error::{ErrorKind, Result};

/// Where a source file ends up in the output tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    /// Path of the source file relative to the input root (also relative to
    /// the output root, since the structure is mirrored).
    pub relative: PathBuf,
    /// Full destination file path.
    pub path: PathBuf,
    /// Directory the destination file lives in; owner of the ledger.
    pub dir: PathBuf,
    /// Base file name, the ledger key.
    pub name: String,
}

/// Path of `path` relative to `root`.
///
/// Fails with [`OutsideRoot`](ErrorKind::OutsideRoot) if `path` is not
/// located under `root`, or if it *is* `root` (nothing left to mirror).
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use igcopy_storage::relative;
/// assert_eq!(relative("in", "in/sub/b.png").unwrap(), Path::new("sub/b.png"));
/// assert!(relative("in", "elsewhere/b.png").is_err());
/// assert!(relative("in", "in").is_err());
/// ```
pub fn relative(root: impl AsRef<Path>, path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    let relative = path.strip_prefix(root.as_ref()).or_raise(|| ErrorKind::OutsideRoot(path.to_path_buf()))?;
    if relative.as_os_str().is_empty() {
        exn::bail!(ErrorKind::OutsideRoot(path.to_path_buf()));
    }
    Ok(relative.to_path_buf())
}

/// Compute the mirrored [`Destination`] of `path` (located under `input`)
/// inside `output`.
///
/// Pure path arithmetic; nothing is touched on disk.
pub fn mirror(input: impl AsRef<Path>, output: impl AsRef<Path>, path: impl AsRef<Path>) -> Result<Destination> {
    let relative = relative(input, path)?;
    let destination = output.as_ref().join(&relative);
    let name = destination
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_raise(|| ErrorKind::InvalidPath(destination.clone()))?
        .to_string();
    let dir = destination.parent().ok_or_raise(|| ErrorKind::InvalidPath(destination.clone()))?.to_path_buf();
    Ok(Destination { relative, path: destination, dir, name })
}
