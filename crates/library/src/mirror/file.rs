use crate::Context;
use crate::error::{ErrorKind as LibraryErrorKind, Result as LibraryResult};
use crate::mirror::error::{ErrorKind, Result as MirrorResult};
use exn::ResultExt;
use igcopy_format::is_image;
use igcopy_ledger::{LedgerCache, LedgerHandle, LedgerStore};
use igcopy_storage::error::ErrorKind as StorageErrorKind;
use igcopy_storage::{Destination, SourceEntry, copy_file, ensure_dir};
use std::path::{Path, PathBuf};

/// The outcome of (successfully) mirroring a single image file.
///
/// Each variant carries the path of the file relative to the input root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// The file was copied and recorded in its directory's ledger.
    Copied(PathBuf),
    /// The directory's ledger already knew the file name; nothing was done.
    Skipped(PathBuf),
}

/// What to do with a walked entry, decided before any bytes are copied.
pub(crate) enum Step {
    /// Directory, or not an image.
    Ignore,
    /// Already recorded in the destination ledger.
    Skip(PathBuf),
    /// Needs copying.
    Copy(Pending),
}

/// An image whose destination directory exists and whose ledger does not
/// know it yet.
pub(crate) struct Pending {
    source: PathBuf,
    destination: Destination,
    ledger: LedgerHandle,
}
impl Pending {
    pub(crate) fn relative(&self) -> &Path {
        &self.destination.relative
    }

    /// Copy the file, then record it in the ledger.
    ///
    /// If recording fails the copied file is deliberately left where it is:
    /// the next run will not find the name in the ledger and simply copy it
    /// over itself again.
    pub(crate) async fn execute(self) -> MirrorResult<PathBuf> {
        let Destination { relative, path, name, .. } = self.destination;
        copy_file(&self.source, &path).await.or_raise(|| ErrorKind::Copy(path.clone()))?;
        if let Err(e) = self.ledger.insert(&name).await {
            tracing::warn!(path = %path.display(), "copied file could not be recorded in ledger; leaving it in place");
            return Err(e).or_raise(|| ErrorKind::Register(name));
        }
        Ok(relative)
    }
}

/// Runs everything up to (but excluding) the copy for one walked entry.
pub(crate) async fn prepare<S: LedgerStore>(
    ctx: &Context,
    ledgers: &mut LedgerCache<S>,
    entry: &SourceEntry,
) -> MirrorResult<Step> {
    if entry.is_dir || !is_image(&entry.path) {
        return Ok(Step::Ignore);
    }
    let destination = match igcopy_storage::mirror(&ctx.input, &ctx.output, &entry.path) {
        Ok(destination) => destination,
        Err(e) if matches!(&*e, StorageErrorKind::InvalidPath(_)) => {
            return Err(e).or_raise(|| ErrorKind::InvalidName(entry.path.clone()));
        },
        Err(e) => return Err(e).or_raise(|| ErrorKind::RelativePath(entry.path.clone())),
    };
    ensure_dir(&destination.dir).await.or_raise(|| ErrorKind::CreateDirectory(destination.dir.clone()))?;
    let ledger = ledgers.get_or_open(&destination.dir).await.or_raise(|| ErrorKind::OpenLedger(destination.dir.clone()))?;
    if ledger.exists(&destination.name).await.or_raise(|| ErrorKind::CheckLedger(destination.name.clone()))? {
        tracing::debug!(path = %destination.path.display(), "name already recorded in ledger");
        return Ok(Step::Skip(destination.relative));
    }
    Ok(Step::Copy(Pending { source: entry.path.clone(), destination, ledger }))
}

/// Mirrors a single walked entry into the output tree.
///
/// Returns `None` for directories and files that are not images. Ledgers are
/// opened through (and stay cached in) `ledgers`; closing them is up to the
/// caller.
///
/// # Errors
/// Returns [`Exn<LibraryErrorKind::Mirror>`](LibraryErrorKind::Mirror)
/// raised from an inner [`Exn<ErrorKind>`](ErrorKind) naming the failed step.
pub async fn mirror_file<S: LedgerStore>(
    ctx: &Context,
    ledgers: &mut LedgerCache<S>,
    entry: &SourceEntry,
) -> LibraryResult<Option<Action>> {
    mirror_file_inner(ctx, ledgers, entry).await.or_raise(|| LibraryErrorKind::Mirror)
}

async fn mirror_file_inner<S: LedgerStore>(
    ctx: &Context,
    ledgers: &mut LedgerCache<S>,
    entry: &SourceEntry,
) -> MirrorResult<Option<Action>> {
    match prepare(ctx, ledgers, entry).await? {
        Step::Ignore => Ok(None),
        Step::Skip(relative) => Ok(Some(Action::Skipped(relative))),
        Step::Copy(pending) => Ok(Some(Action::Copied(pending.execute().await?))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use igcopy_ledger::{LEDGER_FILE_NAME, MemoryStore, SqliteStore};
    use std::ops::Deref;

    fn file(path: impl Into<PathBuf>) -> SourceEntry {
        SourceEntry { path: path.into(), is_dir: false }
    }

    fn setup() -> (tempfile::TempDir, Context) {
        let temp_dir = tempfile::tempdir().unwrap();
        let ctx = Context::new(temp_dir.path().join("in"), temp_dir.path().join("out"));
        std::fs::create_dir_all(&ctx.input).unwrap();
        (temp_dir, ctx)
    }

    #[tokio::test]
    async fn test_ignores_directories_and_non_images() {
        let (_temp_dir, ctx) = setup();
        std::fs::write(ctx.input.join("notes.txt"), b"text").unwrap();
        let mut ledgers = LedgerCache::new(MemoryStore::default());

        let dir = SourceEntry { path: ctx.input.clone(), is_dir: true };
        assert_eq!(mirror_file(&ctx, &mut ledgers, &dir).await.unwrap(), None);
        let text = file(ctx.input.join("notes.txt"));
        assert_eq!(mirror_file(&ctx, &mut ledgers, &text).await.unwrap(), None);
        // Nothing is created for ignored entries.
        assert!(!ctx.output.exists());
        assert!(ledgers.is_empty());
    }

    #[tokio::test]
    async fn test_copies_then_skips() {
        let (_temp_dir, ctx) = setup();
        std::fs::create_dir_all(ctx.input.join("sub")).unwrap();
        std::fs::write(ctx.input.join("sub/b.png"), b"png bytes").unwrap();
        let store = MemoryStore::default();
        let mut ledgers = LedgerCache::new(store.clone());
        let entry = file(ctx.input.join("sub/b.png"));

        let action = mirror_file(&ctx, &mut ledgers, &entry).await.unwrap();
        assert_eq!(action, Some(Action::Copied(PathBuf::from("sub/b.png"))));
        assert_eq!(std::fs::read(ctx.output.join("sub/b.png")).unwrap(), b"png bytes");
        assert_eq!(store.ledger(ctx.output.join("sub")).await.unwrap().names().await, vec!["b.png"]);

        let action = mirror_file(&ctx, &mut ledgers, &entry).await.unwrap();
        assert_eq!(action, Some(Action::Skipped(PathBuf::from("sub/b.png"))));
        assert_eq!(store.open_count(), 1);
        ledgers.close_all().await;
    }

    #[tokio::test]
    async fn test_entry_outside_input_root() {
        let (temp_dir, ctx) = setup();
        let stray = temp_dir.path().join("stray.jpg");
        std::fs::write(&stray, b"jpg").unwrap();
        let mut ledgers = LedgerCache::new(MemoryStore::default());

        let err = mirror_file_inner(&ctx, &mut ledgers, &file(&stray)).await.unwrap_err();
        assert_eq!(*err, ErrorKind::RelativePath(stray));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_utf8_file_name() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;
        let (_temp_dir, ctx) = setup();
        let path = ctx.input.join(OsStr::from_bytes(b"bad\xffname.jpg"));
        let mut ledgers = LedgerCache::new(MemoryStore::default());

        let err = mirror_file_inner(&ctx, &mut ledgers, &file(&path)).await.unwrap_err();
        assert_eq!(*err, ErrorKind::InvalidName(path));
        assert!(!ctx.output.exists());
    }

    #[tokio::test]
    async fn test_destination_directory_blocked() {
        let (_temp_dir, ctx) = setup();
        std::fs::create_dir_all(ctx.input.join("sub")).unwrap();
        std::fs::write(ctx.input.join("sub/a.jpg"), b"jpg").unwrap();
        // A regular file where the destination directory should go.
        std::fs::create_dir_all(&ctx.output).unwrap();
        std::fs::write(ctx.output.join("sub"), b"in the way").unwrap();
        let mut ledgers = LedgerCache::new(MemoryStore::default());

        let err = mirror_file_inner(&ctx, &mut ledgers, &file(ctx.input.join("sub/a.jpg"))).await.unwrap_err();
        assert_eq!(*err, ErrorKind::CreateDirectory(ctx.output.join("sub")));
    }

    #[tokio::test]
    async fn test_corrupt_ledger() {
        let (_temp_dir, ctx) = setup();
        std::fs::write(ctx.input.join("a.jpg"), b"jpg").unwrap();
        std::fs::create_dir_all(&ctx.output).unwrap();
        std::fs::write(ctx.output.join(LEDGER_FILE_NAME), "this is not a database\n".repeat(64)).unwrap();
        let mut ledgers = LedgerCache::new(SqliteStore::default());

        let err = mirror_file_inner(&ctx, &mut ledgers, &file(ctx.input.join("a.jpg"))).await.unwrap_err();
        assert_eq!(*err, ErrorKind::OpenLedger(ctx.output.clone()));
        assert!(!ctx.output.join("a.jpg").exists());
    }

    #[tokio::test]
    async fn test_registration_failure_leaves_copy_in_place() {
        let (_temp_dir, ctx) = setup();
        std::fs::write(ctx.input.join("a.jpg"), b"jpg").unwrap();
        let store = MemoryStore::default().failing_on("a.jpg");
        let mut ledgers = LedgerCache::new(store.clone());

        let err = mirror_file(&ctx, &mut ledgers, &file(ctx.input.join("a.jpg"))).await.unwrap_err();
        assert_eq!(*err.deref(), LibraryErrorKind::Mirror);
        assert_eq!(std::fs::read(ctx.output.join("a.jpg")).unwrap(), b"jpg");
        assert!(store.ledger(&ctx.output).await.unwrap().names().await.is_empty());
    }

    #[tokio::test]
    async fn test_recorded_but_deleted_file_stays_skipped() {
        let (_temp_dir, ctx) = setup();
        std::fs::write(ctx.input.join("a.jpg"), b"jpg").unwrap();
        let mut ledgers = LedgerCache::new(MemoryStore::default());
        let entry = file(ctx.input.join("a.jpg"));
        mirror_file(&ctx, &mut ledgers, &entry).await.unwrap();
        std::fs::remove_file(ctx.output.join("a.jpg")).unwrap();

        // Known gap: the ledger is trusted, the missing copy is not restored.
        let action = mirror_file(&ctx, &mut ledgers, &entry).await.unwrap();
        assert_eq!(action, Some(Action::Skipped(PathBuf::from("a.jpg"))));
        assert!(!ctx.output.join("a.jpg").exists());
    }
}
