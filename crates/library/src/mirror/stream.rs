use crate::Context;
use crate::error::{ErrorKind as LibraryErrorKind, Result as LibraryResult};
use crate::mirror::error::{ErrorKind, Result as MirrorResult};
use crate::mirror::file::{Step, prepare};
use async_stream::stream;
use exn::ResultExt;
use futures::Stream;
use igcopy_ledger::{LedgerCache, LedgerStore};
use igcopy_storage::walk;
use std::path::PathBuf;

/// Counts of what a finished run did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub copied: u64,
    pub skipped: u64,
}

/// Progress events emitted by [`mirror`] as it works through the input tree.
///
/// Events follow a strict ordering:
/// 1. [`Started`](Self::Started): exactly once.
/// 2. Per image file, in walk order, either [`Skipped`](Self::Skipped), or
///    [`Copying`](Self::Copying) immediately followed by
///    [`Copied`](Self::Copied).
/// 3. [`Complete`](Self::Complete): exactly once, signalling the stream is
///    finished.
///
/// An error terminates the stream early, in which case [`Complete`](Self::Complete)
/// is never emitted. A [`Copying`](Self::Copying) without a matching
/// [`Copied`](Self::Copied) means that file's copy (or its registration) is
/// what failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorEvent {
    /// Mirroring has begun; emitted exactly once before any other event.
    Started,
    /// About to copy the file at this (input-relative) path.
    Copying(PathBuf),
    /// The file was copied and recorded in its directory's ledger.
    Copied(PathBuf),
    /// The file's name was already recorded in its directory's ledger.
    Skipped(PathBuf),
    /// The whole input tree has been mirrored; the stream is finished.
    Complete(Summary),
}

/// Streams [`MirrorEvent`]s while mirroring every image file below
/// `ctx.input` into `ctx.output`.
///
/// Files are processed one at a time in walk order. Each step of a file is
/// driven by polling the stream, so a consumer sees
/// [`Copying`](MirrorEvent::Copying) before the copy starts.
///
/// The first error of any kind (walking, path computation, directory
/// creation, ledger access, copying) is yielded and ends the stream. Ledgers
/// opened along the way stay in `ledgers`; the caller closes them.
pub fn mirror<'a, S: LedgerStore>(
    ctx: &'a Context,
    ledgers: &'a mut LedgerCache<S>,
) -> impl Stream<Item = LibraryResult<MirrorEvent>> + 'a {
    // `rustfmt` does not format macro-specific syntax such as
    // `for await` even using the parentheses trick.
    stream! {
        for await event in mirror_inner(ctx, ledgers) {
            yield event.or_raise(|| LibraryErrorKind::Mirror);
        }
    }
}

fn mirror_inner<'a, S: LedgerStore>(
    ctx: &'a Context,
    ledgers: &'a mut LedgerCache<S>,
) -> impl Stream<Item = MirrorResult<MirrorEvent>> + 'a {
    // `rustfmt` does not format macros that use braces. Wrap in parentheses!
    stream!({
        yield Ok(MirrorEvent::Started);
        let mut summary = Summary::default();

        for await entry in walk(&ctx.input) {
            let entry = match entry.or_raise(|| ErrorKind::Traversal) {
                Ok(entry) => entry,
                Err(e) => {
                    yield Err(e);
                    return;
                },
            };
            match prepare(ctx, ledgers, &entry).await {
                Ok(Step::Ignore) => {},
                Ok(Step::Skip(relative)) => {
                    summary.skipped += 1;
                    yield Ok(MirrorEvent::Skipped(relative));
                },
                Ok(Step::Copy(pending)) => {
                    yield Ok(MirrorEvent::Copying(pending.relative().to_path_buf()));
                    match pending.execute().await {
                        Ok(relative) => {
                            summary.copied += 1;
                            yield Ok(MirrorEvent::Copied(relative));
                        },
                        Err(e) => {
                            yield Err(e);
                            return;
                        },
                    }
                },
                Err(e) => {
                    yield Err(e);
                    return;
                },
            }
        }

        yield Ok(MirrorEvent::Complete(summary));
    })
}
