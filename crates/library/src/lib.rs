//! Mirror image files from an input tree into an output tree.
//!
//! The output tree reproduces the input tree's directory layout for every
//! image that gets copied, and nothing else: directories without images are
//! never created. Each output directory carries its own ledger of copied file
//! names, which makes repeated runs over the same pair of trees idempotent.
//!
//! ```no_run
//! use igcopy_ledger::SqliteStore;
//! use igcopy_library::{Context, MirrorEvent, run};
//!
//! # async fn example() -> igcopy_library::error::Result<()> {
//! let ctx = Context::new("photos", "backup");
//! let summary = run(&ctx, SqliteStore::default(), |event| {
//!     if let MirrorEvent::Copying(path) = event {
//!         println!("copying {}", path.display());
//!     }
//! })
//! .await?;
//! println!("{} copied, {} skipped", summary.copied, summary.skipped);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod mirror;

pub use crate::mirror::{Action, MirrorEvent, Summary, mirror, mirror_file};
use crate::error::Result;
use futures::TryStreamExt;
use igcopy_ledger::{LedgerCache, LedgerStore};
use std::path::PathBuf;
use std::pin::pin;

/// The pair of trees being mirrored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    /// Root of the tree images are copied from.
    pub input: PathBuf,
    /// Root of the mirrored tree images are copied into.
    pub output: PathBuf,
}
impl Context {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self { input: input.into(), output: output.into() }
    }
}

/// Mirror every image below `ctx.input` into `ctx.output`.
///
/// Drives [`mirror`] to completion, handing every event to `report` as it
/// happens. Ledgers are opened from `store` on demand, kept open for the whole
/// run and closed before returning, whether the run succeeded or not.
///
/// Stops at the first error. Files copied (and recorded) before the error
/// stay where they are.
pub async fn run<S: LedgerStore>(
    ctx: &Context,
    store: S,
    mut report: impl FnMut(&MirrorEvent),
) -> Result<Summary> {
    let mut ledgers = LedgerCache::new(store);
    let result = drive(ctx, &mut ledgers, &mut report).await;
    ledgers.close_all().await;
    if let Ok(summary) = &result {
        tracing::info!(copied = summary.copied, skipped = summary.skipped, "mirror complete");
    }
    result
}

async fn drive<S: LedgerStore>(
    ctx: &Context,
    ledgers: &mut LedgerCache<S>,
    report: &mut impl FnMut(&MirrorEvent),
) -> Result<Summary> {
    let mut events = pin!(mirror(ctx, ledgers));
    let mut summary = Summary::default();
    while let Some(event) = events.try_next().await? {
        report(&event);
        if let MirrorEvent::Complete(done) = event {
            summary = done;
        }
    }
    Ok(summary)
}
