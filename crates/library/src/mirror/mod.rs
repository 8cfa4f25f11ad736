//! Mirroring image files from the input tree into the output tree.
//!
//! Every entry of the input tree goes through the same sequence: directories
//! and non-images are ignored, the rest get a mirrored [`Destination`] under
//! the output root, the destination directory is created, and the directory's
//! ledger (see [`igcopy_ledger`]) decides whether the file is copied or
//! skipped. Newly copied files are recorded in the ledger afterwards.
//!
//! The primary entry point is [`mirror`], which walks the input tree and
//! streams a [`MirrorEvent`] per decision. [`mirror_file`] runs the same
//! pipeline for a single entry.
//!
//! [`Destination`]: igcopy_storage::Destination

pub mod error;
mod file;
mod stream;

pub use self::file::{Action, mirror_file};
pub use self::stream::{MirrorEvent, Summary, mirror};
