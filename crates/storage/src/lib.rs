//! Local filesystem plumbing: walking a source tree, mapping each file to its
//! mirrored destination, and copying bytes across.

pub mod copy;
pub mod error;
pub mod path;
pub mod walk;

pub use crate::copy::{copy_file, ensure_dir};
pub use crate::path::{Destination, mirror, relative};
pub use crate::walk::{EntryStream, SourceEntry, walk};
