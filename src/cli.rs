use clap::Parser;
use std::path::PathBuf;

/// Mirror image files from one directory tree into another, skipping files
/// already copied on a previous run.
#[derive(Debug, Parser)]
#[command(name = "igcopy", version, about)]
pub struct Args {
    /// Directory tree to copy images from
    #[arg(long, value_name = "DIR")]
    pub input: PathBuf,
    /// Directory tree to mirror images into
    #[arg(long, value_name = "DIR")]
    pub output: PathBuf,
}
