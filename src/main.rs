mod cli;
mod logging;

use crate::cli::Args;
use clap::Parser;
use igcopy_config::Config;
use igcopy_ledger::SqliteStore;
use igcopy_library::{Context, MirrorEvent, run};
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {err:?}");
            return ExitCode::FAILURE;
        },
    };
    logging::init(&config.log);
    tracing::debug!(path = ?igcopy_config::default_path(), "loaded configuration");

    let ctx = Context::new(args.input, args.output);
    tracing::debug!(input = %ctx.input.display(), output = %ctx.output.display(), "starting");
    let store = SqliteStore::new(config.ledger.busy_timeout());
    match run(&ctx, store, report).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::FAILURE
        },
    }
}

fn report(event: &MirrorEvent) {
    match event {
        MirrorEvent::Copying(path) => println!("[Copying] {}", path.display()),
        MirrorEvent::Skipped(path) => println!("[Skipped] {} (already in DB)", path.display()),
        MirrorEvent::Started | MirrorEvent::Copied(_) | MirrorEvent::Complete(_) => {},
    }
}
