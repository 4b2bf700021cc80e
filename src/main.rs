//! Refreshes temporary AWS MFA session credentials.
//!
//! Reads the long-term key pair and MFA device serial from the source
//! profile of an AWS shared-credentials file, exchanges a one-time MFA
//! code for temporary session credentials via STS `GetSessionToken`, and
//! writes the result into the destination profile of the same file. Every
//! other profile and key in the file is preserved; `--backup` keeps a
//! byte-identical copy of the original alongside it.

use std::process::exit;

use clap::Parser;
use log::debug;

mod cli;
mod credentials;
mod error;
mod store;
mod updater;

use cli::Args;
use updater::FatalContext;

#[tokio::main]
async fn main() {
    // Usage errors (missing --mfa-code, stray positional arguments) are
    // reported by clap here, before any file or network I/O.
    let args = Args::parse();

    // Warnings only by default; --verbose raises the filter so the
    // progress and diagnostic lines show. RUST_LOG overrides either.
    let default_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .init();

    debug!("options: {args:?}");

    let mut ctx = FatalContext {
        options: Some(format!("{args:?}")),
        ..FatalContext::default()
    };
    match updater::run(&args, &mut ctx).await {
        Ok(summary) => {
            println!(
                "New credentials have been saved to the profile '{}', expires {}",
                summary.profile, summary.expires
            );
        }
        Err(err) => {
            eprintln!("ERROR: {err}");
            debug!("debug info: {ctx:?}");
            exit(1);
        }
    }
}
