//! Implementation of `sndinfo version`.

use anyhow::{Context, Result};
use sndfile_rs::Dispatcher;

use crate::cli::Args;
use crate::output::print_verbose;

/// Print the libsndfile version string.
pub fn run(args: &Args) -> Result<()> {
    print_verbose(
        &format!("sndinfo {}", env!("CARGO_PKG_VERSION")),
        args.verbose,
    );
    let version = Dispatcher::native()
        .lib_version()
        .context("Failed to query libsndfile version")?;
    println!("{}", version);
    Ok(())
}
