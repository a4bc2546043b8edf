//! sndinfo - Inspect sound files and libsndfile format tables.
//!
//! This tool opens sound files through libsndfile and reports their stream
//! parameters and header metadata, or lists the formats the linked library
//! supports.

mod cli;
mod commands;
mod output;

use anyhow::Result;
use clap::Parser;

use cli::{Args, Command};

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // Run the appropriate command
    if let Err(e) = run(args) {
        output::print_error(&e);
        std::process::exit(1);
    }
}

/// Main dispatch function.
fn run(args: Args) -> Result<()> {
    // Validate arguments
    args.validate().map_err(|e| anyhow::anyhow!("{}", e))?;

    if !sndfile_rs::is_linked() {
        output::print_warning(
            "built without libsndfile; every query will fail",
            args.quiet,
        );
    }

    // Dispatch to appropriate command
    match &args.command {
        Command::Info(info) => commands::info::run(&args, info),
        Command::Formats(formats) => commands::formats::run(&args, formats),
        Command::Version => commands::version::run(&args),
    }
}
