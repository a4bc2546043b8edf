//! Command-line argument definitions using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Inspect sound files and libsndfile format tables.
///
/// sndinfo reports stream parameters and header metadata (peak, loop,
/// instrument, broadcast, cart and cue chunks) of any file libsndfile can
/// open, and lists the formats the linked library supports.
#[derive(Parser, Debug)]
#[command(name = "sndinfo")]
#[command(author, version, about, long_about = None)]
#[command(after_help = EXAMPLES)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    // ========================================================================
    // Output Control
    // ========================================================================
    /// Show detailed progress and information
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress warnings and notes
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show stream parameters and metadata of a sound file
    Info(InfoArgs),

    /// List the formats supported by libsndfile
    Formats(FormatsArgs),

    /// Print the libsndfile version
    Version,
}

/// Arguments of `sndinfo info`.
#[derive(clap::Args, Debug)]
pub struct InfoArgs {
    /// Sound file to inspect
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Scan the audio for per-channel peaks
    ///
    /// This reads the whole file.
    #[arg(long)]
    pub calc_max: bool,

    /// Print libsndfile's log for the file
    #[arg(long)]
    pub log: bool,
}

/// Arguments of `sndinfo formats`.
#[derive(clap::Args, Debug)]
pub struct FormatsArgs {
    /// Also list sample encodings
    #[arg(long)]
    pub subtypes: bool,

    /// List the simple (container plus encoding) formats instead
    #[arg(long, conflicts_with = "subtypes")]
    pub simple: bool,
}

impl Args {
    /// Validate argument combinations.
    pub fn validate(&self) -> Result<(), String> {
        // Quiet and verbose are mutually exclusive
        if self.quiet && self.verbose {
            return Err("Cannot use both --quiet and --verbose".to_string());
        }

        // Check input file exists
        if let Command::Info(info) = &self.command {
            if !info.file.exists() {
                return Err(format!("Input file not found: {}", info.file.display()));
            }
        }

        Ok(())
    }
}

/// Example usage shown in --help.
const EXAMPLES: &str = r#"
EXAMPLES:
    # Stream parameters and header metadata
    sndinfo info take.wav

    # Include per-channel peaks and the open log
    sndinfo info --calc-max --log take.wav

    # Container formats, then encodings too
    sndinfo formats
    sndinfo formats --subtypes

    # Library version
    sndinfo version
"#;
