//! Implementation of `sndinfo formats`.

use anyhow::{Context, Result};
use colored::Colorize;
use sndfile_rs::{Dispatcher, FormatInfo};

use crate::cli::{Args, FormatsArgs};
use crate::output::{print_header, print_verbose};

/// List the formats supported by libsndfile.
pub fn run(args: &Args, formats: &FormatsArgs) -> Result<()> {
    let sf = Dispatcher::native();

    if formats.simple {
        let count = sf
            .simple_format_count()
            .context("Failed to count simple formats")?;
        print_verbose(&format!("{} simple formats", count), args.verbose);
        let entries = (0..count)
            .map(|i| sf.simple_format(i))
            .collect::<sndfile_rs::Result<Vec<_>>>()
            .context("Failed to read simple format table")?;
        print_header("Simple formats");
        print_table(&entries);
        return Ok(());
    }

    let count = sf
        .major_format_count()
        .context("Failed to count major formats")?;
    print_verbose(&format!("{} major formats", count), args.verbose);
    let entries = (0..count)
        .map(|i| sf.major_format(i))
        .collect::<sndfile_rs::Result<Vec<_>>>()
        .context("Failed to read major format table")?;
    print_header("Major formats");
    print_table(&entries);

    if formats.subtypes {
        let count = sf
            .subtype_format_count()
            .context("Failed to count subtypes")?;
        print_verbose(&format!("{} subtypes", count), args.verbose);
        let entries = (0..count)
            .map(|i| sf.subtype_format(i))
            .collect::<sndfile_rs::Result<Vec<_>>>()
            .context("Failed to read subtype table")?;
        print_header("Subtypes");
        print_table(&entries);
    }

    Ok(())
}

fn print_table(entries: &[FormatInfo]) {
    for entry in entries {
        println!(
            "  {}  {:<40} {}",
            entry.format.to_string().dimmed(),
            entry.name,
            entry.extension.as_deref().unwrap_or("")
        );
    }
}
