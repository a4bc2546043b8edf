//! Terminal output formatting utilities.

use colored::Colorize;

/// Print an error message to stderr.
pub fn print_error(err: &anyhow::Error) {
    eprintln!("{}: {}", "error".red().bold(), err);

    // Print cause chain
    for cause in err.chain().skip(1) {
        eprintln!("  {}: {}", "caused by".red(), cause);
    }
}

/// Print a warning message to stderr (respects quiet mode).
pub fn print_warning(msg: &str, quiet: bool) {
    if !quiet {
        eprintln!("{}: {}", "warning".yellow().bold(), msg);
    }
}

/// Print a verbose message (only in verbose mode).
pub fn print_verbose(msg: &str, verbose: bool) {
    if verbose {
        println!("{}: {}", "info".blue(), msg);
    }
}

/// Print a header line.
pub fn print_header(title: &str) {
    println!("\n{}", title.bold().underline());
}

/// Print a key-value pair.
pub fn print_kv(key: &str, value: &str, indent: usize) {
    let padding = " ".repeat(indent);
    println!("{}{}: {}", padding, key.dimmed(), value);
}

/// Print a separator line.
pub fn print_separator() {
    println!("{}", "─".repeat(60).dimmed());
}

/// Format a number with thousands separators.
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();

    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }

    result
}

/// Format a duration in seconds to a human-readable string.
pub fn format_duration(seconds: f64) -> String {
    if seconds < 1.0 {
        format!("{:.0}ms", seconds * 1000.0)
    } else if seconds < 60.0 {
        format!("{:.2}s", seconds)
    } else {
        let mins = (seconds / 60.0).floor();
        let secs = seconds % 60.0;
        format!("{}m {:.1}s", mins, secs)
    }
}

/// Format a normalised peak as dBFS.
pub fn format_dbfs(peak: f64) -> String {
    if peak <= 0.0 {
        "-inf dBFS".to_string()
    } else {
        format!("{:.1} dBFS", 20.0 * peak.log10())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.5), "500ms");
        assert_eq!(format_duration(1.5), "1.50s");
        assert_eq!(format_duration(90.0), "1m 30.0s");
    }

    #[test]
    fn test_format_dbfs() {
        assert_eq!(format_dbfs(1.0), "0.0 dBFS");
        assert_eq!(format_dbfs(0.5), "-6.0 dBFS");
        assert_eq!(format_dbfs(0.0), "-inf dBFS");
    }
}
