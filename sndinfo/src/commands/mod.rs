//! Subcommand implementations.

pub mod formats;
pub mod info;
pub mod version;
