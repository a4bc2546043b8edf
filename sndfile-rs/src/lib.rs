//! # sndfile-rs
//!
//! Safe, typed Rust bindings for [libsndfile](https://libsndfile.github.io/libsndfile/).
//!
//! libsndfile exposes most of its features through a single entry point,
//! `sf_command(handle, opcode, data, size)`, where every opcode has its own
//! payload layout and its own reading of the `int` result. This crate turns
//! that into typed methods: the payload shape, the handle requirement and the
//! result rule of each [`Opcode`] are fixed at compile time, and every call
//! runs through one [`Dispatcher`] that validates, marshals, classifies and
//! decodes.
//!
//! ## Quick Start
//!
//! ### Library queries
//!
//! ```no_run
//! use sndfile_rs::{Dispatcher, Result};
//!
//! fn main() -> Result<()> {
//!     let sf = Dispatcher::native();
//!     println!("{}", sf.lib_version()?);
//!
//!     for i in 0..sf.major_format_count()? {
//!         let format = sf.major_format(i)?;
//!         println!("{:<24} {}", format.name, format.extension.unwrap_or_default());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ### Stream metadata
//!
//! ```no_run
//! use sndfile_rs::{Mode, Result, SoundFile};
//!
//! fn main() -> Result<()> {
//!     let file = SoundFile::open("take.wav", Mode::Read, None)?;
//!     let commands = file.commands();
//!
//!     match commands.loop_info()? {
//!         Some(info) => println!("{} beats at {} bpm", info.num_beats, info.bpm),
//!         None => println!("no loop metadata"),
//!     }
//!
//!     let peaks = commands.calc_max_all_channels(file.info().channels as usize)?;
//!     println!("peaks: {:?}", peaks);
//!     Ok(())
//! }
//! ```
//!
//! ## Result Families
//!
//! | Family | Examples | Result reading |
//! |--------|----------|----------------|
//! | Presence | loop, instrument, broadcast | `0` absent, `1` present |
//! | Toggle | clipping, normalisation | `0` false, `1` true |
//! | BitFlag | ambisonic mode | compared to the requested bits |
//! | Value | format tables, signal max | `0` success |
//! | Array | per-channel peaks | `0` success |
//! | Text | version, log | copied length |
//!
//! Any other result is an [`Error::Native`].
//!
//! ## Feature Flags
//!
//! - `static`: Force static linking of libsndfile
//!
//! ## Thread Safety
//!
//! The dispatcher keeps no state between calls. Streams must not be shared
//! across threads; [`SoundFile`] and [`Handle`] are `!Send + !Sync`.

#![deny(missing_docs)]

// Modules
mod backend;
mod classify;
mod commands;
mod dispatch;
mod error;
mod file;
mod format;
mod handle;
pub mod metadata;
mod opcode;
mod scratch;

// Public exports
pub use backend::{Backend, LibSndfile};
pub use classify::{classify, flag_matches, ResultFamily, Verdict};
pub use commands::{Commands, DEFAULT_LOG_CAPACITY, DEFAULT_VERSION_CAPACITY};
pub use dispatch::Dispatcher;
pub use error::{Error, Result};
pub use file::{format_check, Mode, Sample, SoundFile, Tag, Whence};
pub use format::{Format, SoundInfo};
pub use handle::Handle;
pub use metadata::{
    Ambisonic, BroadcastInfo, CartInfo, Cues, EmbedFileInfo, FormatInfo, Instrument, LoopInfo,
};
pub use opcode::{Convention, Opcode, PayloadShape};
pub use scratch::{Pod, ScratchBuffer};

/// Whether this build is linked against a real libsndfile.
pub const fn is_linked() -> bool {
    sndfile_sys::LINKED
}
