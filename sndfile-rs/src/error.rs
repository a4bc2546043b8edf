//! Error types for libsndfile operations.
//!
//! This module provides the [`Error`] enum covering every failure mode of the
//! command dispatcher and the stream wrapper, along with a convenient
//! [`Result`] type alias.
//!
//! Errors fall into three groups:
//!
//! - **caller errors**, raised before any native call is attempted
//!   ([`Error::NullHandle`], [`Error::EmptyPayload`], [`Error::OutOfRange`]);
//! - **native failures**, where libsndfile rejected the operation or returned
//!   an unusable payload ([`Error::Native`]), including text cut short by a
//!   small buffer ([`Error::TextTruncated`]);
//! - **unsupported shapes**, a programming error where an opcode was routed
//!   through a dispatch routine that cannot marshal it ([`Error::UnsupportedShape`]).

use std::ffi::NulError;
use std::path::PathBuf;
use thiserror::Error;

use crate::opcode::{Opcode, PayloadShape};

/// Result type alias for libsndfile operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to libsndfile.
#[derive(Error, Debug)]
pub enum Error {
    /// A null handle was passed to an opcode that needs an open stream.
    #[error("{opcode} requires an open stream, got a null handle")]
    NullHandle {
        /// The rejected opcode.
        opcode: Opcode,
    },

    /// An array payload was empty.
    #[error("{opcode} requires a non-empty {what}")]
    EmptyPayload {
        /// The rejected opcode.
        opcode: Opcode,
        /// What the payload describes.
        what: &'static str,
    },

    /// A numeric payload was outside its accepted range.
    #[error("{opcode}: {what} out of range: {value} (expected {expected})")]
    OutOfRange {
        /// The rejected opcode.
        opcode: Opcode,
        /// Name of the argument.
        what: &'static str,
        /// The offending value, formatted.
        value: String,
        /// The accepted range, formatted.
        expected: &'static str,
    },

    /// libsndfile reported a failure for a command.
    #[error("{opcode} failed (result {code}): {message}")]
    Native {
        /// The opcode that failed.
        opcode: Opcode,
        /// The raw value returned by `sf_command`.
        code: i32,
        /// Human readable description.
        message: String,
    },

    /// Text output filled its buffer and was cut short.
    #[error("{opcode}: text does not fit in {capacity} bytes")]
    TextTruncated {
        /// The text opcode.
        opcode: Opcode,
        /// The buffer size that was too small.
        capacity: usize,
    },

    /// The opcode cannot be marshalled by the routine it was sent to.
    #[error("{opcode} cannot be dispatched as {expected} (declared shape: {shape})")]
    UnsupportedShape {
        /// The opcode.
        opcode: Opcode,
        /// The routine's expectation.
        expected: &'static str,
        /// The shape declared for the opcode.
        shape: PayloadShape,
    },

    /// The payload does not fit in the `int` size slot of `sf_command`.
    #[error("{opcode}: payload of {size} bytes exceeds the command size limit")]
    PayloadTooLarge {
        /// The opcode.
        opcode: Opcode,
        /// Requested size in bytes.
        size: usize,
    },

    /// The sound file could not be opened.
    #[error("Failed to open sound file {path}: {message}")]
    OpenFailed {
        /// Path to the file that could not be opened.
        path: PathBuf,
        /// libsndfile's description of the failure.
        message: String,
    },

    /// A stream operation failed.
    #[error("Stream error {code}: {message}")]
    Stream {
        /// libsndfile error number.
        code: i32,
        /// libsndfile's description of the error.
        message: String,
    },

    /// Frame buffer length is not a whole number of frames.
    #[error("Buffer of {len} samples is not a multiple of {channels} channels")]
    PartialFrame {
        /// Buffer length in samples.
        len: usize,
        /// Channel count of the stream.
        channels: usize,
    },

    /// The path is not valid UTF-8.
    #[error("Path contains invalid UTF-8: {0}")]
    InvalidPath(PathBuf),

    /// Error converting a Rust string to C string (embedded null byte).
    #[error("Invalid C string: {0}")]
    CString(#[from] NulError),
}

impl Error {
    /// Create a Native error.
    pub fn native(opcode: Opcode, code: i32, message: impl Into<String>) -> Self {
        Self::Native {
            opcode,
            code,
            message: message.into(),
        }
    }

    /// Create an OutOfRange error.
    pub fn out_of_range(
        opcode: Opcode,
        what: &'static str,
        value: impl ToString,
        expected: &'static str,
    ) -> Self {
        Self::OutOfRange {
            opcode,
            what,
            value: value.to_string(),
            expected,
        }
    }

    /// Create an UnsupportedShape error.
    pub const fn unsupported(opcode: Opcode, expected: &'static str) -> Self {
        Self::UnsupportedShape {
            opcode,
            expected,
            shape: opcode.shape(),
        }
    }

    /// Whether this error is a misuse of the API detected before any native
    /// call was made.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Error::NullHandle { .. }
                | Error::EmptyPayload { .. }
                | Error::OutOfRange { .. }
                | Error::PartialFrame { .. }
                | Error::InvalidPath(_)
                | Error::CString(_)
        )
    }

    /// The opcode involved, for command errors.
    pub fn opcode(&self) -> Option<Opcode> {
        match self {
            Error::NullHandle { opcode }
            | Error::EmptyPayload { opcode, .. }
            | Error::OutOfRange { opcode, .. }
            | Error::Native { opcode, .. }
            | Error::TextTruncated { opcode, .. }
            | Error::UnsupportedShape { opcode, .. }
            | Error::PayloadTooLarge { opcode, .. } => Some(*opcode),
            _ => None,
        }
    }
}
