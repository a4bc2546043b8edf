//! Classification of raw `sf_command` results.
//!
//! The same `int` return slot means different things per opcode. A
//! [`ResultFamily`] names the rule, and [`classify`] applies it. A `1` is
//! "present" for metadata getters, "true" for toggles and a failure for value
//! queries.

use sndfile_sys::{SF_FALSE, SF_TRUE};

/// Rule used to interpret an opcode's raw result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultFamily {
    /// `0` absent, `1` present, anything else fatal.
    Presence,
    /// `0` false, `1` true, anything else fatal.
    Toggle,
    /// A non-negative result is a mode bit pattern, compared by the caller;
    /// a negative one is fatal.
    BitFlag,
    /// `0` success, anything else fatal.
    Value,
    /// `0` success with one value per requested channel, anything else fatal.
    Array,
    /// Any non-negative result (the copied length) is success.
    Text,
}

/// Outcome of classifying one raw result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The call failed.
    Fatal,
    /// A boolean reply.
    Boolean(bool),
    /// The requested metadata is not in the file.
    Absent,
    /// The requested metadata was written to the buffer.
    Present,
    /// The call succeeded and its payload, if any, is in the buffer.
    Success,
    /// A raw mode bit pattern.
    Flag(i32),
}

impl Verdict {
    /// Whether the verdict must be surfaced as an error.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Verdict::Fatal)
    }
}

/// Classify `raw` according to `family`.
///
/// # Example
///
/// ```
/// use sndfile_rs::{classify, ResultFamily, Verdict};
///
/// assert_eq!(classify(ResultFamily::Toggle, 1), Verdict::Boolean(true));
/// assert_eq!(classify(ResultFamily::Presence, 1), Verdict::Present);
/// assert_eq!(classify(ResultFamily::Value, 1), Verdict::Fatal);
/// ```
pub const fn classify(family: ResultFamily, raw: i32) -> Verdict {
    match family {
        ResultFamily::Presence => match raw {
            SF_FALSE => Verdict::Absent,
            SF_TRUE => Verdict::Present,
            _ => Verdict::Fatal,
        },
        ResultFamily::Toggle => match raw {
            SF_FALSE => Verdict::Boolean(false),
            SF_TRUE => Verdict::Boolean(true),
            _ => Verdict::Fatal,
        },
        ResultFamily::BitFlag => {
            if raw < 0 {
                Verdict::Fatal
            } else {
                Verdict::Flag(raw)
            }
        }
        ResultFamily::Value | ResultFamily::Array => {
            if raw == 0 {
                Verdict::Success
            } else {
                Verdict::Fatal
            }
        }
        ResultFamily::Text => {
            if raw < 0 {
                Verdict::Fatal
            } else {
                Verdict::Success
            }
        }
    }
}

/// Whether a mode reply matches the requested mode exactly.
///
/// Mode values are bit patterns; a single differing bit is a mismatch.
pub const fn flag_matches(requested: i32, raw: i32) -> bool {
    requested == raw
}
