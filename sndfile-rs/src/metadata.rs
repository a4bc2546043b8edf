//! Metadata payloads exchanged through `sf_command`.
//!
//! Each type here is `repr(C)` with the byte layout of the matching libsndfile
//! struct, so it can be copied into and out of a scratch buffer unchanged.
//! Fixed-width text fields are stored as raw bytes; text accessors stop at the
//! first NUL, and setters truncate to the field width.

use std::borrow::Cow;
use std::ffi::CStr;
use std::fmt;
use std::mem::size_of;

use libc::{c_char, c_int};
use sndfile_sys as ffi;

use crate::format::Format;
use crate::scratch::{plain_structs, Pod};

/// Number of loops in an instrument chunk.
pub const INSTRUMENT_LOOPS: usize = 16;

/// Capacity of the cue point table.
pub const MAX_CUE_POINTS: usize = 100;

/// Capacity of the broadcast coding history.
pub const CODING_HISTORY_SIZE: usize = 256;

/// Capacity of the cart tag text.
pub const TAG_TEXT_SIZE: usize = 256;

/// Decode a fixed-width text field.
pub(crate) fn field_text(bytes: &[u8]) -> Cow<'_, str> {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end])
}

/// Overwrite a fixed-width text field, zero-filling the remainder.
///
/// Returns the number of bytes stored.
pub(crate) fn set_field_text(dst: &mut [u8], value: &str) -> usize {
    let n = value.len().min(dst.len());
    dst.fill(0);
    dst[..n].copy_from_slice(&value.as_bytes()[..n]);
    n
}

macro_rules! text_accessors {
    ($ty:ty { $($field:ident => $setter:ident),* $(,)? }) => {
        impl $ty {
            $(
                #[doc = concat!("The `", stringify!($field), "` field as text.")]
                pub fn $field(&self) -> Cow<'_, str> {
                    field_text(&self.$field)
                }

                #[doc = concat!("Set the `", stringify!($field), "` field, truncating to its width.")]
                pub fn $setter(&mut self, value: &str) {
                    set_field_text(&mut self.$field, value);
                }
            )*
        }
    };
}

macro_rules! zeroed_default {
    ($($ty:ty),*) => {
        $(
            impl Default for $ty {
                fn default() -> Self {
                    <$ty as Pod>::zeroed()
                }
            }
        )*
    };
}

// ============================================================================
// Loop / tempo
// ============================================================================

/// Loop modes used by loop info and instrument loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum LoopMode {
    /// No looping.
    None = ffi::SF_LOOP_NONE,
    /// Loop forward.
    Forward = ffi::SF_LOOP_FORWARD,
    /// Loop backward.
    Backward = ffi::SF_LOOP_BACKWARD,
    /// Ping-pong.
    Alternating = ffi::SF_LOOP_ALTERNATING,
}

impl LoopMode {
    /// Decode a raw loop mode.
    pub fn from_raw(value: i32) -> Option<Self> {
        match value {
            ffi::SF_LOOP_NONE => Some(LoopMode::None),
            ffi::SF_LOOP_FORWARD => Some(LoopMode::Forward),
            ffi::SF_LOOP_BACKWARD => Some(LoopMode::Backward),
            ffi::SF_LOOP_ALTERNATING => Some(LoopMode::Alternating),
            _ => None,
        }
    }
}

/// Tempo and loop information (`SF_LOOP_INFO`), found in ACID and Apple loops.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopInfo {
    /// Time signature numerator.
    pub time_sig_num: i16,
    /// Time signature denominator.
    pub time_sig_den: i16,
    /// One of the [`LoopMode`] values.
    pub loop_mode: i32,
    /// Number of beats in the loop.
    pub num_beats: i32,
    /// Tempo.
    pub bpm: f32,
    /// MIDI note of the root key.
    pub root_key: i32,
    /// Reserved.
    pub future: [i32; 6],
}

impl LoopInfo {
    /// The decoded loop mode.
    pub fn mode(&self) -> Option<LoopMode> {
        LoopMode::from_raw(self.loop_mode)
    }
}

// ============================================================================
// Instrument
// ============================================================================

/// One sustain loop of an instrument chunk.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InstrumentLoop {
    /// One of the [`LoopMode`] values.
    pub mode: i32,
    /// First frame of the loop.
    pub start: u32,
    /// Frame after the loop.
    pub end: u32,
    /// Play count, zero for infinite.
    pub count: u32,
}

impl InstrumentLoop {
    /// The decoded loop mode.
    pub fn loop_mode(&self) -> Option<LoopMode> {
        LoopMode::from_raw(self.mode)
    }
}

/// Sampler instrument chunk (`SF_INSTRUMENT`).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instrument {
    /// Gain in dB.
    pub gain: i32,
    /// MIDI note of the unpitched sample.
    pub basenote: i8,
    /// Detune in cents.
    pub detune: i8,
    /// Lowest velocity.
    pub velocity_lo: i8,
    /// Highest velocity.
    pub velocity_hi: i8,
    /// Lowest key.
    pub key_lo: i8,
    /// Highest key.
    pub key_hi: i8,
    _pad: [u8; 2],
    /// Number of valid entries in `loops`.
    pub loop_count: i32,
    /// Loop table.
    pub loops: [InstrumentLoop; INSTRUMENT_LOOPS],
}

impl Instrument {
    /// The valid loops.
    pub fn active_loops(&self) -> &[InstrumentLoop] {
        let n = self.loop_count.clamp(0, INSTRUMENT_LOOPS as i32) as usize;
        &self.loops[..n]
    }
}

// ============================================================================
// Broadcast extension
// ============================================================================

/// Broadcast Wave extension chunk (`SF_BROADCAST_INFO`) with 256 bytes of
/// coding history.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct BroadcastInfo {
    /// Free description.
    pub description: [u8; 256],
    /// Producer name.
    pub originator: [u8; 32],
    /// Producer reference.
    pub originator_reference: [u8; 32],
    /// `yyyy-mm-dd`.
    pub origination_date: [u8; 10],
    /// `hh-mm-ss`.
    pub origination_time: [u8; 8],
    _pad: [u8; 2],
    /// Low word of the first-sample time reference.
    pub time_reference_low: u32,
    /// High word of the first-sample time reference.
    pub time_reference_high: u32,
    /// BWF version.
    pub version: i16,
    /// SMPTE UMID.
    pub umid: [u8; 64],
    /// Integrated loudness, LUFS x100.
    pub loudness_value: i16,
    /// Loudness range, LU x100.
    pub loudness_range: i16,
    /// Maximum true peak, dBTP x100.
    pub max_true_peak_level: i16,
    /// Maximum momentary loudness, LUFS x100.
    pub max_momentary_loudness: i16,
    /// Maximum short-term loudness, LUFS x100.
    pub max_shortterm_loudness: i16,
    /// Reserved.
    pub reserved: [u8; 180],
    /// Bytes used in `coding_history`.
    pub coding_history_size: u32,
    /// Coding history text.
    pub coding_history: [u8; CODING_HISTORY_SIZE],
}

text_accessors!(BroadcastInfo {
    description => set_description,
    originator => set_originator,
    originator_reference => set_originator_reference,
    origination_date => set_origination_date,
    origination_time => set_origination_time,
    umid => set_umid,
});

impl BroadcastInfo {
    /// Sample count since midnight of the first sample.
    pub fn time_reference(&self) -> u64 {
        (u64::from(self.time_reference_high) << 32) | u64::from(self.time_reference_low)
    }

    /// Set the time reference.
    pub fn set_time_reference(&mut self, samples: u64) {
        self.time_reference_low = samples as u32;
        self.time_reference_high = (samples >> 32) as u32;
    }

    /// The coding history, bounded by `coding_history_size`.
    pub fn coding_history(&self) -> Cow<'_, str> {
        let n = (self.coding_history_size as usize).min(CODING_HISTORY_SIZE);
        field_text(&self.coding_history[..n])
    }

    /// Replace the coding history and its size.
    pub fn set_coding_history(&mut self, value: &str) {
        self.coding_history_size = set_field_text(&mut self.coding_history, value) as u32;
    }
}

impl fmt::Debug for BroadcastInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BroadcastInfo")
            .field("description", &self.description())
            .field("originator", &self.originator())
            .field("originator_reference", &self.originator_reference())
            .field("origination_date", &self.origination_date())
            .field("origination_time", &self.origination_time())
            .field("time_reference", &self.time_reference())
            .field("version", &self.version)
            .field("coding_history", &self.coding_history())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Cart chunk
// ============================================================================

/// A post timer of the cart chunk.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CartTimer {
    /// Four-character usage code.
    pub usage: [u8; 4],
    /// Sample offset.
    pub value: i32,
}

text_accessors!(CartTimer { usage => set_usage });

/// Broadcast cart chunk (`SF_CART_INFO`) with 256 bytes of tag text.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CartInfo {
    /// Cart version.
    pub version: [u8; 4],
    /// Cut title.
    pub title: [u8; 64],
    /// Artist.
    pub artist: [u8; 64],
    /// Cut number.
    pub cut_id: [u8; 64],
    /// Client.
    pub client_id: [u8; 64],
    /// Category.
    pub category: [u8; 64],
    /// Classification.
    pub classification: [u8; 64],
    /// Out cue text.
    pub out_cue: [u8; 64],
    /// `yyyy-mm-dd`.
    pub start_date: [u8; 10],
    /// `hh:mm:ss`.
    pub start_time: [u8; 8],
    /// `yyyy-mm-dd`.
    pub end_date: [u8; 10],
    /// `hh:mm:ss`.
    pub end_time: [u8; 8],
    /// Producing application.
    pub producer_app_id: [u8; 64],
    /// Producing application version.
    pub producer_app_version: [u8; 64],
    /// User defined text.
    pub user_def: [u8; 64],
    /// Sample value for 0 dB.
    pub level_reference: i32,
    /// Post timers.
    pub post_timers: [CartTimer; 8],
    /// Reserved.
    pub reserved: [u8; 276],
    /// Related URL.
    pub url: [u8; 1024],
    /// Bytes used in `tag_text`.
    pub tag_text_size: u32,
    /// Free tag text.
    pub tag_text: [u8; TAG_TEXT_SIZE],
}

text_accessors!(CartInfo {
    version => set_version,
    title => set_title,
    artist => set_artist,
    cut_id => set_cut_id,
    client_id => set_client_id,
    category => set_category,
    classification => set_classification,
    out_cue => set_out_cue,
    start_date => set_start_date,
    start_time => set_start_time,
    end_date => set_end_date,
    end_time => set_end_time,
    producer_app_id => set_producer_app_id,
    producer_app_version => set_producer_app_version,
    user_def => set_user_def,
    url => set_url,
});

impl CartInfo {
    /// The tag text, bounded by `tag_text_size`.
    pub fn tag_text(&self) -> Cow<'_, str> {
        let n = (self.tag_text_size as usize).min(TAG_TEXT_SIZE);
        field_text(&self.tag_text[..n])
    }

    /// Replace the tag text and its size.
    pub fn set_tag_text(&mut self, value: &str) {
        self.tag_text_size = set_field_text(&mut self.tag_text, value) as u32;
    }
}

impl fmt::Debug for CartInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartInfo")
            .field("version", &self.version())
            .field("title", &self.title())
            .field("artist", &self.artist())
            .field("cut_id", &self.cut_id())
            .field("level_reference", &self.level_reference)
            .field("tag_text", &self.tag_text())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Cues
// ============================================================================

/// A single cue point (`SF_CUE_POINT`).
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CuePoint {
    /// Cue identifier.
    pub indx: i32,
    /// Play order position.
    pub position: u32,
    /// Chunk id of the data chunk.
    pub fcc_chunk: i32,
    /// Chunk start offset.
    pub chunk_start: i32,
    /// Block start offset.
    pub block_start: i32,
    /// Sample offset of the cue.
    pub sample_offset: u32,
    /// Label.
    pub name: [u8; 256],
}

text_accessors!(CuePoint { name => set_name });

impl fmt::Debug for CuePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CuePoint")
            .field("indx", &self.indx)
            .field("position", &self.position)
            .field("sample_offset", &self.sample_offset)
            .field("name", &self.name())
            .finish_non_exhaustive()
    }
}

/// Cue point table (`SF_CUES`) with room for [`MAX_CUE_POINTS`] entries.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Cues {
    /// Number of valid entries.
    pub cue_count: u32,
    /// Entry table.
    pub cue_points: [CuePoint; MAX_CUE_POINTS],
}

impl Cues {
    /// Build a table from a list of points, keeping at most [`MAX_CUE_POINTS`].
    pub fn from_points(points: &[CuePoint]) -> Self {
        let mut cues = Cues::default();
        let n = points.len().min(MAX_CUE_POINTS);
        cues.cue_points[..n].copy_from_slice(&points[..n]);
        cues.cue_count = n as u32;
        cues
    }

    /// The valid entries.
    pub fn points(&self) -> &[CuePoint] {
        let n = (self.cue_count as usize).min(MAX_CUE_POINTS);
        &self.cue_points[..n]
    }
}

impl fmt::Debug for Cues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.points()).finish()
    }
}

// ============================================================================
// Embedded files, formats, ambisonics
// ============================================================================

/// Location of a sound file embedded in a larger file (`SF_EMBED_FILE_INFO`).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EmbedFileInfo {
    /// Byte offset of the embedded file.
    pub offset: i64,
    /// Byte length of the embedded file.
    pub length: i64,
}

/// Description of a major format, subtype or simple format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatInfo {
    /// The format word.
    pub format: Format,
    /// Human readable name.
    pub name: String,
    /// Usual file extension, when there is one.
    pub extension: Option<String>,
}

const FORMAT_INFO_PAD: usize =
    size_of::<ffi::SF_FORMAT_INFO>() - size_of::<c_int>() - 2 * size_of::<*const c_char>();

/// `SF_FORMAT_INFO` with the gap after `format` made explicit.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub(crate) struct RawFormatInfo {
    pub(crate) format: c_int,
    _pad: [u8; FORMAT_INFO_PAD],
    pub(crate) name: *const c_char,
    pub(crate) extension: *const c_char,
}

const _: () = assert!(size_of::<RawFormatInfo>() == size_of::<ffi::SF_FORMAT_INFO>());

impl RawFormatInfo {
    /// A query for `format` (or a table index) with empty strings.
    pub(crate) const fn seed(format: c_int) -> Self {
        RawFormatInfo {
            format,
            _pad: [0; FORMAT_INFO_PAD],
            name: std::ptr::null(),
            extension: std::ptr::null(),
        }
    }
}

impl FormatInfo {
    /// Decode the library-owned strings of an `SF_FORMAT_INFO`.
    ///
    /// # Safety
    ///
    /// Non-null `name` and `extension` must point to NUL-terminated strings.
    pub(crate) unsafe fn from_raw(raw: &RawFormatInfo) -> Self {
        let text = |ptr: *const c_char| {
            if ptr.is_null() {
                None
            } else {
                Some(CStr::from_ptr(ptr).to_string_lossy().into_owned())
            }
        };
        FormatInfo {
            format: Format::from_raw(raw.format),
            name: text(raw.name).unwrap_or_default(),
            extension: text(raw.extension).filter(|ext| !ext.is_empty()),
        }
    }
}

/// WAVEX ambisonic modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ambisonic {
    /// Plain channel layout.
    None,
    /// Ambisonic B-format.
    BFormat,
}

impl Ambisonic {
    /// The mode's bit value.
    pub const fn bits(self) -> i32 {
        match self {
            Ambisonic::None => ffi::SF_AMBISONIC_NONE,
            Ambisonic::BFormat => ffi::SF_AMBISONIC_B_FORMAT,
        }
    }

    /// Decode a bit value.
    pub const fn from_bits(bits: i32) -> Option<Self> {
        match bits {
            ffi::SF_AMBISONIC_NONE => Some(Ambisonic::None),
            ffi::SF_AMBISONIC_B_FORMAT => Some(Ambisonic::BFormat),
            _ => None,
        }
    }
}

plain_structs! {
    LoopInfo { i16, i16, i32, i32, f32, i32, [i32; 6] }
    InstrumentLoop { i32, u32, u32, u32 }
    Instrument { i32, [i8; 6], [u8; 2], i32, [InstrumentLoop; INSTRUMENT_LOOPS] }
    BroadcastInfo {
        [u8; 256], [u8; 32], [u8; 32], [u8; 10], [u8; 8], [u8; 2],
        u32, u32, i16, [u8; 64], [i16; 5], [u8; 180], u32, [u8; CODING_HISTORY_SIZE],
    }
    CartTimer { [u8; 4], i32 }
    CartInfo {
        [u8; 4], [[u8; 64]; 7], [u8; 10], [u8; 8], [u8; 10], [u8; 8], [[u8; 64]; 3],
        i32, [CartTimer; 8], [u8; 276], [u8; 1024], u32, [u8; TAG_TEXT_SIZE],
    }
    CuePoint { i32, u32, i32, i32, i32, u32, [u8; 256] }
    Cues { u32, [CuePoint; MAX_CUE_POINTS] }
    EmbedFileInfo { i64, i64 }
    RawFormatInfo { c_int, [u8; FORMAT_INFO_PAD], *const c_char, *const c_char }
}

zeroed_default!(LoopInfo, Instrument, BroadcastInfo, CartInfo, CuePoint, Cues);
