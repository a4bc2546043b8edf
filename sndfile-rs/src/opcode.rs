//! The `sf_command` opcode table.
//!
//! libsndfile multiplexes dozens of operations through one entry point,
//! `sf_command(handle, opcode, data, size)`. Each [`Opcode`] fixes, at compile
//! time, three things about its call:
//!
//! - the [`PayloadShape`] of the `data`/`size` pair,
//! - the [`Convention`] the result slot follows (and whether a handle is needed),
//! - the [`ResultFamily`] used to classify the raw result.

use std::fmt;
use std::mem::size_of;

use libc::c_int;
use sndfile_sys as ffi;

use crate::classify::ResultFamily;
use crate::format::SoundInfo;
use crate::metadata::{BroadcastInfo, CartInfo, Cues, EmbedFileInfo, Instrument, LoopInfo};

/// Layout of the `data`/`size` pair passed to `sf_command`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadShape {
    /// Null data pointer, zero size.
    None,
    /// Null data pointer; a small integer (boolean or mode bits) travels in the size slot.
    Arg,
    /// One `int`.
    Int32,
    /// One `sf_count_t`.
    Int64,
    /// One `double`.
    Double,
    /// One `double` per channel.
    DoubleArray,
    /// One `int` per channel.
    Int32Array,
    /// A fixed-size C struct of the given byte size.
    Struct(usize),
    /// A caller-sized NUL-terminated character buffer.
    Text,
}

impl PayloadShape {
    /// Whether the shape is carried through a scratch buffer.
    pub const fn needs_buffer(&self) -> bool {
        !matches!(self, PayloadShape::None | PayloadShape::Arg)
    }
}

impl fmt::Display for PayloadShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadShape::None => write!(f, "none"),
            PayloadShape::Arg => write!(f, "size-slot argument"),
            PayloadShape::Int32 => write!(f, "int32"),
            PayloadShape::Int64 => write!(f, "int64"),
            PayloadShape::Double => write!(f, "double"),
            PayloadShape::DoubleArray => write!(f, "double[]"),
            PayloadShape::Int32Array => write!(f, "int32[]"),
            PayloadShape::Struct(size) => write!(f, "struct ({} bytes)", size),
            PayloadShape::Text => write!(f, "text buffer"),
        }
    }
}

/// How an opcode uses the result slot, and whether it needs an open stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Convention {
    /// Global query; no handle required.
    StaticOnly,
    /// The result is a boolean reply.
    BooleanResult,
    /// A scalar is written to the buffer (or the result has no payload).
    ScalarOutput,
    /// A struct is written to the buffer.
    StructOutput,
    /// One value per channel is written to the buffer.
    ArrayOutput,
    /// Text is written to the buffer.
    StringOutput,
}

const FORMAT_INFO_SIZE: usize = size_of::<ffi::SF_FORMAT_INFO>();

macro_rules! opcodes {
    ($(
        $(#[$doc:meta])*
        $variant:ident => $code:ident, $shape:expr, $convention:ident, $family:ident;
    )*) => {
        /// An `sf_command` opcode.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Opcode {
            $(
                $(#[$doc])*
                $variant,
            )*
        }

        impl Opcode {
            /// Every opcode known to this crate.
            pub const ALL: &'static [Opcode] = &[$(Opcode::$variant,)*];

            /// The raw `SFC_*` value.
            pub const fn code(self) -> c_int {
                match self {
                    $(Opcode::$variant => ffi::$code,)*
                }
            }

            /// The libsndfile constant name, e.g. `SFC_GET_CLIPPING`.
            pub const fn name(self) -> &'static str {
                match self {
                    $(Opcode::$variant => stringify!($code),)*
                }
            }

            /// Look up an opcode by its raw value.
            pub fn from_code(code: c_int) -> Option<Opcode> {
                match code {
                    $(ffi::$code => Some(Opcode::$variant),)*
                    _ => None,
                }
            }

            /// The payload shape of this opcode.
            pub const fn shape(self) -> PayloadShape {
                match self {
                    $(Opcode::$variant => $shape,)*
                }
            }

            /// The result-slot convention of this opcode.
            pub const fn convention(self) -> Convention {
                match self {
                    $(Opcode::$variant => Convention::$convention,)*
                }
            }

            /// The classifier family for this opcode's raw result.
            pub const fn family(self) -> ResultFamily {
                match self {
                    $(Opcode::$variant => ResultFamily::$family,)*
                }
            }
        }
    };
}

opcodes! {
    /// Library version string.
    GetLibVersion => SFC_GET_LIB_VERSION, PayloadShape::Text, StaticOnly, Text;
    /// Diagnostic log of the last open.
    GetLogInfo => SFC_GET_LOG_INFO, PayloadShape::Text, StringOutput, Text;
    /// Current stream parameters.
    GetCurrentSfInfo => SFC_GET_CURRENT_SF_INFO, PayloadShape::Struct(size_of::<SoundInfo>()), StructOutput, Value;

    /// Whether double reads/writes are normalised.
    GetNormDouble => SFC_GET_NORM_DOUBLE, PayloadShape::None, BooleanResult, Toggle;
    /// Whether float reads/writes are normalised.
    GetNormFloat => SFC_GET_NORM_FLOAT, PayloadShape::None, BooleanResult, Toggle;
    /// Toggle double normalisation.
    SetNormDouble => SFC_SET_NORM_DOUBLE, PayloadShape::Arg, BooleanResult, Toggle;
    /// Toggle float normalisation.
    SetNormFloat => SFC_SET_NORM_FLOAT, PayloadShape::Arg, BooleanResult, Toggle;
    /// Toggle float-to-int scaling on read.
    SetScaleFloatIntRead => SFC_SET_SCALE_FLOAT_INT_READ, PayloadShape::Arg, BooleanResult, Toggle;
    /// Toggle int-to-float scaling on write.
    SetScaleIntFloatWrite => SFC_SET_SCALE_INT_FLOAT_WRITE, PayloadShape::Arg, BooleanResult, Toggle;

    /// Number of simple formats.
    GetSimpleFormatCount => SFC_GET_SIMPLE_FORMAT_COUNT, PayloadShape::Int32, StaticOnly, Value;
    /// Simple format by index.
    GetSimpleFormat => SFC_GET_SIMPLE_FORMAT, PayloadShape::Struct(FORMAT_INFO_SIZE), StaticOnly, Value;
    /// Description of a format word.
    GetFormatInfo => SFC_GET_FORMAT_INFO, PayloadShape::Struct(FORMAT_INFO_SIZE), StaticOnly, Value;
    /// Number of major formats.
    GetFormatMajorCount => SFC_GET_FORMAT_MAJOR_COUNT, PayloadShape::Int32, StaticOnly, Value;
    /// Major format by index.
    GetFormatMajor => SFC_GET_FORMAT_MAJOR, PayloadShape::Struct(FORMAT_INFO_SIZE), StaticOnly, Value;
    /// Number of subtypes.
    GetFormatSubtypeCount => SFC_GET_FORMAT_SUBTYPE_COUNT, PayloadShape::Int32, StaticOnly, Value;
    /// Subtype by index.
    GetFormatSubtype => SFC_GET_FORMAT_SUBTYPE, PayloadShape::Struct(FORMAT_INFO_SIZE), StaticOnly, Value;

    /// Scan the file for its peak sample.
    CalcSignalMax => SFC_CALC_SIGNAL_MAX, PayloadShape::Double, ScalarOutput, Value;
    /// Scan the file for its normalised peak.
    CalcNormSignalMax => SFC_CALC_NORM_SIGNAL_MAX, PayloadShape::Double, ScalarOutput, Value;
    /// Scan the file for per-channel peaks.
    CalcMaxAllChannels => SFC_CALC_MAX_ALL_CHANNELS, PayloadShape::DoubleArray, ArrayOutput, Array;
    /// Scan the file for normalised per-channel peaks.
    CalcNormMaxAllChannels => SFC_CALC_NORM_MAX_ALL_CHANNELS, PayloadShape::DoubleArray, ArrayOutput, Array;
    /// Peak from the header's PEAK chunk.
    GetSignalMax => SFC_GET_SIGNAL_MAX, PayloadShape::Double, ScalarOutput, Presence;
    /// Per-channel peaks from the header's PEAK chunk.
    GetMaxAllChannels => SFC_GET_MAX_ALL_CHANNELS, PayloadShape::DoubleArray, ArrayOutput, Presence;

    /// Toggle writing a PEAK chunk.
    SetAddPeakChunk => SFC_SET_ADD_PEAK_CHUNK, PayloadShape::Arg, BooleanResult, Toggle;
    /// Rewrite the header now.
    UpdateHeaderNow => SFC_UPDATE_HEADER_NOW, PayloadShape::None, ScalarOutput, Value;
    /// Toggle header rewrite after every write.
    SetUpdateHeaderAuto => SFC_SET_UPDATE_HEADER_AUTO, PayloadShape::Arg, BooleanResult, Toggle;
    /// Truncate the file to a frame count.
    FileTruncate => SFC_FILE_TRUNCATE, PayloadShape::Int64, ScalarOutput, Value;
    /// Byte offset of audio data in a RAW file.
    SetRawStartOffset => SFC_SET_RAW_START_OFFSET, PayloadShape::Int64, ScalarOutput, Value;

    /// Toggle clipping of float-to-int conversions.
    SetClipping => SFC_SET_CLIPPING, PayloadShape::Arg, BooleanResult, Toggle;
    /// Whether clipping is on.
    GetClipping => SFC_GET_CLIPPING, PayloadShape::None, BooleanResult, Toggle;

    /// Location of a file embedded in a container.
    GetEmbedFileInfo => SFC_GET_EMBED_FILE_INFO, PayloadShape::Struct(size_of::<EmbedFileInfo>()), StructOutput, Value;

    /// Instrument chunk.
    GetInstrument => SFC_GET_INSTRUMENT, PayloadShape::Struct(size_of::<Instrument>()), StructOutput, Presence;
    /// Write the instrument chunk.
    SetInstrument => SFC_SET_INSTRUMENT, PayloadShape::Struct(size_of::<Instrument>()), BooleanResult, Toggle;

    /// Loop/tempo metadata.
    GetLoopInfo => SFC_GET_LOOP_INFO, PayloadShape::Struct(size_of::<LoopInfo>()), StructOutput, Presence;

    /// Broadcast extension chunk.
    GetBroadcastInfo => SFC_GET_BROADCAST_INFO, PayloadShape::Struct(size_of::<BroadcastInfo>()), StructOutput, Presence;
    /// Write the broadcast extension chunk.
    SetBroadcastInfo => SFC_SET_BROADCAST_INFO, PayloadShape::Struct(size_of::<BroadcastInfo>()), BooleanResult, Toggle;

    /// Cart chunk.
    GetCartInfo => SFC_GET_CART_INFO, PayloadShape::Struct(size_of::<CartInfo>()), StructOutput, Presence;
    /// Write the cart chunk.
    SetCartInfo => SFC_SET_CART_INFO, PayloadShape::Struct(size_of::<CartInfo>()), BooleanResult, Toggle;

    /// Number of cue points.
    GetCueCount => SFC_GET_CUE_COUNT, PayloadShape::Int32, ScalarOutput, Presence;
    /// Cue points.
    GetCue => SFC_GET_CUE, PayloadShape::Struct(size_of::<Cues>()), StructOutput, Presence;
    /// Write cue points.
    SetCue => SFC_SET_CUE, PayloadShape::Struct(size_of::<Cues>()), BooleanResult, Toggle;

    /// Channel position map.
    GetChannelMapInfo => SFC_GET_CHANNEL_MAP_INFO, PayloadShape::Int32Array, ArrayOutput, Presence;
    /// Write the channel position map.
    SetChannelMapInfo => SFC_SET_CHANNEL_MAP_INFO, PayloadShape::Int32Array, BooleanResult, Toggle;

    /// Whether RAW data is in non-native byte order.
    RawDataNeedsEndswap => SFC_RAW_DATA_NEEDS_ENDSWAP, PayloadShape::None, BooleanResult, Toggle;

    /// Set the WAVEX ambisonic mode.
    WavexSetAmbisonic => SFC_WAVEX_SET_AMBISONIC, PayloadShape::Arg, BooleanResult, BitFlag;
    /// Current WAVEX ambisonic mode.
    WavexGetAmbisonic => SFC_WAVEX_GET_AMBISONIC, PayloadShape::None, ScalarOutput, BitFlag;

    /// Toggle RF64 downgrade to WAV on close.
    Rf64AutoDowngrade => SFC_RF64_AUTO_DOWNGRADE, PayloadShape::Arg, BooleanResult, Toggle;

    /// Variable bit rate quality.
    SetVbrEncodingQuality => SFC_SET_VBR_ENCODING_QUALITY, PayloadShape::Double, BooleanResult, Toggle;
    /// Compression level.
    SetCompressionLevel => SFC_SET_COMPRESSION_LEVEL, PayloadShape::Double, BooleanResult, Toggle;

    /// Sample rate before any conversion, if recorded.
    GetOriginalSamplerate => SFC_GET_ORIGINAL_SAMPLERATE, PayloadShape::Int32, ScalarOutput, Presence;
    /// Record the original sample rate.
    SetOriginalSamplerate => SFC_SET_ORIGINAL_SAMPLERATE, PayloadShape::Int32, BooleanResult, Toggle;
}

impl Opcode {
    /// Whether the opcode needs an open stream.
    pub const fn requires_handle(self) -> bool {
        !matches!(self.convention(), Convention::StaticOnly)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_codes_are_unique() {
        let codes: HashSet<_> = Opcode::ALL.iter().map(|op| op.code()).collect();
        assert_eq!(codes.len(), Opcode::ALL.len());
    }

    #[test]
    fn test_from_code_roundtrip() {
        for &op in Opcode::ALL {
            assert_eq!(Opcode::from_code(op.code()), Some(op));
        }
        assert_eq!(Opcode::from_code(0x7fff), None);
    }

    #[test]
    fn test_static_opcodes() {
        let statics: Vec<_> = Opcode::ALL
            .iter()
            .filter(|op| !op.requires_handle())
            .collect();
        assert_eq!(statics.len(), 8);
        assert!(!Opcode::GetLibVersion.requires_handle());
        assert!(!Opcode::GetFormatInfo.requires_handle());
        assert!(Opcode::GetLogInfo.requires_handle());
    }

    #[test]
    fn test_struct_sizes_follow_payload_types() {
        assert_eq!(
            Opcode::GetLoopInfo.shape(),
            PayloadShape::Struct(size_of::<LoopInfo>())
        );
        assert_eq!(
            Opcode::GetInstrument.shape(),
            Opcode::SetInstrument.shape()
        );
        assert_eq!(
            Opcode::GetFormatMajor.shape(),
            PayloadShape::Struct(size_of::<ffi::SF_FORMAT_INFO>())
        );
    }

    #[test]
    fn test_boolean_convention_uses_toggle_or_flag() {
        for &op in Opcode::ALL {
            if op.convention() == Convention::BooleanResult {
                assert!(
                    matches!(op.family(), ResultFamily::Toggle | ResultFamily::BitFlag),
                    "{} has boolean convention but {:?} family",
                    op,
                    op.family()
                );
            }
        }
    }

    #[test]
    fn test_display_uses_constant_name() {
        assert_eq!(Opcode::GetClipping.to_string(), "SFC_GET_CLIPPING");
        assert_eq!(Opcode::WavexSetAmbisonic.name(), "SFC_WAVEX_SET_AMBISONIC");
    }
}
