//! Format words and stream parameters.
//!
//! libsndfile packs a container type, a sample encoding and a byte order into
//! one `int`. [`Format`] wraps that word; [`SoundInfo`] mirrors `SF_INFO`.

use std::fmt;
use std::mem::size_of;
use std::ops::BitOr;

use libc::c_int;
use sndfile_sys as ffi;

use crate::scratch::plain_structs;

/// A packed libsndfile format word.
///
/// # Example
///
/// ```
/// use sndfile_rs::Format;
///
/// let format = Format::WAV | Format::PCM_16;
/// assert_eq!(format.major(), Format::WAV);
/// assert_eq!(format.subtype(), Format::PCM_16);
/// ```
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Format(c_int);

macro_rules! format_consts {
    ($($name:ident => $value:ident),* $(,)?) => {
        impl Format {
            $(
                #[doc = concat!("`", stringify!($value), "`.")]
                pub const $name: Format = Format(ffi::$value);
            )*
        }
    };
}

format_consts! {
    // Containers
    WAV => SF_FORMAT_WAV,
    AIFF => SF_FORMAT_AIFF,
    AU => SF_FORMAT_AU,
    RAW => SF_FORMAT_RAW,
    PAF => SF_FORMAT_PAF,
    SVX => SF_FORMAT_SVX,
    NIST => SF_FORMAT_NIST,
    VOC => SF_FORMAT_VOC,
    IRCAM => SF_FORMAT_IRCAM,
    W64 => SF_FORMAT_W64,
    MAT4 => SF_FORMAT_MAT4,
    MAT5 => SF_FORMAT_MAT5,
    PVF => SF_FORMAT_PVF,
    XI => SF_FORMAT_XI,
    HTK => SF_FORMAT_HTK,
    SDS => SF_FORMAT_SDS,
    AVR => SF_FORMAT_AVR,
    WAVEX => SF_FORMAT_WAVEX,
    SD2 => SF_FORMAT_SD2,
    FLAC => SF_FORMAT_FLAC,
    CAF => SF_FORMAT_CAF,
    WVE => SF_FORMAT_WVE,
    OGG => SF_FORMAT_OGG,
    MPC2K => SF_FORMAT_MPC2K,
    RF64 => SF_FORMAT_RF64,
    MPEG => SF_FORMAT_MPEG,

    // Encodings
    PCM_S8 => SF_FORMAT_PCM_S8,
    PCM_16 => SF_FORMAT_PCM_16,
    PCM_24 => SF_FORMAT_PCM_24,
    PCM_32 => SF_FORMAT_PCM_32,
    PCM_U8 => SF_FORMAT_PCM_U8,
    FLOAT => SF_FORMAT_FLOAT,
    DOUBLE => SF_FORMAT_DOUBLE,
    ULAW => SF_FORMAT_ULAW,
    ALAW => SF_FORMAT_ALAW,
    IMA_ADPCM => SF_FORMAT_IMA_ADPCM,
    MS_ADPCM => SF_FORMAT_MS_ADPCM,
    GSM610 => SF_FORMAT_GSM610,
    VOX_ADPCM => SF_FORMAT_VOX_ADPCM,
    G721_32 => SF_FORMAT_G721_32,
    G723_24 => SF_FORMAT_G723_24,
    G723_40 => SF_FORMAT_G723_40,
    DWVW_12 => SF_FORMAT_DWVW_12,
    DWVW_16 => SF_FORMAT_DWVW_16,
    DWVW_24 => SF_FORMAT_DWVW_24,
    DWVW_N => SF_FORMAT_DWVW_N,
    DPCM_8 => SF_FORMAT_DPCM_8,
    DPCM_16 => SF_FORMAT_DPCM_16,
    VORBIS => SF_FORMAT_VORBIS,
    OPUS => SF_FORMAT_OPUS,
    ALAC_16 => SF_FORMAT_ALAC_16,
    ALAC_20 => SF_FORMAT_ALAC_20,
    ALAC_24 => SF_FORMAT_ALAC_24,
    ALAC_32 => SF_FORMAT_ALAC_32,
    MPEG_LAYER_I => SF_FORMAT_MPEG_LAYER_I,
    MPEG_LAYER_II => SF_FORMAT_MPEG_LAYER_II,
    MPEG_LAYER_III => SF_FORMAT_MPEG_LAYER_III,

    // Byte order
    ENDIAN_FILE => SF_ENDIAN_FILE,
    ENDIAN_LITTLE => SF_ENDIAN_LITTLE,
    ENDIAN_BIG => SF_ENDIAN_BIG,
    ENDIAN_CPU => SF_ENDIAN_CPU,
}

impl Format {
    /// Wrap a raw format word.
    pub const fn from_raw(raw: c_int) -> Self {
        Format(raw)
    }

    /// The raw format word.
    pub const fn raw(self) -> c_int {
        self.0
    }

    /// The container part.
    pub const fn major(self) -> Format {
        Format(self.0 & ffi::SF_FORMAT_TYPEMASK)
    }

    /// The encoding part.
    pub const fn subtype(self) -> Format {
        Format(self.0 & ffi::SF_FORMAT_SUBMASK)
    }

    /// The byte-order part.
    pub const fn endian(self) -> Format {
        Format(self.0 & ffi::SF_FORMAT_ENDMASK)
    }
}

impl BitOr for Format {
    type Output = Format;

    fn bitor(self, rhs: Format) -> Format {
        Format(self.0 | rhs.0)
    }
}

impl fmt::Debug for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Format({:#010x})", self.0)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#08x}", self.0)
    }
}

/// Stream parameters, laid out as `SF_INFO`.
///
/// When opening for reading, leave it zeroed (RAW files excepted); when
/// writing, set `samplerate`, `channels` and `format`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SoundInfo {
    /// Frames in the stream.
    pub frames: i64,
    /// Sample rate in Hz.
    pub samplerate: i32,
    /// Channel count.
    pub channels: i32,
    /// Format word.
    pub format: Format,
    /// Number of sections.
    pub sections: i32,
    /// Non-zero when the stream supports seeking.
    pub seekable: i32,
    _pad: [u8; SOUND_INFO_PAD],
}

const SOUND_INFO_PAD: usize = size_of::<ffi::SF_INFO>() - size_of::<i64>() - 5 * size_of::<i32>();

impl SoundInfo {
    /// Parameters for a new file.
    pub fn new(samplerate: i32, channels: i32, format: Format) -> Self {
        SoundInfo {
            samplerate,
            channels,
            format,
            ..Default::default()
        }
    }

    /// Duration in seconds, zero when the sample rate is unknown.
    pub fn duration(&self) -> f64 {
        if self.samplerate <= 0 {
            0.0
        } else {
            self.frames as f64 / f64::from(self.samplerate)
        }
    }

    /// Whether the stream supports seeking.
    pub fn is_seekable(&self) -> bool {
        self.seekable != 0
    }
}

impl From<ffi::SF_INFO> for SoundInfo {
    fn from(raw: ffi::SF_INFO) -> Self {
        SoundInfo {
            frames: raw.frames,
            samplerate: raw.samplerate,
            channels: raw.channels,
            format: Format(raw.format),
            sections: raw.sections,
            seekable: raw.seekable,
            _pad: [0; SOUND_INFO_PAD],
        }
    }
}

impl From<SoundInfo> for ffi::SF_INFO {
    fn from(info: SoundInfo) -> Self {
        ffi::SF_INFO {
            frames: info.frames,
            samplerate: info.samplerate,
            channels: info.channels,
            format: info.format.raw(),
            sections: info.sections,
            seekable: info.seekable,
        }
    }
}

plain_structs! {
    SoundInfo { i64, i32, i32, Format, i32, i32, [u8; SOUND_INFO_PAD] }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scratch::ScratchBuffer;
    use approx::assert_relative_eq;

    #[test]
    fn test_sound_info_matches_sf_info() {
        assert_eq!(size_of::<SoundInfo>(), size_of::<ffi::SF_INFO>());

        let info = SoundInfo::new(44100, 2, Format::WAV | Format::PCM_24);
        let raw: ffi::SF_INFO = info.into();
        assert_eq!(raw.format, ffi::SF_FORMAT_WAV | ffi::SF_FORMAT_PCM_24);
        assert_eq!(SoundInfo::from(raw), info);
    }

    #[test]
    fn test_sound_info_tail_is_zero_in_buffers() {
        let mut info = SoundInfo::new(44100, 2, Format::WAV | Format::PCM_16);
        info.frames = -1;
        info.seekable = -1;
        let bytes = ScratchBuffer::from_value(&info).as_bytes().to_vec();
        assert_eq!(bytes.len(), size_of::<ffi::SF_INFO>());
        assert!(bytes[28..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_format_parts() {
        let format = Format::AIFF | Format::FLOAT | Format::ENDIAN_BIG;
        assert_eq!(format.major(), Format::AIFF);
        assert_eq!(format.subtype(), Format::FLOAT);
        assert_eq!(format.endian(), Format::ENDIAN_BIG);
    }

    #[test]
    fn test_duration() {
        let mut info = SoundInfo::new(48000, 1, Format::WAV | Format::PCM_16);
        info.frames = 24000;
        assert_relative_eq!(info.duration(), 0.5);
        info.samplerate = 0;
        assert_relative_eq!(info.duration(), 0.0);
    }
}
