//! # sndfile-sys
//!
//! Raw FFI bindings to [libsndfile](https://libsndfile.github.io/libsndfile/),
//! the C library for reading and writing sampled sound files.
//!
//! This crate provides low-level, unsafe bindings. For a safe, typed API, use
//! the `sndfile-rs` crate instead.
//!
//! ## Usage
//!
//! These bindings are primarily intended for use by `sndfile-rs`. Direct usage
//! requires careful attention to:
//!
//! - Pairing every successful `sf_open` with exactly one `sf_close`
//! - Passing `sf_command` a data pointer and size that match the opcode
//! - Never using a `SNDFILE` pointer after it was closed
//!
//! ## Example
//!
//! ```no_run
//! use sndfile_sys::*;
//! use std::ffi::CStr;
//!
//! unsafe {
//!     let mut buf = [0 as libc::c_char; 128];
//!     let len = sf_command(
//!         std::ptr::null_mut(),
//!         SFC_GET_LIB_VERSION,
//!         buf.as_mut_ptr().cast(),
//!         buf.len() as libc::c_int,
//!     );
//!     if len > 0 {
//!         println!("{}", CStr::from_ptr(buf.as_ptr()).to_string_lossy());
//!     }
//! }
//! ```
//!
//! ## Linking
//!
//! The build script looks for libsndfile with `pkg-config`, or links from
//! `SNDFILE_LIB_DIR` when that variable is set. The `static` feature (or
//! `SNDFILE_STATIC`) requests static linking. When the library is not found
//! the crate compiles stub functions that always fail; check [`LINKED`].

#![allow(non_upper_case_globals)]
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
#![allow(clippy::all)]

use libc::c_int;

#[cfg(not(sndfile_stub))]
mod linked;
#[cfg(not(sndfile_stub))]
pub use linked::*;

#[cfg(sndfile_stub)]
mod stub;
#[cfg(sndfile_stub)]
pub use stub::*;

/// `true` when the crate was linked against a real libsndfile.
pub const LINKED: bool = cfg!(not(sndfile_stub));

// ============================================================================
// Types
// ============================================================================

/// Frame and item counts.
pub type sf_count_t = i64;

/// Opaque stream handle.
#[repr(C)]
pub struct SNDFILE {
    _private: [u8; 0],
}

/// Stream parameters exchanged with `sf_open`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SF_INFO {
    pub frames: sf_count_t,
    pub samplerate: c_int,
    pub channels: c_int,
    pub format: c_int,
    pub sections: c_int,
    pub seekable: c_int,
}

/// Format description returned by the format query commands.
///
/// `name` and `extension` point into library-owned static storage.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct SF_FORMAT_INFO {
    pub format: c_int,
    pub name: *const libc::c_char,
    pub extension: *const libc::c_char,
}

// ============================================================================
// Open modes, booleans, seek
// ============================================================================

pub const SFM_READ: c_int = 0x10;
pub const SFM_WRITE: c_int = 0x20;
pub const SFM_RDWR: c_int = 0x30;

pub const SF_FALSE: c_int = 0;
pub const SF_TRUE: c_int = 1;

pub const SF_SEEK_SET: c_int = libc::SEEK_SET;
pub const SF_SEEK_CUR: c_int = libc::SEEK_CUR;
pub const SF_SEEK_END: c_int = libc::SEEK_END;

// ============================================================================
// Errors
// ============================================================================

pub const SF_ERR_NO_ERROR: c_int = 0;
pub const SF_ERR_UNRECOGNISED_FORMAT: c_int = 1;
pub const SF_ERR_SYSTEM: c_int = 2;
pub const SF_ERR_MALFORMED_FILE: c_int = 3;
pub const SF_ERR_UNSUPPORTED_ENCODING: c_int = 4;

// ============================================================================
// String tags
// ============================================================================

pub const SF_STR_TITLE: c_int = 0x01;
pub const SF_STR_COPYRIGHT: c_int = 0x02;
pub const SF_STR_SOFTWARE: c_int = 0x03;
pub const SF_STR_ARTIST: c_int = 0x04;
pub const SF_STR_COMMENT: c_int = 0x05;
pub const SF_STR_DATE: c_int = 0x06;
pub const SF_STR_ALBUM: c_int = 0x07;
pub const SF_STR_LICENSE: c_int = 0x08;
pub const SF_STR_TRACKNUMBER: c_int = 0x09;
pub const SF_STR_GENRE: c_int = 0x10;

// ============================================================================
// Format word
// ============================================================================

// Major formats
pub const SF_FORMAT_WAV: c_int = 0x010000;
pub const SF_FORMAT_AIFF: c_int = 0x020000;
pub const SF_FORMAT_AU: c_int = 0x030000;
pub const SF_FORMAT_RAW: c_int = 0x040000;
pub const SF_FORMAT_PAF: c_int = 0x050000;
pub const SF_FORMAT_SVX: c_int = 0x060000;
pub const SF_FORMAT_NIST: c_int = 0x070000;
pub const SF_FORMAT_VOC: c_int = 0x080000;
pub const SF_FORMAT_IRCAM: c_int = 0x0A0000;
pub const SF_FORMAT_W64: c_int = 0x0B0000;
pub const SF_FORMAT_MAT4: c_int = 0x0C0000;
pub const SF_FORMAT_MAT5: c_int = 0x0D0000;
pub const SF_FORMAT_PVF: c_int = 0x0E0000;
pub const SF_FORMAT_XI: c_int = 0x0F0000;
pub const SF_FORMAT_HTK: c_int = 0x100000;
pub const SF_FORMAT_SDS: c_int = 0x110000;
pub const SF_FORMAT_AVR: c_int = 0x120000;
pub const SF_FORMAT_WAVEX: c_int = 0x130000;
pub const SF_FORMAT_SD2: c_int = 0x160000;
pub const SF_FORMAT_FLAC: c_int = 0x170000;
pub const SF_FORMAT_CAF: c_int = 0x180000;
pub const SF_FORMAT_WVE: c_int = 0x190000;
pub const SF_FORMAT_OGG: c_int = 0x200000;
pub const SF_FORMAT_MPC2K: c_int = 0x210000;
pub const SF_FORMAT_RF64: c_int = 0x220000;
pub const SF_FORMAT_MPEG: c_int = 0x230000;

// Subtypes
pub const SF_FORMAT_PCM_S8: c_int = 0x0001;
pub const SF_FORMAT_PCM_16: c_int = 0x0002;
pub const SF_FORMAT_PCM_24: c_int = 0x0003;
pub const SF_FORMAT_PCM_32: c_int = 0x0004;
pub const SF_FORMAT_PCM_U8: c_int = 0x0005;
pub const SF_FORMAT_FLOAT: c_int = 0x0006;
pub const SF_FORMAT_DOUBLE: c_int = 0x0007;
pub const SF_FORMAT_ULAW: c_int = 0x0010;
pub const SF_FORMAT_ALAW: c_int = 0x0011;
pub const SF_FORMAT_IMA_ADPCM: c_int = 0x0012;
pub const SF_FORMAT_MS_ADPCM: c_int = 0x0013;
pub const SF_FORMAT_GSM610: c_int = 0x0020;
pub const SF_FORMAT_VOX_ADPCM: c_int = 0x0021;
pub const SF_FORMAT_G721_32: c_int = 0x0030;
pub const SF_FORMAT_G723_24: c_int = 0x0031;
pub const SF_FORMAT_G723_40: c_int = 0x0032;
pub const SF_FORMAT_DWVW_12: c_int = 0x0040;
pub const SF_FORMAT_DWVW_16: c_int = 0x0041;
pub const SF_FORMAT_DWVW_24: c_int = 0x0042;
pub const SF_FORMAT_DWVW_N: c_int = 0x0043;
pub const SF_FORMAT_DPCM_8: c_int = 0x0050;
pub const SF_FORMAT_DPCM_16: c_int = 0x0051;
pub const SF_FORMAT_VORBIS: c_int = 0x0060;
pub const SF_FORMAT_OPUS: c_int = 0x0064;
pub const SF_FORMAT_ALAC_16: c_int = 0x0070;
pub const SF_FORMAT_ALAC_20: c_int = 0x0071;
pub const SF_FORMAT_ALAC_24: c_int = 0x0072;
pub const SF_FORMAT_ALAC_32: c_int = 0x0073;
pub const SF_FORMAT_MPEG_LAYER_I: c_int = 0x0080;
pub const SF_FORMAT_MPEG_LAYER_II: c_int = 0x0081;
pub const SF_FORMAT_MPEG_LAYER_III: c_int = 0x0082;

// Endianness
pub const SF_ENDIAN_FILE: c_int = 0x00000000;
pub const SF_ENDIAN_LITTLE: c_int = 0x10000000;
pub const SF_ENDIAN_BIG: c_int = 0x20000000;
pub const SF_ENDIAN_CPU: c_int = 0x30000000;

// Masks
pub const SF_FORMAT_SUBMASK: c_int = 0x0000FFFF;
pub const SF_FORMAT_TYPEMASK: c_int = 0x0FFF0000;
pub const SF_FORMAT_ENDMASK: c_int = 0x30000000;

// ============================================================================
// sf_command opcodes
// ============================================================================

pub const SFC_GET_LIB_VERSION: c_int = 0x1000;
pub const SFC_GET_LOG_INFO: c_int = 0x1001;
pub const SFC_GET_CURRENT_SF_INFO: c_int = 0x1002;

pub const SFC_GET_NORM_DOUBLE: c_int = 0x1010;
pub const SFC_GET_NORM_FLOAT: c_int = 0x1011;
pub const SFC_SET_NORM_DOUBLE: c_int = 0x1012;
pub const SFC_SET_NORM_FLOAT: c_int = 0x1013;
pub const SFC_SET_SCALE_FLOAT_INT_READ: c_int = 0x1014;
pub const SFC_SET_SCALE_INT_FLOAT_WRITE: c_int = 0x1015;

pub const SFC_GET_SIMPLE_FORMAT_COUNT: c_int = 0x1020;
pub const SFC_GET_SIMPLE_FORMAT: c_int = 0x1021;

pub const SFC_GET_FORMAT_INFO: c_int = 0x1028;

pub const SFC_GET_FORMAT_MAJOR_COUNT: c_int = 0x1030;
pub const SFC_GET_FORMAT_MAJOR: c_int = 0x1031;
pub const SFC_GET_FORMAT_SUBTYPE_COUNT: c_int = 0x1032;
pub const SFC_GET_FORMAT_SUBTYPE: c_int = 0x1033;

pub const SFC_CALC_SIGNAL_MAX: c_int = 0x1040;
pub const SFC_CALC_NORM_SIGNAL_MAX: c_int = 0x1041;
pub const SFC_CALC_MAX_ALL_CHANNELS: c_int = 0x1042;
pub const SFC_CALC_NORM_MAX_ALL_CHANNELS: c_int = 0x1043;
pub const SFC_GET_SIGNAL_MAX: c_int = 0x1044;
pub const SFC_GET_MAX_ALL_CHANNELS: c_int = 0x1045;

pub const SFC_SET_ADD_PEAK_CHUNK: c_int = 0x1050;

pub const SFC_UPDATE_HEADER_NOW: c_int = 0x1060;
pub const SFC_SET_UPDATE_HEADER_AUTO: c_int = 0x1061;

pub const SFC_FILE_TRUNCATE: c_int = 0x1080;

pub const SFC_SET_RAW_START_OFFSET: c_int = 0x1090;

pub const SFC_GET_EMBED_FILE_INFO: c_int = 0x10B0;

pub const SFC_SET_CLIPPING: c_int = 0x10C0;
pub const SFC_GET_CLIPPING: c_int = 0x10C1;

pub const SFC_GET_CUE_COUNT: c_int = 0x10CD;
pub const SFC_GET_CUE: c_int = 0x10CE;
pub const SFC_SET_CUE: c_int = 0x10CF;

pub const SFC_GET_INSTRUMENT: c_int = 0x10D0;
pub const SFC_SET_INSTRUMENT: c_int = 0x10D1;

pub const SFC_GET_LOOP_INFO: c_int = 0x10E0;

pub const SFC_GET_BROADCAST_INFO: c_int = 0x10F0;
pub const SFC_SET_BROADCAST_INFO: c_int = 0x10F1;

pub const SFC_GET_CHANNEL_MAP_INFO: c_int = 0x1100;
pub const SFC_SET_CHANNEL_MAP_INFO: c_int = 0x1101;

pub const SFC_RAW_DATA_NEEDS_ENDSWAP: c_int = 0x1110;

pub const SFC_WAVEX_SET_AMBISONIC: c_int = 0x1200;
pub const SFC_WAVEX_GET_AMBISONIC: c_int = 0x1201;

pub const SFC_RF64_AUTO_DOWNGRADE: c_int = 0x1210;

pub const SFC_SET_VBR_ENCODING_QUALITY: c_int = 0x1300;
pub const SFC_SET_COMPRESSION_LEVEL: c_int = 0x1301;

pub const SFC_SET_CART_INFO: c_int = 0x1400;
pub const SFC_GET_CART_INFO: c_int = 0x1401;

pub const SFC_SET_ORIGINAL_SAMPLERATE: c_int = 0x1500;
pub const SFC_GET_ORIGINAL_SAMPLERATE: c_int = 0x1501;

// ============================================================================
// Command payload constants
// ============================================================================

pub const SF_AMBISONIC_NONE: c_int = 0x40;
pub const SF_AMBISONIC_B_FORMAT: c_int = 0x41;

pub const SF_LOOP_NONE: c_int = 800;
pub const SF_LOOP_FORWARD: c_int = 801;
pub const SF_LOOP_BACKWARD: c_int = 802;
pub const SF_LOOP_ALTERNATING: c_int = 803;

// ============================================================================
// Tests
// ============================================================================
