//! Typed `sf_command` operations.
//!
//! Each method here fixes one opcode, validates its arguments and routes it
//! through the matching [`Dispatcher`] family routine. [`Commands`] binds the
//! same operations to one stream handle.

use libc::c_int;

use crate::backend::{Backend, LibSndfile};
use crate::dispatch::Dispatcher;
use crate::error::{Error, Result};
use crate::format::{Format, SoundInfo};
use crate::handle::Handle;
use crate::metadata::{
    Ambisonic, BroadcastInfo, CartInfo, Cues, EmbedFileInfo, FormatInfo, Instrument, LoopInfo,
    RawFormatInfo,
};
use crate::opcode::Opcode;

/// Default buffer size for the library version string.
pub const DEFAULT_VERSION_CAPACITY: usize = 128;

/// Default buffer size for the open log.
pub const DEFAULT_LOG_CAPACITY: usize = 2048;

fn unit_interval(opcode: Opcode, what: &'static str, value: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(Error::out_of_range(opcode, what, value, "0.0..=1.0"))
    }
}

fn non_negative(opcode: Opcode, what: &'static str, value: i64) -> Result<i64> {
    if value >= 0 {
        Ok(value)
    } else {
        Err(Error::out_of_range(opcode, what, value, ">= 0"))
    }
}

fn format_seed(opcode: Opcode, index: usize) -> Result<RawFormatInfo> {
    let format = c_int::try_from(index)
        .map_err(|_| Error::out_of_range(opcode, "index", index, "0..=i32::MAX"))?;
    Ok(RawFormatInfo::seed(format))
}

fn count(opcode: Opcode, raw: i32) -> Result<usize> {
    usize::try_from(raw).map_err(|_| Error::native(opcode, raw, "library reported a negative count"))
}

impl<B: Backend> Dispatcher<B> {
    /// Bind the per-stream operations to `handle`.
    pub fn bind<'a>(&'a self, handle: Handle<'a>) -> Commands<'a, B> {
        Commands::new(self, handle)
    }

    // ------------------------------------------------------------------
    // Library and log
    // ------------------------------------------------------------------

    /// The library version, e.g. `libsndfile-1.2.2`.
    pub fn lib_version(&self) -> Result<String> {
        self.lib_version_with_capacity(DEFAULT_VERSION_CAPACITY)
    }

    /// The library version, read into a buffer of `capacity` bytes.
    pub fn lib_version_with_capacity(&self, capacity: usize) -> Result<String> {
        self.text(Handle::NULL, Opcode::GetLibVersion, capacity)
    }

    /// The diagnostic log written while the stream was opened.
    pub fn log_info(&self, handle: Handle) -> Result<String> {
        self.log_info_with_capacity(handle, DEFAULT_LOG_CAPACITY)
    }

    /// The open log, read into a buffer of `capacity` bytes.
    pub fn log_info_with_capacity(&self, handle: Handle, capacity: usize) -> Result<String> {
        self.text(handle, Opcode::GetLogInfo, capacity)
    }

    /// Current stream parameters.
    pub fn current_info(&self, handle: Handle) -> Result<SoundInfo> {
        self.value(handle, Opcode::GetCurrentSfInfo)
    }

    // ------------------------------------------------------------------
    // Normalisation and scaling
    // ------------------------------------------------------------------

    /// Whether `f64` I/O is normalised to [-1.0, 1.0].
    pub fn norm_double(&self, handle: Handle) -> Result<bool> {
        self.toggle(handle, Opcode::GetNormDouble)
    }

    /// Whether `f32` I/O is normalised to [-1.0, 1.0].
    pub fn norm_float(&self, handle: Handle) -> Result<bool> {
        self.toggle(handle, Opcode::GetNormFloat)
    }

    /// Toggle `f64` normalisation; returns the previous setting.
    pub fn set_norm_double(&self, handle: Handle, on: bool) -> Result<bool> {
        self.set_toggle(handle, Opcode::SetNormDouble, on)
    }

    /// Toggle `f32` normalisation; returns the previous setting.
    pub fn set_norm_float(&self, handle: Handle, on: bool) -> Result<bool> {
        self.set_toggle(handle, Opcode::SetNormFloat, on)
    }

    /// Toggle scaling when reading float data as integers; returns the
    /// previous setting.
    pub fn set_scale_float_int_read(&self, handle: Handle, on: bool) -> Result<bool> {
        self.set_toggle(handle, Opcode::SetScaleFloatIntRead, on)
    }

    /// Toggle scaling when writing integers to a float file.
    pub fn set_scale_int_float_write(&self, handle: Handle, on: bool) -> Result<bool> {
        self.set_toggle(handle, Opcode::SetScaleIntFloatWrite, on)
    }

    // ------------------------------------------------------------------
    // Format tables
    // ------------------------------------------------------------------

    /// Number of simple (container plus encoding) formats.
    pub fn simple_format_count(&self) -> Result<usize> {
        let raw = self.value::<i32>(Handle::NULL, Opcode::GetSimpleFormatCount)?;
        count(Opcode::GetSimpleFormatCount, raw)
    }

    /// Simple format number `index`.
    pub fn simple_format(&self, index: usize) -> Result<FormatInfo> {
        self.format_entry(Opcode::GetSimpleFormat, index)
    }

    /// Number of container formats.
    pub fn major_format_count(&self) -> Result<usize> {
        let raw = self.value::<i32>(Handle::NULL, Opcode::GetFormatMajorCount)?;
        count(Opcode::GetFormatMajorCount, raw)
    }

    /// Container format number `index`.
    pub fn major_format(&self, index: usize) -> Result<FormatInfo> {
        self.format_entry(Opcode::GetFormatMajor, index)
    }

    /// Number of encodings.
    pub fn subtype_format_count(&self) -> Result<usize> {
        let raw = self.value::<i32>(Handle::NULL, Opcode::GetFormatSubtypeCount)?;
        count(Opcode::GetFormatSubtypeCount, raw)
    }

    /// Encoding number `index`.
    pub fn subtype_format(&self, index: usize) -> Result<FormatInfo> {
        self.format_entry(Opcode::GetFormatSubtype, index)
    }

    /// Describe a container or encoding.
    pub fn format_info(&self, format: Format) -> Result<FormatInfo> {
        let seed = RawFormatInfo::seed(format.raw());
        let raw = self.value_from(Handle::NULL, Opcode::GetFormatInfo, &seed)?;
        // SAFETY: `Backend` implementors guarantee the strings are null or
        // NUL-terminated static text.
        Ok(unsafe { FormatInfo::from_raw(&raw) })
    }

    fn format_entry(&self, opcode: Opcode, index: usize) -> Result<FormatInfo> {
        let raw = self.value_with(Handle::NULL, opcode, || format_seed(opcode, index))?;
        // SAFETY: as in `format_info`.
        Ok(unsafe { FormatInfo::from_raw(&raw) })
    }

    // ------------------------------------------------------------------
    // Peaks
    // ------------------------------------------------------------------

    /// Scan the whole file for its largest sample magnitude.
    pub fn calc_signal_max(&self, handle: Handle) -> Result<f64> {
        self.value(handle, Opcode::CalcSignalMax)
    }

    /// As [`calc_signal_max`](Self::calc_signal_max), normalised to 1.0.
    pub fn calc_norm_signal_max(&self, handle: Handle) -> Result<f64> {
        self.value(handle, Opcode::CalcNormSignalMax)
    }

    /// Scan the whole file for the peak of each of `channels` channels.
    pub fn calc_max_all_channels(&self, handle: Handle, channels: usize) -> Result<Vec<f64>> {
        self.array(handle, Opcode::CalcMaxAllChannels, channels)
    }

    /// As [`calc_max_all_channels`](Self::calc_max_all_channels), normalised to 1.0.
    pub fn calc_norm_max_all_channels(&self, handle: Handle, channels: usize) -> Result<Vec<f64>> {
        self.array(handle, Opcode::CalcNormMaxAllChannels, channels)
    }

    /// The peak stored in the header, if there is a PEAK chunk.
    pub fn signal_max(&self, handle: Handle) -> Result<Option<f64>> {
        self.optional_value(handle, Opcode::GetSignalMax)
    }

    /// Per-channel peaks stored in the header, if there is a PEAK chunk.
    pub fn max_all_channels(&self, handle: Handle, channels: usize) -> Result<Option<Vec<f64>>> {
        self.optional_array(handle, Opcode::GetMaxAllChannels, channels)
    }

    // ------------------------------------------------------------------
    // Header maintenance
    // ------------------------------------------------------------------

    /// Toggle writing a PEAK chunk on float files; returns the previous
    /// setting, or false if the format has no PEAK chunk.
    pub fn set_add_peak_chunk(&self, handle: Handle, on: bool) -> Result<bool> {
        self.set_toggle(handle, Opcode::SetAddPeakChunk, on)
    }

    /// Rewrite the header to match the data written so far.
    pub fn update_header_now(&self, handle: Handle) -> Result<()> {
        self.run(handle, Opcode::UpdateHeaderNow)
    }

    /// Toggle rewriting the header after every write; returns the new setting.
    pub fn set_update_header_auto(&self, handle: Handle, on: bool) -> Result<bool> {
        self.set_toggle(handle, Opcode::SetUpdateHeaderAuto, on)
    }

    /// Truncate a writable stream to `frames` frames.
    pub fn truncate(&self, handle: Handle, frames: i64) -> Result<()> {
        self.send_with(handle, Opcode::FileTruncate, || {
            non_negative(Opcode::FileTruncate, "frames", frames)
        })
    }

    /// Byte offset of the audio data in a RAW file.
    pub fn set_raw_start_offset(&self, handle: Handle, offset: i64) -> Result<()> {
        self.send_with(handle, Opcode::SetRawStartOffset, || {
            non_negative(Opcode::SetRawStartOffset, "offset", offset)
        })
    }

    /// Toggle clipping of out-of-range float to integer conversions; returns
    /// the new setting.
    pub fn set_clipping(&self, handle: Handle, on: bool) -> Result<bool> {
        self.set_toggle(handle, Opcode::SetClipping, on)
    }

    /// Whether clipping is on.
    pub fn clipping(&self, handle: Handle) -> Result<bool> {
        self.toggle(handle, Opcode::GetClipping)
    }

    /// Whether RAW data must be byte-swapped on this machine.
    pub fn raw_needs_endswap(&self, handle: Handle) -> Result<bool> {
        self.toggle(handle, Opcode::RawDataNeedsEndswap)
    }

    /// Toggle downgrading RF64 to WAV on close when the data fits.
    pub fn set_rf64_auto_downgrade(&self, handle: Handle, on: bool) -> Result<bool> {
        self.set_toggle(handle, Opcode::Rf64AutoDowngrade, on)
    }

    // ------------------------------------------------------------------
    // Metadata chunks
    // ------------------------------------------------------------------

    /// Location of this stream inside its container file.
    pub fn embed_file_info(&self, handle: Handle) -> Result<EmbedFileInfo> {
        self.value(handle, Opcode::GetEmbedFileInfo)
    }

    /// The instrument chunk, if present.
    pub fn instrument(&self, handle: Handle) -> Result<Option<Instrument>> {
        self.optional_value(handle, Opcode::GetInstrument)
    }

    /// Write the instrument chunk.
    pub fn set_instrument(&self, handle: Handle, instrument: &Instrument) -> Result<bool> {
        self.store(handle, Opcode::SetInstrument, instrument)
    }

    /// Loop and tempo metadata, if present.
    pub fn loop_info(&self, handle: Handle) -> Result<Option<LoopInfo>> {
        self.optional_value(handle, Opcode::GetLoopInfo)
    }

    /// The broadcast extension chunk, if present.
    pub fn broadcast_info(&self, handle: Handle) -> Result<Option<BroadcastInfo>> {
        self.optional_value(handle, Opcode::GetBroadcastInfo)
    }

    /// Write the broadcast extension chunk.
    pub fn set_broadcast_info(&self, handle: Handle, info: &BroadcastInfo) -> Result<bool> {
        self.store(handle, Opcode::SetBroadcastInfo, info)
    }

    /// The cart chunk, if present.
    pub fn cart_info(&self, handle: Handle) -> Result<Option<CartInfo>> {
        self.optional_value(handle, Opcode::GetCartInfo)
    }

    /// Write the cart chunk.
    pub fn set_cart_info(&self, handle: Handle, info: &CartInfo) -> Result<bool> {
        self.store(handle, Opcode::SetCartInfo, info)
    }

    /// Number of cue points, if the file has a cue table.
    pub fn cue_count(&self, handle: Handle) -> Result<Option<u32>> {
        let raw = self.optional_value::<i32>(handle, Opcode::GetCueCount)?;
        Ok(raw.map(|n| n as u32))
    }

    /// The cue table, if present.
    pub fn cues(&self, handle: Handle) -> Result<Option<Cues>> {
        self.optional_value(handle, Opcode::GetCue)
    }

    /// Write the cue table.
    pub fn set_cues(&self, handle: Handle, cues: &Cues) -> Result<bool> {
        self.store(handle, Opcode::SetCue, cues)
    }

    /// Channel positions for `channels` channels, if the file declares them.
    pub fn channel_map(&self, handle: Handle, channels: usize) -> Result<Option<Vec<i32>>> {
        self.optional_array(handle, Opcode::GetChannelMapInfo, channels)
    }

    /// Declare channel positions, one per channel.
    pub fn set_channel_map(&self, handle: Handle, map: &[i32]) -> Result<bool> {
        self.store_array(handle, Opcode::SetChannelMapInfo, map)
    }

    // ------------------------------------------------------------------
    // Encoder settings
    // ------------------------------------------------------------------

    /// Request a WAVEX ambisonic mode; true if the library accepted it.
    pub fn set_ambisonic(&self, handle: Handle, mode: Ambisonic) -> Result<bool> {
        self.set_mode(handle, Opcode::WavexSetAmbisonic, mode.bits())
    }

    /// The WAVEX ambisonic mode, `None` when the file is not WAVEX.
    pub fn ambisonic(&self, handle: Handle) -> Result<Option<Ambisonic>> {
        let bits = self.mode(handle, Opcode::WavexGetAmbisonic)?;
        if bits == 0 {
            return Ok(None);
        }
        Ambisonic::from_bits(bits).map(Some).ok_or_else(|| {
            Error::native(
                Opcode::WavexGetAmbisonic,
                bits,
                format!("unknown ambisonic mode {:#x}", bits),
            )
        })
    }

    /// Variable bit rate quality, from 0.0 (lowest) to 1.0 (highest).
    pub fn set_vbr_encoding_quality(&self, handle: Handle, quality: f64) -> Result<bool> {
        self.store_with(handle, Opcode::SetVbrEncodingQuality, || {
            unit_interval(Opcode::SetVbrEncodingQuality, "quality", quality)
        })
    }

    /// Compression level, from 0.0 (fastest) to 1.0 (smallest).
    pub fn set_compression_level(&self, handle: Handle, level: f64) -> Result<bool> {
        self.store_with(handle, Opcode::SetCompressionLevel, || {
            unit_interval(Opcode::SetCompressionLevel, "level", level)
        })
    }

    /// The sample rate recorded before conversion, if any.
    pub fn original_samplerate(&self, handle: Handle) -> Result<Option<u32>> {
        let raw = self.optional_value::<i32>(handle, Opcode::GetOriginalSamplerate)?;
        raw.map(|rate| {
            u32::try_from(rate).map_err(|_| {
                Error::native(Opcode::GetOriginalSamplerate, rate, "negative sample rate")
            })
        })
        .transpose()
    }

    /// Record the original sample rate.
    pub fn set_original_samplerate(&self, handle: Handle, rate: u32) -> Result<bool> {
        self.store_with(handle, Opcode::SetOriginalSamplerate, || match i32::try_from(rate) {
            Ok(rate) if rate > 0 => Ok(rate),
            _ => Err(Error::out_of_range(
                Opcode::SetOriginalSamplerate,
                "rate",
                rate,
                "1..=i32::MAX",
            )),
        })
    }
}

/// The per-stream operations of a [`Dispatcher`], bound to one handle.
///
/// Obtained from [`SoundFile::commands`](crate::SoundFile::commands) or
/// [`Dispatcher::bind`].
///
/// # Example
///
/// ```no_run
/// use sndfile_rs::{Mode, SoundFile};
///
/// let file = SoundFile::open("take.wav", Mode::Read, None)?;
/// let commands = file.commands();
/// if let Some(bext) = commands.broadcast_info()? {
///     println!("{}", bext.description());
/// }
/// # Ok::<(), sndfile_rs::Error>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Commands<'a, B: Backend = LibSndfile> {
    dispatcher: &'a Dispatcher<B>,
    handle: Handle<'a>,
}

impl<'a, B: Backend> Commands<'a, B> {
    pub(crate) fn new(dispatcher: &'a Dispatcher<B>, handle: Handle<'a>) -> Self {
        Commands { dispatcher, handle }
    }

    /// The bound handle.
    pub fn handle(&self) -> Handle<'a> {
        self.handle
    }
}

macro_rules! bound_commands {
    ($(
        $(#[$doc:meta])*
        fn $name:ident($($arg:ident: $ty:ty),*) -> $ret:ty;
    )*) => {
        impl<'a, B: Backend> Commands<'a, B> {
            $(
                $(#[$doc])*
                pub fn $name(&self, $($arg: $ty),*) -> Result<$ret> {
                    self.dispatcher.$name(self.handle, $($arg),*)
                }
            )*
        }
    };
}

bound_commands! {
    /// See [`Dispatcher::log_info`].
    fn log_info() -> String;
    /// See [`Dispatcher::log_info_with_capacity`].
    fn log_info_with_capacity(capacity: usize) -> String;
    /// See [`Dispatcher::current_info`].
    fn current_info() -> SoundInfo;
    /// See [`Dispatcher::norm_double`].
    fn norm_double() -> bool;
    /// See [`Dispatcher::norm_float`].
    fn norm_float() -> bool;
    /// See [`Dispatcher::set_norm_double`].
    fn set_norm_double(on: bool) -> bool;
    /// See [`Dispatcher::set_norm_float`].
    fn set_norm_float(on: bool) -> bool;
    /// See [`Dispatcher::set_scale_float_int_read`].
    fn set_scale_float_int_read(on: bool) -> bool;
    /// See [`Dispatcher::set_scale_int_float_write`].
    fn set_scale_int_float_write(on: bool) -> bool;
    /// See [`Dispatcher::calc_signal_max`].
    fn calc_signal_max() -> f64;
    /// See [`Dispatcher::calc_norm_signal_max`].
    fn calc_norm_signal_max() -> f64;
    /// See [`Dispatcher::calc_max_all_channels`].
    fn calc_max_all_channels(channels: usize) -> Vec<f64>;
    /// See [`Dispatcher::calc_norm_max_all_channels`].
    fn calc_norm_max_all_channels(channels: usize) -> Vec<f64>;
    /// See [`Dispatcher::signal_max`].
    fn signal_max() -> Option<f64>;
    /// See [`Dispatcher::max_all_channels`].
    fn max_all_channels(channels: usize) -> Option<Vec<f64>>;
    /// See [`Dispatcher::set_add_peak_chunk`].
    fn set_add_peak_chunk(on: bool) -> bool;
    /// See [`Dispatcher::update_header_now`].
    fn update_header_now() -> ();
    /// See [`Dispatcher::set_update_header_auto`].
    fn set_update_header_auto(on: bool) -> bool;
    /// See [`Dispatcher::truncate`].
    fn truncate(frames: i64) -> ();
    /// See [`Dispatcher::set_raw_start_offset`].
    fn set_raw_start_offset(offset: i64) -> ();
    /// See [`Dispatcher::set_clipping`].
    fn set_clipping(on: bool) -> bool;
    /// See [`Dispatcher::clipping`].
    fn clipping() -> bool;
    /// See [`Dispatcher::raw_needs_endswap`].
    fn raw_needs_endswap() -> bool;
    /// See [`Dispatcher::set_rf64_auto_downgrade`].
    fn set_rf64_auto_downgrade(on: bool) -> bool;
    /// See [`Dispatcher::embed_file_info`].
    fn embed_file_info() -> EmbedFileInfo;
    /// See [`Dispatcher::instrument`].
    fn instrument() -> Option<Instrument>;
    /// See [`Dispatcher::set_instrument`].
    fn set_instrument(instrument: &Instrument) -> bool;
    /// See [`Dispatcher::loop_info`].
    fn loop_info() -> Option<LoopInfo>;
    /// See [`Dispatcher::broadcast_info`].
    fn broadcast_info() -> Option<BroadcastInfo>;
    /// See [`Dispatcher::set_broadcast_info`].
    fn set_broadcast_info(info: &BroadcastInfo) -> bool;
    /// See [`Dispatcher::cart_info`].
    fn cart_info() -> Option<CartInfo>;
    /// See [`Dispatcher::set_cart_info`].
    fn set_cart_info(info: &CartInfo) -> bool;
    /// See [`Dispatcher::cue_count`].
    fn cue_count() -> Option<u32>;
    /// See [`Dispatcher::cues`].
    fn cues() -> Option<Cues>;
    /// See [`Dispatcher::set_cues`].
    fn set_cues(cues: &Cues) -> bool;
    /// See [`Dispatcher::channel_map`].
    fn channel_map(channels: usize) -> Option<Vec<i32>>;
    /// See [`Dispatcher::set_channel_map`].
    fn set_channel_map(map: &[i32]) -> bool;
    /// See [`Dispatcher::set_ambisonic`].
    fn set_ambisonic(mode: Ambisonic) -> bool;
    /// See [`Dispatcher::ambisonic`].
    fn ambisonic() -> Option<Ambisonic>;
    /// See [`Dispatcher::set_vbr_encoding_quality`].
    fn set_vbr_encoding_quality(quality: f64) -> bool;
    /// See [`Dispatcher::set_compression_level`].
    fn set_compression_level(level: f64) -> bool;
    /// See [`Dispatcher::original_samplerate`].
    fn original_samplerate() -> Option<u32>;
    /// See [`Dispatcher::set_original_samplerate`].
    fn set_original_samplerate(rate: u32) -> bool;
}
