//! Sound file streams.
//!
//! This module provides [`SoundFile`], an owned libsndfile stream. It opens
//! and closes the native handle; every `sf_command` operation on it goes
//! through [`SoundFile::commands`].
//!
//! # Example
//!
//! ```no_run
//! use sndfile_rs::{Mode, SoundFile};
//!
//! let mut file = SoundFile::open("take.wav", Mode::Read, None)?;
//! println!("{} Hz, {} channels", file.info().samplerate, file.info().channels);
//!
//! let mut frames = vec![0.0f32; 1024 * file.info().channels as usize];
//! let read = file.read_frames(&mut frames)?;
//! println!("read {} frames", read);
//! # Ok::<(), sndfile_rs::Error>(())
//! ```

use std::ffi::{CStr, CString};
use std::marker::PhantomData;
use std::path::Path;
use std::ptr::NonNull;

use libc::c_int;
use log::warn;
use sndfile_sys as ffi;

use crate::backend::LibSndfile;
use crate::commands::Commands;
use crate::dispatch::Dispatcher;
use crate::error::{Error, Result};
use crate::format::SoundInfo;
use crate::handle::Handle;

static NATIVE: Dispatcher<LibSndfile> = Dispatcher::native();

/// How a stream is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Read only.
    Read,
    /// Write only.
    Write,
    /// Read and write.
    ReadWrite,
}

impl Mode {
    const fn raw(self) -> c_int {
        match self {
            Mode::Read => ffi::SFM_READ,
            Mode::Write => ffi::SFM_WRITE,
            Mode::ReadWrite => ffi::SFM_RDWR,
        }
    }
}

/// Reference point for [`SoundFile::seek`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Whence {
    /// From the first frame.
    Start,
    /// From the current position.
    Current,
    /// From the end of the stream.
    End,
}

impl Whence {
    const fn raw(self) -> c_int {
        match self {
            Whence::Start => ffi::SF_SEEK_SET,
            Whence::Current => ffi::SF_SEEK_CUR,
            Whence::End => ffi::SF_SEEK_END,
        }
    }
}

/// String metadata fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Title.
    Title,
    /// Copyright notice.
    Copyright,
    /// Producing software.
    Software,
    /// Artist.
    Artist,
    /// Comment.
    Comment,
    /// Date.
    Date,
    /// Album.
    Album,
    /// License.
    License,
    /// Track number.
    TrackNumber,
    /// Genre.
    Genre,
}

impl Tag {
    /// Every tag.
    pub const ALL: [Tag; 10] = [
        Tag::Title,
        Tag::Copyright,
        Tag::Software,
        Tag::Artist,
        Tag::Comment,
        Tag::Date,
        Tag::Album,
        Tag::License,
        Tag::TrackNumber,
        Tag::Genre,
    ];

    const fn raw(self) -> c_int {
        match self {
            Tag::Title => ffi::SF_STR_TITLE,
            Tag::Copyright => ffi::SF_STR_COPYRIGHT,
            Tag::Software => ffi::SF_STR_SOFTWARE,
            Tag::Artist => ffi::SF_STR_ARTIST,
            Tag::Comment => ffi::SF_STR_COMMENT,
            Tag::Date => ffi::SF_STR_DATE,
            Tag::Album => ffi::SF_STR_ALBUM,
            Tag::License => ffi::SF_STR_LICENSE,
            Tag::TrackNumber => ffi::SF_STR_TRACKNUMBER,
            Tag::Genre => ffi::SF_STR_GENRE,
        }
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Sample types libsndfile converts to and from.
///
/// Implemented for `i16`, `i32`, `f32` and `f64`.
pub trait Sample: sealed::Sealed + Copy {
    #[doc(hidden)]
    unsafe fn read_items(file: *mut ffi::SNDFILE, buf: *mut Self, items: i64) -> i64;
    #[doc(hidden)]
    unsafe fn write_items(file: *mut ffi::SNDFILE, buf: *const Self, items: i64) -> i64;
    #[doc(hidden)]
    unsafe fn read_frames(file: *mut ffi::SNDFILE, buf: *mut Self, frames: i64) -> i64;
    #[doc(hidden)]
    unsafe fn write_frames(file: *mut ffi::SNDFILE, buf: *const Self, frames: i64) -> i64;
}

macro_rules! impl_sample {
    ($($ty:ty => $read:ident, $write:ident, $readf:ident, $writef:ident;)*) => {
        $(
            impl sealed::Sealed for $ty {}

            impl Sample for $ty {
                unsafe fn read_items(file: *mut ffi::SNDFILE, buf: *mut Self, items: i64) -> i64 {
                    ffi::$read(file, buf, items)
                }
                unsafe fn write_items(file: *mut ffi::SNDFILE, buf: *const Self, items: i64) -> i64 {
                    ffi::$write(file, buf, items)
                }
                unsafe fn read_frames(file: *mut ffi::SNDFILE, buf: *mut Self, frames: i64) -> i64 {
                    ffi::$readf(file, buf, frames)
                }
                unsafe fn write_frames(file: *mut ffi::SNDFILE, buf: *const Self, frames: i64) -> i64 {
                    ffi::$writef(file, buf, frames)
                }
            }
        )*
    };
}

impl_sample! {
    i16 => sf_read_short, sf_write_short, sf_readf_short, sf_writef_short;
    i32 => sf_read_int, sf_write_int, sf_readf_int, sf_writef_int;
    f32 => sf_read_float, sf_write_float, sf_readf_float, sf_writef_float;
    f64 => sf_read_double, sf_write_double, sf_readf_double, sf_writef_double;
}

/// Check whether libsndfile can write `info`.
pub fn format_check(info: &SoundInfo) -> bool {
    let raw: ffi::SF_INFO = (*info).into();
    // SAFETY: `raw` is a valid SF_INFO for the duration of the call.
    unsafe { ffi::sf_format_check(&raw) != 0 }
}

/// An open libsndfile stream.
///
/// `SoundFile` owns its native handle and closes it when dropped.
///
/// # Thread Safety
///
/// A libsndfile stream must not be used from two threads at once.
/// `SoundFile` is `!Send` and `!Sync`.
#[derive(Debug)]
pub struct SoundFile {
    /// Never null after construction.
    handle: NonNull<ffi::SNDFILE>,

    /// Parameters reported at open.
    info: SoundInfo,

    /// Mode the stream was opened with.
    mode: Mode,

    _not_send_sync: PhantomData<*const ()>,
}

impl SoundFile {
    /// Open a sound file.
    ///
    /// For [`Mode::Read`] pass `None` (or, for RAW files, the stream
    /// parameters). For [`Mode::Write`] pass the parameters of the new file.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidPath`] if the path is not valid UTF-8
    /// - [`Error::CString`] if the path contains a NUL byte
    /// - [`Error::OpenFailed`] if libsndfile rejects the file or parameters
    pub fn open(path: impl AsRef<Path>, mode: Mode, info: Option<SoundInfo>) -> Result<Self> {
        let path = path.as_ref();
        let path_str = path
            .to_str()
            .ok_or_else(|| Error::InvalidPath(path.to_path_buf()))?;
        let c_path = CString::new(path_str)?;

        let mut raw: ffi::SF_INFO = info.unwrap_or_default().into();
        // SAFETY: `c_path` and `raw` outlive the call.
        let handle = unsafe { ffi::sf_open(c_path.as_ptr(), mode.raw(), &mut raw) };

        let handle = NonNull::new(handle).ok_or_else(|| Error::OpenFailed {
            path: path.to_path_buf(),
            message: last_open_error(),
        })?;

        Ok(SoundFile {
            handle,
            info: raw.into(),
            mode,
            _not_send_sync: PhantomData,
        })
    }

    /// Stream parameters as reported when the file was opened.
    pub fn info(&self) -> &SoundInfo {
        &self.info
    }

    /// Mode the stream was opened with.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The native handle, borrowed from this file.
    pub fn handle(&self) -> Handle<'_> {
        // SAFETY: the stream stays open while `self` is borrowed, and
        // `SoundFile` is `!Send`.
        unsafe { Handle::from_raw(self.handle.as_ptr()) }
    }

    /// The `sf_command` operations, bound to this stream.
    pub fn commands(&self) -> Commands<'_> {
        NATIVE.bind(self.handle())
    }

    /// Move to a frame position; returns the new position.
    pub fn seek(&mut self, frames: i64, whence: Whence) -> Result<i64> {
        // SAFETY: the handle is open.
        let pos = unsafe { ffi::sf_seek(self.handle.as_ptr(), frames, whence.raw()) };
        if pos < 0 {
            return Err(self.stream_error());
        }
        Ok(pos)
    }

    /// Read interleaved samples; returns the number of samples read.
    pub fn read<T: Sample>(&mut self, buf: &mut [T]) -> Result<usize> {
        // SAFETY: `buf` holds `buf.len()` writable samples.
        let n = unsafe { T::read_items(self.handle.as_ptr(), buf.as_mut_ptr(), buf.len() as i64) };
        self.io_count(n)
    }

    /// Write interleaved samples; returns the number of samples written.
    pub fn write<T: Sample>(&mut self, buf: &[T]) -> Result<usize> {
        // SAFETY: `buf` holds `buf.len()` samples.
        let n = unsafe { T::write_items(self.handle.as_ptr(), buf.as_ptr(), buf.len() as i64) };
        self.io_count(n)
    }

    /// Read whole frames; returns the number of frames read.
    ///
    /// # Errors
    ///
    /// [`Error::PartialFrame`] if `buf` is not a whole number of frames.
    pub fn read_frames<T: Sample>(&mut self, buf: &mut [T]) -> Result<usize> {
        let frames = self.frames_in(buf.len())?;
        // SAFETY: `buf` holds `frames` whole frames.
        let n = unsafe { T::read_frames(self.handle.as_ptr(), buf.as_mut_ptr(), frames) };
        self.io_count(n)
    }

    /// Write whole frames; returns the number of frames written.
    ///
    /// # Errors
    ///
    /// [`Error::PartialFrame`] if `buf` is not a whole number of frames.
    pub fn write_frames<T: Sample>(&mut self, buf: &[T]) -> Result<usize> {
        let frames = self.frames_in(buf.len())?;
        // SAFETY: `buf` holds `frames` whole frames.
        let n = unsafe { T::write_frames(self.handle.as_ptr(), buf.as_ptr(), frames) };
        self.io_count(n)
    }

    /// A string metadata field, if set.
    pub fn tag(&self, tag: Tag) -> Option<String> {
        // SAFETY: the returned text is owned by the stream and copied at once.
        unsafe {
            let text = ffi::sf_get_string(self.handle.as_ptr(), tag.raw());
            if text.is_null() {
                None
            } else {
                Some(CStr::from_ptr(text).to_string_lossy().into_owned())
            }
        }
    }

    /// Set a string metadata field. Only supported on writable streams.
    pub fn set_tag(&mut self, tag: Tag, value: &str) -> Result<()> {
        let value = CString::new(value)?;
        // SAFETY: libsndfile copies the string.
        let code = unsafe { ffi::sf_set_string(self.handle.as_ptr(), tag.raw(), value.as_ptr()) };
        if code != ffi::SF_ERR_NO_ERROR {
            return Err(self.stream_error());
        }
        Ok(())
    }

    /// Flush buffered writes to disk.
    pub fn sync(&mut self) {
        // SAFETY: the handle is open.
        unsafe { ffi::sf_write_sync(self.handle.as_ptr()) }
    }

    /// The stream's current error, if any.
    pub fn error(&self) -> Option<Error> {
        // SAFETY: the handle is open.
        let code = unsafe { ffi::sf_error(self.handle.as_ptr()) };
        if code == ffi::SF_ERR_NO_ERROR {
            None
        } else {
            Some(self.stream_error())
        }
    }

    /// Close the stream, reporting any failure.
    pub fn close(self) -> Result<()> {
        let handle = self.handle.as_ptr();
        std::mem::forget(self);
        // SAFETY: `self` was forgotten, so the handle is closed exactly once.
        let code = unsafe { ffi::sf_close(handle) };
        if code != ffi::SF_ERR_NO_ERROR {
            return Err(Error::Stream {
                code,
                message: error_text(code),
            });
        }
        Ok(())
    }

    fn frames_in(&self, len: usize) -> Result<i64> {
        let channels = self.info.channels.max(1) as usize;
        if len % channels != 0 {
            return Err(Error::PartialFrame { len, channels });
        }
        Ok((len / channels) as i64)
    }

    fn io_count(&self, n: i64) -> Result<usize> {
        usize::try_from(n).map_err(|_| self.stream_error())
    }

    fn stream_error(&self) -> Error {
        // SAFETY: the handle is open; the message is static or stream-owned.
        let (code, message) = unsafe {
            let code = ffi::sf_error(self.handle.as_ptr());
            let text = ffi::sf_strerror(self.handle.as_ptr());
            let message = if text.is_null() {
                error_text(code)
            } else {
                CStr::from_ptr(text).to_string_lossy().into_owned()
            };
            (code, message)
        };
        Error::Stream { code, message }
    }
}

impl Drop for SoundFile {
    fn drop(&mut self) {
        // SAFETY: we own the handle and it is closed only here or in `close`.
        let code = unsafe { ffi::sf_close(self.handle.as_ptr()) };
        if code != ffi::SF_ERR_NO_ERROR {
            warn!("sf_close failed: {}", error_text(code));
        }
    }
}

fn error_text(code: c_int) -> String {
    // SAFETY: sf_error_number returns static text.
    unsafe {
        let text = ffi::sf_error_number(code);
        if text.is_null() {
            format!("error {}", code)
        } else {
            CStr::from_ptr(text).to_string_lossy().into_owned()
        }
    }
}

fn last_open_error() -> String {
    // SAFETY: with a null handle libsndfile reports the last open failure.
    unsafe {
        let text = ffi::sf_strerror(std::ptr::null_mut());
        if text.is_null() {
            "unknown error".to_string()
        } else {
            CStr::from_ptr(text).to_string_lossy().into_owned()
        }
    }
}
