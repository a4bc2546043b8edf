//! The foreign `sf_command` entry point, behind a trait.
//!
//! [`LibSndfile`] forwards to the linked library. Anything else implementing
//! [`Backend`] can stand in for it, which is how the dispatcher is tested
//! without a native library.

use std::ffi::CStr;

use libc::{c_int, c_void};

use crate::handle::Handle;

/// A callable `sf_command`.
///
/// # Safety
///
/// The dispatcher decodes whatever an implementation leaves in the buffer, so
/// implementors must behave like libsndfile:
///
/// - write at most `size` bytes through `data`, and nothing when it is null;
/// - never retain `data` past the call;
/// - when answering `SFC_GET_FORMAT_INFO`, `SFC_GET_FORMAT_MAJOR`,
///   `SFC_GET_FORMAT_SUBTYPE` or `SFC_GET_SIMPLE_FORMAT`, leave the `name` and
///   `extension` fields of `SF_FORMAT_INFO` null or pointing to NUL-terminated
///   text that lives for the rest of the program.
///
/// A backend cannot be implemented without taking on that contract:
///
/// ```compile_fail
/// use std::ffi::c_void;
/// use std::os::raw::c_int;
///
/// use sndfile_rs::{Backend, Handle};
///
/// struct Liar;
///
/// impl Backend for Liar {
///     unsafe fn command(&self, _: Handle, _: c_int, _: *mut c_void, _: c_int) -> c_int {
///         0
///     }
/// }
/// ```
pub unsafe trait Backend {
    /// Run one raw command.
    ///
    /// # Safety
    ///
    /// `data` must be null or point to `size` writable bytes laid out as the
    /// opcode expects, and must stay valid until the call returns. A non-null
    /// `handle` must refer to an open stream.
    unsafe fn command(&self, handle: Handle, opcode: c_int, data: *mut c_void, size: c_int)
        -> c_int;

    /// Text for the most recent native error on `handle`, if available.
    fn describe(&self, _handle: Handle) -> Option<String> {
        None
    }
}

// SAFETY: forwards to `B`, which upholds the contract.
unsafe impl<B: Backend + ?Sized> Backend for &B {
    unsafe fn command(
        &self,
        handle: Handle,
        opcode: c_int,
        data: *mut c_void,
        size: c_int,
    ) -> c_int {
        (**self).command(handle, opcode, data, size)
    }

    fn describe(&self, handle: Handle) -> Option<String> {
        (**self).describe(handle)
    }
}

/// The linked libsndfile.
#[derive(Debug, Clone, Copy, Default)]
pub struct LibSndfile;

// SAFETY: this is the library whose behaviour the contract describes; its
// format tables hold static strings.
unsafe impl Backend for LibSndfile {
    unsafe fn command(
        &self,
        handle: Handle,
        opcode: c_int,
        data: *mut c_void,
        size: c_int,
    ) -> c_int {
        sndfile_sys::sf_command(handle.as_ptr(), opcode, data, size)
    }

    fn describe(&self, handle: Handle) -> Option<String> {
        // SAFETY: sf_strerror accepts null and returns static or stream-owned text.
        let message = unsafe { sndfile_sys::sf_strerror(handle.as_ptr()) };
        if message.is_null() {
            return None;
        }
        let text = unsafe { CStr::from_ptr(message) }.to_string_lossy();
        if text.is_empty() {
            None
        } else {
            Some(text.into_owned())
        }
    }
}
