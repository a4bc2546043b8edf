//! Opaque stream handle.

use std::marker::PhantomData;
use std::ptr;

use sndfile_sys::SNDFILE;

/// A borrowed reference to an open libsndfile stream.
///
/// The dispatcher never opens or closes streams; it only checks that a handle
/// is not [`Handle::NULL`] before running an opcode that needs one. Handles
/// borrow the stream they refer to for `'a`: [`SoundFile::handle`] ties it to
/// the file, so a handle cannot outlive the stream it names.
///
/// ```compile_fail
/// use sndfile_rs::{Handle, SoundFile};
///
/// fn escape(file: SoundFile) -> Handle<'static> {
///     file.handle()
/// }
/// ```
///
/// Wrapping a foreign pointer is `unsafe`:
///
/// ```compile_fail
/// let handle = sndfile_rs::Handle::from_raw(std::ptr::null_mut());
/// ```
///
/// [`SoundFile::handle`]: crate::SoundFile::handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle<'a> {
    ptr: *mut SNDFILE,
    _stream: PhantomData<&'a SNDFILE>,
}

impl<'a> Handle<'a> {
    /// The null sentinel, accepted only by static opcodes.
    pub const NULL: Handle<'a> = Handle {
        ptr: ptr::null_mut(),
        _stream: PhantomData,
    };

    /// Wrap a raw `SNDFILE` pointer owned by foreign code.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or point to a stream opened by libsndfile that stays
    /// open, and is not used from another thread, for all of `'a`.
    pub const unsafe fn from_raw(ptr: *mut SNDFILE) -> Self {
        Handle {
            ptr,
            _stream: PhantomData,
        }
    }

    /// The raw pointer.
    pub const fn as_ptr(self) -> *mut SNDFILE {
        self.ptr
    }

    /// Whether this is the null sentinel.
    pub fn is_null(self) -> bool {
        self.ptr.is_null()
    }
}

impl Default for Handle<'_> {
    fn default() -> Self {
        Handle::NULL
    }
}
