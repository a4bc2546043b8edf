//! Short-lived buffers for `sf_command` payloads.
//!
//! A [`ScratchBuffer`] is allocated right before one native call, holds the
//! input payload (if any), receives the output payload, and is released when
//! it goes out of scope. Every exit path of the dispatcher drops it, so no
//! buffer outlives the call that created it.

use std::mem::{align_of, size_of, size_of_val};
use std::ptr;
use std::slice;

use libc::{c_int, c_void};

use crate::opcode::PayloadShape;

/// Types that are plain bytes: `Copy`, free of padding, and valid when
/// all-zero.
///
/// # Safety
///
/// Implementors must be `repr(C)` (or primitive), contain no references, have
/// no padding bytes, and accept any bit pattern the native library may write,
/// including all zeros. Alignment gaps in a C struct must be spelled out as
/// explicit byte fields.
pub unsafe trait Pod: Copy + 'static {
    /// The all-zero value.
    fn zeroed() -> Self {
        // SAFETY: the trait contract makes all-zero a valid value.
        unsafe { std::mem::zeroed() }
    }
}

unsafe impl Pod for u8 {}
unsafe impl Pod for i8 {}
unsafe impl Pod for i16 {}
unsafe impl Pod for i32 {}
unsafe impl Pod for u32 {}
unsafe impl Pod for i64 {}
unsafe impl Pod for f32 {}
unsafe impl Pod for f64 {}

/// Implement [`Pod`] for `repr(C)` structs given as `Type { field types }`.
///
/// Fails to compile if the listed field sizes do not add up to the struct
/// size, which is the case whenever the compiler inserted padding.
macro_rules! plain_structs {
    ($($ty:ty { $($field:ty),* $(,)? })*) => {
        $(
            const _: () = assert!(
                ::std::mem::size_of::<$ty>() == 0 $(+ ::std::mem::size_of::<$field>())*
            );
            // SAFETY: repr(C), no references, padding ruled out above.
            unsafe impl $crate::scratch::Pod for $ty {}
        )*
    };
}
pub(crate) use plain_structs;

const WORD: usize = size_of::<u64>();

#[cfg(test)]
thread_local! {
    static LIVE: std::cell::Cell<usize> = const { std::cell::Cell::new(0) };
}

/// Number of scratch buffers alive on the current thread.
#[cfg(test)]
pub(crate) fn live_buffers() -> usize {
    LIVE.with(|live| live.get())
}

/// A zero-initialised, 8-byte aligned region owned by a single native call.
#[derive(Debug)]
pub struct ScratchBuffer {
    words: Box<[u64]>,
    len: usize,
}

impl ScratchBuffer {
    /// Allocate `len` zeroed bytes.
    pub fn zeroed(len: usize) -> Self {
        let words = vec![0u64; len.div_ceil(WORD).max(1)].into_boxed_slice();

        #[cfg(test)]
        LIVE.with(|live| live.set(live.get() + 1));

        ScratchBuffer { words, len }
    }

    /// Allocate a buffer holding a copy of `value`.
    pub fn from_value<T: Pod>(value: &T) -> Self {
        let mut buffer = Self::zeroed(size_of::<T>());
        // SAFETY: the buffer is at least size_of::<T>() bytes and 8-aligned.
        unsafe { ptr::write_unaligned(buffer.as_mut_ptr().cast::<T>(), *value) };
        buffer
    }

    /// Allocate a buffer holding a copy of `values`.
    pub fn from_slice<T: Pod>(values: &[T]) -> Self {
        let bytes = size_of_val(values);
        let mut buffer = Self::zeroed(bytes);
        // SAFETY: both regions are `bytes` long and do not overlap.
        unsafe {
            ptr::copy_nonoverlapping(
                values.as_ptr().cast::<u8>(),
                buffer.as_mut_ptr().cast::<u8>(),
                bytes,
            );
        }
        buffer
    }

    /// Size in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the buffer has zero size.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Pointer handed to the native call.
    pub fn as_mut_ptr(&mut self) -> *mut c_void {
        self.words.as_mut_ptr().cast()
    }

    /// The buffer contents.
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: `words` holds at least `len` initialised bytes.
        unsafe { slice::from_raw_parts(self.words.as_ptr().cast::<u8>(), self.len) }
    }

    /// Decode one `T` from the start of the buffer.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is smaller than `T`.
    pub fn read<T: Pod>(&self) -> T {
        assert!(
            size_of::<T>() <= self.len,
            "scratch buffer of {} bytes cannot hold {} bytes",
            self.len,
            size_of::<T>()
        );
        // SAFETY: bounds checked above; `T: Pod` accepts any bytes.
        unsafe { ptr::read_unaligned(self.words.as_ptr().cast::<T>()) }
    }

    /// Decode `count` consecutive `T` values.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is smaller than `count` values.
    pub fn read_slice<T: Pod>(&self, count: usize) -> Vec<T> {
        debug_assert!(align_of::<T>() <= WORD);
        assert!(
            count * size_of::<T>() <= self.len,
            "scratch buffer of {} bytes cannot hold {} values",
            self.len,
            count
        );
        let base = self.words.as_ptr().cast::<T>();
        // SAFETY: bounds checked above; `T: Pod` accepts any bytes.
        (0..count)
            .map(|i| unsafe { ptr::read_unaligned(base.add(i)) })
            .collect()
    }

    /// Decode NUL-terminated text, or `None` when the text is empty.
    ///
    /// The terminator is optional: a full buffer decodes to its whole length,
    /// so callers that must detect truncation check for one first.
    pub fn read_text(&self) -> Option<String> {
        let bytes = self.as_bytes();
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        if end == 0 {
            return None;
        }
        Some(String::from_utf8_lossy(&bytes[..end]).into_owned())
    }
}

impl Drop for ScratchBuffer {
    fn drop(&mut self) {
        #[cfg(test)]
        LIVE.with(|live| live.set(live.get().saturating_sub(1)));
    }
}

/// The `data`/`size` pair of one `sf_command` call.
#[derive(Debug)]
pub(crate) enum Payload {
    /// Null pointer, zero size.
    None,
    /// Null pointer, value in the size slot.
    Arg(c_int),
    /// Pointer to a scratch buffer, its length in the size slot.
    Buffer(ScratchBuffer),
}

impl Payload {
    /// A boolean carried in the size slot.
    pub(crate) fn flag(on: bool) -> Self {
        Payload::Arg(if on {
            sndfile_sys::SF_TRUE
        } else {
            sndfile_sys::SF_FALSE
        })
    }

    /// A zeroed buffer sized for one `T`.
    pub(crate) fn output<T: Pod>() -> Self {
        Payload::Buffer(ScratchBuffer::zeroed(size_of::<T>()))
    }

    /// A buffer holding `value`.
    pub(crate) fn input<T: Pod>(value: &T) -> Self {
        Payload::Buffer(ScratchBuffer::from_value(value))
    }

    /// A zeroed buffer for `count` values of `T`.
    pub(crate) fn array<T: Pod>(count: usize) -> Self {
        Payload::Buffer(ScratchBuffer::zeroed(count * size_of::<T>()))
    }

    /// A buffer holding `values`.
    pub(crate) fn slice<T: Pod>(values: &[T]) -> Self {
        Payload::Buffer(ScratchBuffer::from_slice(values))
    }

    /// A zeroed text buffer of `capacity` bytes.
    pub(crate) fn text(capacity: usize) -> Self {
        Payload::Buffer(ScratchBuffer::zeroed(capacity))
    }

    /// Whether this payload can carry `shape`.
    pub(crate) fn fits(&self, shape: PayloadShape) -> bool {
        match (self, shape) {
            (Payload::None, PayloadShape::None) => true,
            (Payload::Arg(_), PayloadShape::Arg) => true,
            (Payload::Buffer(buf), PayloadShape::Struct(size)) => buf.len() == size,
            (Payload::Buffer(buf), PayloadShape::Int32) => buf.len() == size_of::<i32>(),
            (Payload::Buffer(buf), PayloadShape::Int64) => buf.len() == size_of::<i64>(),
            (Payload::Buffer(buf), PayloadShape::Double) => buf.len() == size_of::<f64>(),
            (Payload::Buffer(buf), PayloadShape::DoubleArray) => {
                !buf.is_empty() && buf.len() % size_of::<f64>() == 0
            }
            (Payload::Buffer(buf), PayloadShape::Int32Array) => {
                !buf.is_empty() && buf.len() % size_of::<i32>() == 0
            }
            (Payload::Buffer(buf), PayloadShape::Text) => !buf.is_empty(),
            _ => false,
        }
    }

    /// Byte length of the buffer, zero for bufferless payloads.
    pub(crate) fn byte_len(&self) -> usize {
        match self {
            Payload::Buffer(buf) => buf.len(),
            Payload::None | Payload::Arg(_) => 0,
        }
    }

    /// The buffer, if there is one.
    pub(crate) fn buffer(&self) -> Option<&ScratchBuffer> {
        match self {
            Payload::Buffer(buf) => Some(buf),
            Payload::None | Payload::Arg(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeroed_is_zero() {
        let buf = ScratchBuffer::zeroed(13);
        assert_eq!(buf.len(), 13);
        assert!(buf.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_value_roundtrip() {
        let buf = ScratchBuffer::from_value(&-12345.25f64);
        assert_eq!(buf.read::<f64>(), -12345.25);

        let buf = ScratchBuffer::from_value(&i64::MIN);
        assert_eq!(buf.read::<i64>(), i64::MIN);
    }

    #[test]
    fn test_slice_roundtrip() {
        let values = [1.5f64, -0.25, 0.0];
        let buf = ScratchBuffer::from_slice(&values);
        assert_eq!(buf.len(), 24);
        assert_eq!(buf.read_slice::<f64>(3), values);
    }

    #[test]
    #[should_panic(expected = "cannot hold")]
    fn test_read_past_end_panics() {
        let buf = ScratchBuffer::zeroed(4);
        let _ = buf.read::<f64>();
    }

    #[test]
    fn test_read_text() {
        let buf = ScratchBuffer::from_slice(b"libsndfile-1.2.2\0garbage");
        assert_eq!(buf.read_text().as_deref(), Some("libsndfile-1.2.2"));

        let unterminated = ScratchBuffer::from_slice(b"abc");
        assert_eq!(unterminated.read_text().as_deref(), Some("abc"));

        assert_eq!(ScratchBuffer::zeroed(16).read_text(), None);
    }

    #[test]
    fn test_buffers_are_released() {
        let before = live_buffers();
        {
            let _a = ScratchBuffer::zeroed(8);
            let _b = ScratchBuffer::from_value(&1i32);
            assert_eq!(live_buffers(), before + 2);
        }
        assert_eq!(live_buffers(), before);
    }

    #[test]
    fn test_payload_fits_shape() {
        assert!(Payload::None.fits(PayloadShape::None));
        assert!(Payload::flag(true).fits(PayloadShape::Arg));
        assert!(Payload::output::<f64>().fits(PayloadShape::Double));
        assert!(Payload::array::<f64>(2).fits(PayloadShape::DoubleArray));
        assert!(!Payload::array::<f64>(0).fits(PayloadShape::DoubleArray));
        assert!(!Payload::output::<i32>().fits(PayloadShape::Int64));
        assert!(!Payload::None.fits(PayloadShape::Double));
        assert!(Payload::output::<i64>().fits(PayloadShape::Struct(8)));
    }

    #[test]
    fn test_flag_payload() {
        assert!(matches!(Payload::flag(true), Payload::Arg(1)));
        assert!(matches!(Payload::flag(false), Payload::Arg(0)));
    }
}
