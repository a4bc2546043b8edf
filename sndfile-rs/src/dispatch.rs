//! The command dispatcher.
//!
//! [`Dispatcher`] runs one opcode against one handle with one typed payload.
//! Every call goes through the same pipeline:
//!
//! 1. the routine checks that the opcode's family and payload shape are ones
//!    it can marshal, else [`Error::UnsupportedShape`];
//! 2. a null handle is rejected for opcodes that need a stream;
//! 3. the payload is validated and its scratch buffer allocated;
//! 4. `sf_command` is invoked and its result classified;
//! 5. the output, if any, is decoded and the buffer released.
//!
//! Steps 3 to 5 share one owned [`Payload`], so the buffer is released on
//! every exit path. Caller errors in steps 1 to 3 happen before allocation.
//!
//! # Example
//!
//! ```no_run
//! use sndfile_rs::{Dispatcher, Handle, Opcode};
//!
//! let dispatcher = Dispatcher::native();
//! let version = dispatcher.text(Handle::NULL, Opcode::GetLibVersion, 128)?;
//! println!("{}", version);
//! # Ok::<(), sndfile_rs::Error>(())
//! ```

use std::any::TypeId;
use std::mem::{size_of, size_of_val};
use std::ptr;

use libc::c_int;
use log::{debug, trace};

use crate::backend::{Backend, LibSndfile};
use crate::classify::{classify, flag_matches, ResultFamily, Verdict};
use crate::error::{Error, Result};
use crate::handle::Handle;
use crate::opcode::{Opcode, PayloadShape};
use crate::scratch::{Payload, Pod, ScratchBuffer};

/// Executes `sf_command` opcodes through a [`Backend`].
#[derive(Debug, Clone, Default)]
pub struct Dispatcher<B = LibSndfile> {
    backend: B,
}

impl Dispatcher<LibSndfile> {
    /// A dispatcher over the linked libsndfile.
    pub const fn native() -> Self {
        Dispatcher {
            backend: LibSndfile,
        }
    }
}

/// The classified outcome of one native call, still holding its payload.
#[derive(Debug)]
pub(crate) struct Exchange {
    opcode: Opcode,
    raw: i32,
    verdict: Verdict,
    payload: Payload,
}

impl Exchange {
    pub(crate) fn verdict(&self) -> Verdict {
        self.verdict
    }

    fn buffer(&self) -> Result<&ScratchBuffer> {
        self.payload
            .buffer()
            .ok_or_else(|| Error::unsupported(self.opcode, "buffer payload"))
    }

    fn read<T: Pod>(&self) -> Result<T> {
        Ok(self.buffer()?.read())
    }

    fn read_slice<T: Pod>(&self, count: usize) -> Result<Vec<T>> {
        Ok(self.buffer()?.read_slice(count))
    }

    /// `Absent` becomes `None`, `Present` and `Success` decode with `f`.
    fn optional<T>(&self, f: impl FnOnce(&Self) -> Result<T>) -> Result<Option<T>> {
        match self.verdict {
            Verdict::Absent => Ok(None),
            Verdict::Present | Verdict::Success => f(self).map(Some),
            other => Err(self.mismatch(other)),
        }
    }

    fn boolean(&self) -> Result<bool> {
        match self.verdict {
            Verdict::Boolean(on) => Ok(on),
            other => Err(self.mismatch(other)),
        }
    }

    fn mismatch(&self, verdict: Verdict) -> Error {
        Error::native(
            self.opcode,
            self.raw,
            format!("unexpected verdict {:?}", verdict),
        )
    }
}

/// Whether values of `T` can carry `shape`.
fn element_fits<T: Pod>(shape: PayloadShape) -> bool {
    let ty = TypeId::of::<T>();
    match shape {
        PayloadShape::Int32 | PayloadShape::Int32Array => ty == TypeId::of::<i32>(),
        PayloadShape::Int64 => ty == TypeId::of::<i64>(),
        PayloadShape::Double | PayloadShape::DoubleArray => ty == TypeId::of::<f64>(),
        PayloadShape::Struct(size) => size == size_of::<T>(),
        PayloadShape::None | PayloadShape::Arg | PayloadShape::Text => false,
    }
}

fn is_single(shape: PayloadShape) -> bool {
    matches!(
        shape,
        PayloadShape::Int32 | PayloadShape::Int64 | PayloadShape::Double | PayloadShape::Struct(_)
    )
}

fn is_array(shape: PayloadShape) -> bool {
    matches!(shape, PayloadShape::DoubleArray | PayloadShape::Int32Array)
}

/// Reject buffers the `int` size slot cannot describe.
pub(crate) fn check_len(opcode: Opcode, bytes: usize) -> Result<usize> {
    if bytes > c_int::MAX as usize {
        return Err(Error::PayloadTooLarge {
            opcode,
            size: bytes,
        });
    }
    Ok(bytes)
}

impl<B: Backend> Dispatcher<B> {
    /// A dispatcher over `backend`.
    pub const fn new(backend: B) -> Self {
        Dispatcher { backend }
    }

    /// The backend commands are sent to.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Fail with [`Error::UnsupportedShape`] unless `ok`.
    fn route(opcode: Opcode, expected: &'static str, ok: bool) -> Result<()> {
        if ok {
            Ok(())
        } else {
            Err(Error::unsupported(opcode, expected))
        }
    }

    /// Reject the null handle for opcodes that need a stream.
    pub(crate) fn require_handle(opcode: Opcode, handle: Handle) -> Result<()> {
        if opcode.requires_handle() && handle.is_null() {
            return Err(Error::NullHandle { opcode });
        }
        Ok(())
    }

    /// Run one native call.
    ///
    /// `build` validates the input and allocates the payload; it only runs
    /// once the handle has been accepted.
    pub(crate) fn exchange(
        &self,
        handle: Handle,
        opcode: Opcode,
        build: impl FnOnce() -> Result<Payload>,
    ) -> Result<Exchange> {
        Self::require_handle(opcode, handle)?;

        let mut payload = build()?;
        if !payload.fits(opcode.shape()) {
            return Err(Error::unsupported(opcode, "payload of its declared shape"));
        }
        let bytes = check_len(opcode, payload.byte_len())?;

        let (data, size) = match &mut payload {
            Payload::None => (ptr::null_mut(), 0),
            Payload::Arg(value) => (ptr::null_mut(), *value),
            Payload::Buffer(buffer) => (buffer.as_mut_ptr(), bytes as c_int),
        };

        // SAFETY: `data` is null or a live scratch buffer of exactly `size`
        // bytes, sized for the opcode's declared shape. The handle is non-null
        // whenever the opcode needs one.
        let raw = unsafe { self.backend.command(handle, opcode.code(), data, size) };
        trace!("sf_command {} size={} -> {}", opcode, size, raw);

        let verdict = classify(opcode.family(), raw);
        if verdict.is_fatal() {
            return Err(self.failure(handle, opcode, raw));
        }

        Ok(Exchange {
            opcode,
            raw,
            verdict,
            payload,
        })
    }

    fn failure(&self, handle: Handle, opcode: Opcode, raw: i32) -> Error {
        let message = if raw < 0 {
            self.backend
                .describe(handle)
                .unwrap_or_else(|| "native call reported failure".to_string())
        } else {
            format!("result outside the {:?} family", opcode.family())
        };
        debug!("{} failed with {}: {}", opcode, raw, message);
        Error::native(opcode, raw, message)
    }

    // ------------------------------------------------------------------
    // Booleans and modes
    // ------------------------------------------------------------------

    /// Query a boolean setting.
    pub fn toggle(&self, handle: Handle, opcode: Opcode) -> Result<bool> {
        Self::route(
            opcode,
            "boolean query",
            opcode.family() == ResultFamily::Toggle && opcode.shape() == PayloadShape::None,
        )?;
        self.exchange(handle, opcode, || Ok(Payload::None))?
            .boolean()
    }

    /// Change a boolean setting; returns the library's boolean reply.
    pub fn set_toggle(&self, handle: Handle, opcode: Opcode, on: bool) -> Result<bool> {
        Self::route(
            opcode,
            "boolean setting",
            opcode.family() == ResultFamily::Toggle && opcode.shape() == PayloadShape::Arg,
        )?;
        self.exchange(handle, opcode, || Ok(Payload::flag(on)))?
            .boolean()
    }

    /// Query a mode bit pattern.
    pub fn mode(&self, handle: Handle, opcode: Opcode) -> Result<i32> {
        Self::route(
            opcode,
            "mode query",
            opcode.family() == ResultFamily::BitFlag && opcode.shape() == PayloadShape::None,
        )?;
        let exchange = self.exchange(handle, opcode, || Ok(Payload::None))?;
        match exchange.verdict() {
            Verdict::Flag(bits) => Ok(bits),
            other => Err(exchange.mismatch(other)),
        }
    }

    /// Request a mode; true only if the library replies with exactly `bits`.
    pub fn set_mode(&self, handle: Handle, opcode: Opcode, bits: i32) -> Result<bool> {
        Self::route(
            opcode,
            "mode setting",
            opcode.family() == ResultFamily::BitFlag && opcode.shape() == PayloadShape::Arg,
        )?;
        let exchange = self.exchange(handle, opcode, || Ok(Payload::Arg(bits)))?;
        match exchange.verdict() {
            Verdict::Flag(raw) => Ok(flag_matches(bits, raw)),
            other => Err(exchange.mismatch(other)),
        }
    }

    // ------------------------------------------------------------------
    // Scalars and structs
    // ------------------------------------------------------------------

    /// Run an opcode with no payload and no output.
    pub fn run(&self, handle: Handle, opcode: Opcode) -> Result<()> {
        Self::route(
            opcode,
            "plain command",
            opcode.family() == ResultFamily::Value && opcode.shape() == PayloadShape::None,
        )?;
        self.exchange(handle, opcode, || Ok(Payload::None))?;
        Ok(())
    }

    /// Read a scalar or struct.
    pub fn value<T: Pod>(&self, handle: Handle, opcode: Opcode) -> Result<T> {
        self.value_from(handle, opcode, &T::zeroed())
    }

    /// Read a scalar or struct whose buffer starts out as `seed`.
    ///
    /// Format queries use the seed to carry the index or format word.
    pub fn value_from<T: Pod>(&self, handle: Handle, opcode: Opcode, seed: &T) -> Result<T> {
        self.value_with(handle, opcode, || Ok(*seed))
    }

    pub(crate) fn value_with<T: Pod>(
        &self,
        handle: Handle,
        opcode: Opcode,
        seed: impl FnOnce() -> Result<T>,
    ) -> Result<T> {
        Self::route(
            opcode,
            "value output",
            opcode.family() == ResultFamily::Value
                && is_single(opcode.shape())
                && element_fits::<T>(opcode.shape()),
        )?;
        self.exchange(handle, opcode, || Ok(Payload::input(&seed()?)))?
            .read()
    }

    /// Read a scalar or struct that may be absent from the file.
    pub fn optional_value<T: Pod>(&self, handle: Handle, opcode: Opcode) -> Result<Option<T>> {
        Self::route(
            opcode,
            "optional value output",
            opcode.family() == ResultFamily::Presence
                && is_single(opcode.shape())
                && element_fits::<T>(opcode.shape()),
        )?;
        self.exchange(handle, opcode, || Ok(Payload::output::<T>()))?
            .optional(Exchange::read)
    }

    /// Send a scalar or struct to a command with no boolean reply.
    pub fn send<T: Pod>(&self, handle: Handle, opcode: Opcode, value: &T) -> Result<()> {
        self.send_with(handle, opcode, || Ok(*value))
    }

    pub(crate) fn send_with<T: Pod>(
        &self,
        handle: Handle,
        opcode: Opcode,
        value: impl FnOnce() -> Result<T>,
    ) -> Result<()> {
        Self::route(
            opcode,
            "value input",
            opcode.family() == ResultFamily::Value
                && is_single(opcode.shape())
                && element_fits::<T>(opcode.shape()),
        )?;
        self.exchange(handle, opcode, || Ok(Payload::input(&value()?)))?;
        Ok(())
    }

    /// Send a scalar or struct; returns the library's boolean reply.
    pub fn store<T: Pod>(&self, handle: Handle, opcode: Opcode, value: &T) -> Result<bool> {
        self.store_with(handle, opcode, || Ok(*value))
    }

    pub(crate) fn store_with<T: Pod>(
        &self,
        handle: Handle,
        opcode: Opcode,
        value: impl FnOnce() -> Result<T>,
    ) -> Result<bool> {
        Self::route(
            opcode,
            "value setting",
            opcode.family() == ResultFamily::Toggle
                && is_single(opcode.shape())
                && element_fits::<T>(opcode.shape()),
        )?;
        self.exchange(handle, opcode, || Ok(Payload::input(&value()?)))?
            .boolean()
    }

    // ------------------------------------------------------------------
    // Arrays
    // ------------------------------------------------------------------

    fn array_payload<T: Pod>(opcode: Opcode, count: usize) -> Result<Payload> {
        if count == 0 {
            return Err(Error::EmptyPayload {
                opcode,
                what: "channel count",
            });
        }
        let bytes = count
            .checked_mul(size_of::<T>())
            .ok_or(Error::PayloadTooLarge {
                opcode,
                size: usize::MAX,
            })?;
        check_len(opcode, bytes)?;
        Ok(Payload::array::<T>(count))
    }

    /// Read one value per channel.
    pub fn array<T: Pod>(&self, handle: Handle, opcode: Opcode, count: usize) -> Result<Vec<T>> {
        Self::route(
            opcode,
            "array output",
            opcode.family() == ResultFamily::Array
                && is_array(opcode.shape())
                && element_fits::<T>(opcode.shape()),
        )?;
        self.exchange(handle, opcode, || Self::array_payload::<T>(opcode, count))?
            .read_slice(count)
    }

    /// Read one value per channel, if the file has them.
    pub fn optional_array<T: Pod>(
        &self,
        handle: Handle,
        opcode: Opcode,
        count: usize,
    ) -> Result<Option<Vec<T>>> {
        Self::route(
            opcode,
            "optional array output",
            opcode.family() == ResultFamily::Presence
                && is_array(opcode.shape())
                && element_fits::<T>(opcode.shape()),
        )?;
        self.exchange(handle, opcode, || Self::array_payload::<T>(opcode, count))?
            .optional(|exchange| exchange.read_slice(count))
    }

    /// Send one value per channel; returns the library's boolean reply.
    pub fn store_array<T: Pod>(&self, handle: Handle, opcode: Opcode, values: &[T]) -> Result<bool> {
        Self::route(
            opcode,
            "array setting",
            opcode.family() == ResultFamily::Toggle
                && is_array(opcode.shape())
                && element_fits::<T>(opcode.shape()),
        )?;
        self.exchange(handle, opcode, || {
            if values.is_empty() {
                return Err(Error::EmptyPayload {
                    opcode,
                    what: "value array",
                });
            }
            check_len(opcode, size_of_val(values))?;
            Ok(Payload::slice(values))
        })?
        .boolean()
    }

    // ------------------------------------------------------------------
    // Text
    // ------------------------------------------------------------------

    /// Read NUL-terminated text into a buffer of `capacity` bytes.
    ///
    /// Empty text is reported as [`Error::Native`].
    pub fn text(&self, handle: Handle, opcode: Opcode, capacity: usize) -> Result<String> {
        Self::route(
            opcode,
            "text output",
            opcode.family() == ResultFamily::Text && opcode.shape() == PayloadShape::Text,
        )?;
        let exchange = self.exchange(handle, opcode, || {
            if capacity == 0 {
                return Err(Error::EmptyPayload {
                    opcode,
                    what: "text capacity",
                });
            }
            check_len(opcode, capacity)?;
            Ok(Payload::text(capacity))
        })?;
        let buffer = exchange.buffer()?;
        // A reported length whose NUL reaches the last byte may have been cut.
        let filled = usize::try_from(exchange.raw).is_ok_and(|len| len + 1 >= capacity);
        if filled || !buffer.as_bytes().contains(&0) {
            return Err(Error::TextTruncated { opcode, capacity });
        }
        buffer
            .read_text()
            .ok_or_else(|| Error::native(opcode, exchange.raw, "library returned empty text"))
    }
}


#[cfg(test)]
mod tests {
    use super::mock::MockBackend;
    use super::*;
    use crate::metadata::LoopInfo;
    use crate::scratch::live_buffers;
    use std::ptr::NonNull;

    fn live() -> Handle<'static> {
        // SAFETY: the mock backend never dereferences the handle.
        unsafe { Handle::from_raw(NonNull::dangling().as_ptr()) }
    }

    fn bytes_of<T: Pod>(value: &T) -> Vec<u8> {
        ScratchBuffer::from_value(value).as_bytes().to_vec()
    }

    #[test]
    fn test_toggle_classification() {
        for (raw, expected) in [(0, Some(false)), (1, Some(true)), (2, None), (-1, None)] {
            let dispatcher = Dispatcher::new(MockBackend::returning(raw));
            let result = dispatcher.toggle(live(), Opcode::GetClipping);
            match expected {
                Some(on) => assert_eq!(result.unwrap(), on),
                None => assert!(matches!(result, Err(Error::Native { code, .. }) if code == raw)),
            }
        }
    }

    #[test]
    fn test_set_toggle_passes_flag_in_size_slot() {
        let dispatcher = Dispatcher::new(MockBackend::returning(1));
        assert!(dispatcher.set_toggle(live(), Opcode::SetClipping, true).unwrap());

        let call = dispatcher.backend().last_call();
        assert_eq!(call.opcode, sndfile_sys::SFC_SET_CLIPPING);
        assert!(call.null_data);
        assert_eq!(call.size, sndfile_sys::SF_TRUE);
        assert_eq!(call.live_buffers, live_buffers());
    }

    #[test]
    fn test_null_handle_rejected_before_call() {
        let dispatcher = Dispatcher::new(MockBackend::returning(1));
        let before = live_buffers();
        let err = dispatcher
            .optional_value::<LoopInfo>(Handle::NULL, Opcode::GetLoopInfo)
            .unwrap_err();
        assert!(matches!(err, Error::NullHandle { opcode: Opcode::GetLoopInfo }));
        assert!(err.is_caller_error());
        assert_eq!(dispatcher.backend().call_count(), 0);
        assert_eq!(live_buffers(), before);
    }

    #[test]
    fn test_static_opcode_accepts_null_handle() {
        let dispatcher = Dispatcher::new(MockBackend::replying(16, b"libsndfile-1.2.2\0"));
        let version = dispatcher
            .text(Handle::NULL, Opcode::GetLibVersion, 128)
            .unwrap();
        assert_eq!(version, "libsndfile-1.2.2");
        assert_eq!(dispatcher.backend().last_call().size, 128);
    }

    #[test]
    fn test_empty_text_is_native_failure() {
        let dispatcher = Dispatcher::new(MockBackend::returning(0));
        let err = dispatcher.text(live(), Opcode::GetLogInfo, 64).unwrap_err();
        assert!(matches!(err, Error::Native { opcode: Opcode::GetLogInfo, code: 0, .. }));
        assert!(!err.is_caller_error());
    }

    #[test]
    fn test_unterminated_text_is_truncated() {
        let before = live_buffers();
        let dispatcher = Dispatcher::new(MockBackend::replying(10, b"libsndfile"));
        let err = dispatcher.text(Handle::NULL, Opcode::GetLibVersion, 5).unwrap_err();
        assert!(matches!(err, Error::TextTruncated { capacity: 5, .. }));
        assert_eq!(live_buffers(), before);

        let dispatcher = Dispatcher::new(MockBackend::replying(3, b"lib\0"));
        let err = dispatcher.text(Handle::NULL, Opcode::GetLibVersion, 4).unwrap_err();
        assert!(matches!(err, Error::TextTruncated { capacity: 4, .. }));

        let dispatcher = Dispatcher::new(MockBackend::replying(3, b"lib\0"));
        assert_eq!(
            dispatcher.text(Handle::NULL, Opcode::GetLibVersion, 8).unwrap(),
            "lib"
        );
    }

    #[test]
    fn test_zero_text_capacity_is_caller_error() {
        let dispatcher = Dispatcher::new(MockBackend::returning(0));
        let err = dispatcher.text(Handle::NULL, Opcode::GetLibVersion, 0).unwrap_err();
        assert!(matches!(err, Error::EmptyPayload { .. }));
        assert_eq!(dispatcher.backend().call_count(), 0);
    }

    #[test]
    fn test_presence_absent_and_present() {
        let dispatcher = Dispatcher::new(MockBackend::returning(0));
        assert_eq!(
            dispatcher
                .optional_value::<LoopInfo>(live(), Opcode::GetLoopInfo)
                .unwrap(),
            None
        );

        let mut info = LoopInfo::default();
        info.bpm = 120.0;
        info.num_beats = 8;
        let dispatcher = Dispatcher::new(MockBackend::replying(1, &bytes_of(&info)));
        assert_eq!(
            dispatcher
                .optional_value::<LoopInfo>(live(), Opcode::GetLoopInfo)
                .unwrap(),
            Some(info)
        );

        for raw in [-1, 2] {
            let dispatcher = Dispatcher::new(MockBackend::returning(raw));
            assert!(dispatcher
                .optional_value::<LoopInfo>(live(), Opcode::GetLoopInfo)
                .is_err());
        }
    }

    #[test]
    fn test_array_has_requested_length() {
        let peaks = [0.5f64, 0.25, 1.0];
        let reply = ScratchBuffer::from_slice(&peaks).as_bytes().to_vec();
        let dispatcher = Dispatcher::new(MockBackend::replying(0, &reply));
        let values = dispatcher
            .array::<f64>(live(), Opcode::CalcMaxAllChannels, 3)
            .unwrap();
        assert_eq!(values, peaks);
        assert_eq!(dispatcher.backend().last_call().size, 24);

        let dispatcher = Dispatcher::new(MockBackend::returning(1));
        assert!(dispatcher
            .array::<f64>(live(), Opcode::CalcMaxAllChannels, 3)
            .is_err());
    }

    #[test]
    fn test_zero_channels_rejected_before_allocation() {
        let dispatcher = Dispatcher::new(MockBackend::returning(0));
        let before = live_buffers();
        let err = dispatcher
            .array::<f64>(live(), Opcode::CalcMaxAllChannels, 0)
            .unwrap_err();
        assert!(matches!(err, Error::EmptyPayload { .. }));
        assert_eq!(dispatcher.backend().call_count(), 0);
        assert_eq!(live_buffers(), before);
    }

    #[test]
    fn test_set_mode_requires_exact_bits() {
        let requested = sndfile_sys::SF_AMBISONIC_B_FORMAT;
        let dispatcher = Dispatcher::new(MockBackend::returning(requested));
        assert!(dispatcher
            .set_mode(live(), Opcode::WavexSetAmbisonic, requested)
            .unwrap());
        assert_eq!(dispatcher.backend().last_call().size, requested);

        let dispatcher = Dispatcher::new(MockBackend::returning(requested ^ 1));
        assert!(!dispatcher
            .set_mode(live(), Opcode::WavexSetAmbisonic, requested)
            .unwrap());
    }

    #[test]
    fn test_negative_mode_reply_is_native_failure() {
        let dispatcher = Dispatcher::new(MockBackend::returning(-1));
        let err = dispatcher
            .set_mode(live(), Opcode::WavexSetAmbisonic, sndfile_sys::SF_AMBISONIC_B_FORMAT)
            .unwrap_err();
        assert!(matches!(err, Error::Native { code: -1, .. }));

        let err = dispatcher
            .set_mode(live(), Opcode::WavexSetAmbisonic, -1)
            .unwrap_err();
        assert!(matches!(err, Error::Native { code: -1, .. }));

        let err = dispatcher
            .mode(live(), Opcode::WavexGetAmbisonic)
            .unwrap_err();
        assert!(matches!(err, Error::Native { code: -1, .. }));
    }

    #[test]
    fn test_buffer_alive_during_call_and_released_after() {
        let before = live_buffers();
        let dispatcher = Dispatcher::new(MockBackend::returning(-1));
        assert!(dispatcher.value::<f64>(live(), Opcode::CalcSignalMax).is_err());
        assert_eq!(dispatcher.backend().last_call().live_buffers, before + 1);
        assert_eq!(live_buffers(), before);

        let dispatcher = Dispatcher::new(MockBackend::replying(0, &bytes_of(&0.75f64)));
        assert_eq!(
            dispatcher.value::<f64>(live(), Opcode::CalcSignalMax).unwrap(),
            0.75
        );
        assert_eq!(live_buffers(), before);
    }

    #[test]
    fn test_input_is_written_before_call() {
        let dispatcher = Dispatcher::new(MockBackend::returning(1));
        assert!(dispatcher.store(live(), Opcode::SetVbrEncodingQuality, &0.5f64).unwrap());
        assert_eq!(dispatcher.backend().last_call().input, bytes_of(&0.5f64));

        let seed = crate::metadata::RawFormatInfo::seed(sndfile_sys::SF_FORMAT_WAV);
        let dispatcher = Dispatcher::new(MockBackend::returning(0));
        let out = dispatcher
            .value_from(Handle::NULL, Opcode::GetFormatInfo, &seed)
            .unwrap();
        assert_eq!(out.format, sndfile_sys::SF_FORMAT_WAV);
        let input = dispatcher.backend().last_call().input;
        assert_eq!(input[..4], sndfile_sys::SF_FORMAT_WAV.to_ne_bytes());
    }

    #[test]
    fn test_unsupported_shape_is_reported_without_call() {
        let dispatcher = Dispatcher::new(MockBackend::returning(0));

        let err = dispatcher.toggle(live(), Opcode::GetLibVersion).unwrap_err();
        assert!(matches!(err, Error::UnsupportedShape { .. }));

        let err = dispatcher
            .value::<i32>(live(), Opcode::CalcSignalMax)
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedShape { .. }));

        let err = dispatcher
            .array::<i32>(live(), Opcode::CalcMaxAllChannels, 2)
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedShape { .. }));

        assert_eq!(dispatcher.backend().call_count(), 0);
    }

    #[test]
    fn test_native_error_uses_backend_description() {
        let mut backend = MockBackend::returning(-1);
        backend.message = Some("Unsupported operation".to_string());
        let dispatcher = Dispatcher::new(backend);
        match dispatcher.run(live(), Opcode::UpdateHeaderNow).unwrap_err() {
            Error::Native { message, code, .. } => {
                assert_eq!(code, -1);
                assert_eq!(message, "Unsupported operation");
            }
            other => panic!("Expected Native, got {:?}", other),
        }
    }

    #[test]
    fn test_store_array_rejects_empty_slice() {
        let dispatcher = Dispatcher::new(MockBackend::returning(1));
        let err = dispatcher
            .store_array::<i32>(live(), Opcode::SetChannelMapInfo, &[])
            .unwrap_err();
        assert!(matches!(err, Error::EmptyPayload { .. }));
        assert!(dispatcher
            .store_array(live(), Opcode::SetChannelMapInfo, &[2i32, 3])
            .unwrap());
        assert_eq!(dispatcher.backend().last_call().size, 8);
    }
}
