//! Dispatcher tests against a scripted backend.
//!
//! These run without libsndfile: the backend answers each opcode with a
//! fixed result and payload.

use std::cell::RefCell;
use std::collections::HashMap;
use std::ptr::NonNull;

use libc::{c_int, c_void};
use sndfile_rs::{
    Backend, BroadcastInfo, CartInfo, Convention, Cues, Dispatcher, Error, Handle, Instrument,
    LoopInfo, Opcode, PayloadShape, Pod, ResultFamily, ScratchBuffer,
};

/// Answers per opcode; unscripted opcodes fail with -1.
#[derive(Default)]
struct Script {
    replies: HashMap<c_int, (c_int, Vec<u8>)>,
    seen: RefCell<Vec<(c_int, c_int, Vec<u8>)>>,
}

impl Script {
    fn on(mut self, opcode: Opcode, result: c_int) -> Self {
        self.replies.insert(opcode.code(), (result, Vec::new()));
        self
    }

    fn on_with<T: Pod>(mut self, opcode: Opcode, result: c_int, reply: &T) -> Self {
        let bytes = ScratchBuffer::from_value(reply).as_bytes().to_vec();
        self.replies.insert(opcode.code(), (result, bytes));
        self
    }

    fn on_slice<T: Pod>(mut self, opcode: Opcode, result: c_int, reply: &[T]) -> Self {
        let bytes = ScratchBuffer::from_slice(reply).as_bytes().to_vec();
        self.replies.insert(opcode.code(), (result, bytes));
        self
    }

    fn sent(&self, opcode: Opcode) -> Option<(c_int, Vec<u8>)> {
        self.seen
            .borrow()
            .iter()
            .rev()
            .find(|(code, _, _)| *code == opcode.code())
            .map(|(_, size, input)| (*size, input.clone()))
    }
}

// SAFETY: copies at most `size` bytes and keeps nothing; scripted format
// replies only carry null or static string pointers.
unsafe impl Backend for Script {
    unsafe fn command(&self, _handle: Handle, opcode: c_int, data: *mut c_void, size: c_int) -> c_int {
        let mut input = Vec::new();
        let (result, reply) = self.replies.get(&opcode).cloned().unwrap_or((-1, Vec::new()));
        if !data.is_null() {
            let buf = std::slice::from_raw_parts_mut(data.cast::<u8>(), size as usize);
            input.extend_from_slice(buf);
            let n = reply.len().min(buf.len());
            buf[..n].copy_from_slice(&reply[..n]);
        }
        self.seen.borrow_mut().push((opcode, size, input));
        result
    }

    fn describe(&self, _handle: Handle) -> Option<String> {
        Some("scripted failure".to_string())
    }
}

fn stream() -> Handle<'static> {
    // SAFETY: the scripted backend never dereferences the handle.
    unsafe { Handle::from_raw(NonNull::dangling().as_ptr()) }
}

#[test]
fn test_every_toggle_opcode_follows_the_boolean_table() {
    let getters = [
        Opcode::GetNormDouble,
        Opcode::GetNormFloat,
        Opcode::GetClipping,
        Opcode::RawDataNeedsEndswap,
    ];
    for op in getters {
        for (raw, expected) in [(0, Some(false)), (1, Some(true)), (2, None), (-1, None), (99, None)] {
            let sf = Dispatcher::new(Script::default().on(op, raw));
            let got = sf.toggle(stream(), op);
            match expected {
                Some(value) => assert_eq!(got.unwrap(), value, "{} with {}", op, raw),
                None => assert!(
                    matches!(got, Err(Error::Native { code, .. }) if code == raw),
                    "{} with {}",
                    op,
                    raw
                ),
            }
        }
    }
}

/// Send `op` through the family routine its payload shape calls for.
fn boolean_call(sf: &Dispatcher<Script>, op: Opcode) -> sndfile_rs::Result<bool> {
    match op.shape() {
        PayloadShape::None => sf.toggle(stream(), op),
        PayloadShape::Arg => sf.set_toggle(stream(), op, true),
        PayloadShape::Double => sf.store(stream(), op, &0.5f64),
        PayloadShape::Int32 => sf.store(stream(), op, &44100i32),
        PayloadShape::Int32Array => sf.store_array(stream(), op, &[1i32, 2]),
        PayloadShape::Struct(_) => match op {
            Opcode::SetInstrument => sf.store(stream(), op, &Instrument::default()),
            Opcode::SetBroadcastInfo => sf.store(stream(), op, &BroadcastInfo::default()),
            Opcode::SetCartInfo => sf.store(stream(), op, &CartInfo::default()),
            Opcode::SetCue => sf.store(stream(), op, &Cues::default()),
            other => panic!("no payload for boolean struct opcode {}", other),
        },
        other => panic!("no boolean call for {} with {:?}", op, other),
    }
}

#[test]
fn test_every_boolean_opcode_classifies_like_a_toggle() {
    let mut covered = Vec::new();
    for &op in Opcode::ALL {
        if op.convention() != Convention::BooleanResult || op.family() != ResultFamily::Toggle {
            continue;
        }
        covered.push(op);
        for (raw, expected) in [(0, Some(false)), (1, Some(true)), (2, None), (-1, None)] {
            let sf = Dispatcher::new(Script::default().on(op, raw));
            let got = boolean_call(&sf, op);
            match expected {
                Some(value) => assert_eq!(got.unwrap(), value, "{} with {}", op, raw),
                None => assert!(
                    matches!(got, Err(Error::Native { code, .. }) if code == raw),
                    "{} with {}",
                    op,
                    raw
                ),
            }
        }
    }

    for op in [
        Opcode::SetInstrument,
        Opcode::SetBroadcastInfo,
        Opcode::SetCartInfo,
        Opcode::SetCue,
        Opcode::SetChannelMapInfo,
        Opcode::SetVbrEncodingQuality,
        Opcode::SetCompressionLevel,
        Opcode::SetOriginalSamplerate,
    ] {
        assert!(covered.contains(&op), "{} missing from the boolean table", op);
    }
}

#[test]
fn test_setters_carry_flag_in_size_slot() {
    let setters = [
        Opcode::SetNormDouble,
        Opcode::SetNormFloat,
        Opcode::SetScaleFloatIntRead,
        Opcode::SetScaleIntFloatWrite,
        Opcode::SetAddPeakChunk,
        Opcode::SetUpdateHeaderAuto,
        Opcode::SetClipping,
        Opcode::Rf64AutoDowngrade,
    ];
    for op in setters {
        let sf = Dispatcher::new(Script::default().on(op, 0));
        assert!(!sf.set_toggle(stream(), op, true).unwrap());
        let (size, input) = sf.backend().sent(op).unwrap();
        assert_eq!(size, 1, "{}", op);
        assert!(input.is_empty(), "{} should pass a null pointer", op);
    }
}

#[test]
fn test_presence_structs_roundtrip() {
    let mut loop_info = LoopInfo::default();
    loop_info.time_sig_num = 3;
    loop_info.time_sig_den = 4;
    loop_info.bpm = 96.5;

    let mut instrument = Instrument::default();
    instrument.basenote = 48;
    instrument.velocity_hi = 127;

    let mut bext = BroadcastInfo::default();
    bext.set_description("Room tone");
    bext.set_coding_history("A=PCM,F=44100,W=16,M=mono");

    let mut cart = CartInfo::default();
    cart.set_title("Station ID");
    cart.set_tag_text("<tag/>");

    let sf = Dispatcher::new(
        Script::default()
            .on_with(Opcode::GetLoopInfo, 1, &loop_info)
            .on_with(Opcode::GetInstrument, 1, &instrument)
            .on_with(Opcode::GetBroadcastInfo, 1, &bext)
            .on_with(Opcode::GetCartInfo, 1, &cart),
    );

    assert_eq!(sf.loop_info(stream()).unwrap(), Some(loop_info));
    assert_eq!(sf.instrument(stream()).unwrap(), Some(instrument));

    let decoded = sf.broadcast_info(stream()).unwrap().unwrap();
    assert_eq!(decoded, bext);
    assert_eq!(decoded.description(), "Room tone");

    let decoded = sf.cart_info(stream()).unwrap().unwrap();
    assert_eq!(decoded.title(), "Station ID");
    assert_eq!(decoded.tag_text(), "<tag/>");
}

#[test]
fn test_presence_absent_is_none_not_zeroed() {
    let sf = Dispatcher::new(
        Script::default()
            .on(Opcode::GetLoopInfo, 0)
            .on(Opcode::GetCue, 0)
            .on(Opcode::GetSignalMax, 0)
            .on(Opcode::GetChannelMapInfo, 0),
    );
    assert!(sf.loop_info(stream()).unwrap().is_none());
    assert!(sf.cues(stream()).unwrap().is_none());
    assert!(sf.signal_max(stream()).unwrap().is_none());
    assert!(sf.channel_map(stream(), 2).unwrap().is_none());
}

#[test]
fn test_presence_rejects_other_results() {
    for raw in [-1, 2, 5] {
        let sf = Dispatcher::new(Script::default().on(Opcode::GetBroadcastInfo, raw));
        assert!(matches!(
            sf.broadcast_info(stream()),
            Err(Error::Native { opcode: Opcode::GetBroadcastInfo, .. })
        ));
    }
}

#[test]
fn test_array_length_matches_request() {
    let sf = Dispatcher::new(
        Script::default()
            .on_slice(Opcode::CalcNormMaxAllChannels, 0, &[0.5f64, 0.9, 0.1, 0.0])
            .on_slice(Opcode::GetChannelMapInfo, 1, &[2i32, 3]),
    );
    for n in 1..=4 {
        let peaks = sf.calc_norm_max_all_channels(stream(), n).unwrap();
        assert_eq!(peaks.len(), n);
        let (size, _) = sf.backend().sent(Opcode::CalcNormMaxAllChannels).unwrap();
        assert_eq!(size as usize, n * 8);
    }
    assert_eq!(sf.channel_map(stream(), 2).unwrap(), Some(vec![2, 3]));
}

#[test]
fn test_set_cues_sends_whole_table() {
    let mut cues = Cues::default();
    cues.cue_count = 1;
    cues.cue_points[0].sample_offset = 441;
    cues.cue_points[0].set_name("chorus");

    let sf = Dispatcher::new(Script::default().on(Opcode::SetCue, 1));
    assert!(sf.set_cues(stream(), &cues).unwrap());

    let (size, input) = sf.backend().sent(Opcode::SetCue).unwrap();
    assert_eq!(size as usize, std::mem::size_of::<Cues>());
    assert_eq!(input, ScratchBuffer::from_value(&cues).as_bytes());
}

#[test]
fn test_static_opcodes_accept_null_handle() {
    let sf = Dispatcher::new(
        Script::default()
            .on_slice(Opcode::GetLibVersion, 16, b"libsndfile-1.2.2\0")
            .on_with(Opcode::GetSimpleFormatCount, 0, &12i32),
    );
    assert_eq!(sf.lib_version().unwrap(), "libsndfile-1.2.2");
    assert_eq!(sf.simple_format_count().unwrap(), 12);
}

#[test]
fn test_stream_opcodes_reject_null_handle() {
    let sf = Dispatcher::new(Script::default().on(Opcode::GetClipping, 1));
    let checks: Vec<Error> = vec![
        sf.clipping(Handle::NULL).unwrap_err(),
        sf.log_info(Handle::NULL).unwrap_err(),
        sf.calc_max_all_channels(Handle::NULL, 2).unwrap_err(),
        sf.cue_count(Handle::NULL).unwrap_err(),
        sf.set_compression_level(Handle::NULL, 0.5).unwrap_err(),
    ];
    for err in checks {
        assert!(matches!(err, Error::NullHandle { .. }), "{:?}", err);
        assert!(err.is_caller_error());
    }
    assert!(sf.backend().seen.borrow().is_empty());
}

#[test]
fn test_text_failure_modes() {
    let sf = Dispatcher::new(Script::default().on(Opcode::GetLogInfo, 0));
    assert!(matches!(
        sf.log_info(stream()),
        Err(Error::Native { opcode: Opcode::GetLogInfo, .. })
    ));

    let sf = Dispatcher::new(Script::default());
    match sf.lib_version().unwrap_err() {
        Error::Native { code, message, .. } => {
            assert_eq!(code, -1);
            assert_eq!(message, "scripted failure");
        }
        other => panic!("Expected Native, got {:?}", other),
    }
}

#[test]
fn test_text_capacity_bounds_the_buffer() {
    let sf = Dispatcher::new(
        Script::default().on_slice(Opcode::GetLibVersion, 16, b"libsndfile-1.2.2\0"),
    );
    let err = sf.lib_version_with_capacity(4).unwrap_err();
    assert!(matches!(
        err,
        Error::TextTruncated { opcode: Opcode::GetLibVersion, capacity: 4 }
    ));
    assert!(!err.is_caller_error());
    let (size, _) = sf.backend().sent(Opcode::GetLibVersion).unwrap();
    assert_eq!(size, 4);

    assert_eq!(sf.lib_version_with_capacity(32).unwrap(), "libsndfile-1.2.2");
}

#[test]
fn test_text_reaching_capacity_is_truncated() {
    // libsndfile NUL-terminates a cut log and reports the bytes it copied.
    let sf = Dispatcher::new(Script::default().on_slice(Opcode::GetLogInfo, 7, b"Length \0"));
    assert!(matches!(
        sf.log_info_with_capacity(stream(), 8),
        Err(Error::TextTruncated { capacity: 8, .. })
    ));

    let sf = Dispatcher::new(Script::default().on_slice(Opcode::GetLogInfo, 6, b"Length\0"));
    assert_eq!(sf.log_info_with_capacity(stream(), 8).unwrap(), "Length");
}
