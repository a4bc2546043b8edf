//! Implementation of `sndinfo info`.

use anyhow::{Context, Result};
use sndfile_rs::{Backend, Commands, Dispatcher, Format, LoopInfo, Mode, SoundFile, Tag};

use crate::cli::{Args, InfoArgs};
use crate::output::{
    format_dbfs, format_duration, format_number, print_header, print_kv, print_separator,
    print_verbose,
};

/// Show stream parameters and metadata of a sound file.
pub fn run(args: &Args, info: &InfoArgs) -> Result<()> {
    print_verbose(&format!("Opening {}", info.file.display()), args.verbose);

    let file = SoundFile::open(&info.file, Mode::Read, None)
        .with_context(|| format!("Failed to open {}", info.file.display()))?;
    let params = *file.info();
    let commands = file.commands();

    print_header(&info.file.display().to_string());
    print_kv("Container", &format_name(params.format.major(), true), 2);
    print_kv("Encoding", &format_name(params.format.subtype(), false), 2);
    print_kv("Sample rate", &format!("{} Hz", params.samplerate), 2);
    print_kv("Channels", &params.channels.to_string(), 2);
    print_kv("Frames", &format_number(params.frames.max(0) as u64), 2);
    print_kv("Duration", &format_duration(params.duration()), 2);
    print_kv("Seekable", yes_no(params.is_seekable()), 2);

    let tags: Vec<_> = Tag::ALL
        .iter()
        .filter_map(|&tag| file.tag(tag).map(|value| (tag, value)))
        .collect();
    if !tags.is_empty() {
        print_header("Tags");
        for (tag, value) in &tags {
            print_kv(tag_label(*tag), value, 2);
        }
    }

    print_header("Metadata");
    let channels = params.channels.max(0) as usize;
    match commands.signal_max().context("Failed to read PEAK chunk")? {
        Some(peak) => print_kv("Peak", &format!("{:.6} ({})", peak, format_dbfs(peak)), 2),
        None => print_kv("Peak", "none", 2),
    }
    if let Some(peaks) =
        stored_peaks(&commands, channels).context("Failed to read channel peaks")?
    {
        print_kv("Channel peaks", &join_peaks(&peaks), 2);
    }
    match commands.loop_info().context("Failed to read loop info")? {
        Some(loop_info) => print_kv("Loop", &describe_loop(&loop_info), 2),
        None => print_kv("Loop", "none", 2),
    }
    match commands.instrument().context("Failed to read instrument chunk")? {
        Some(instrument) => print_kv(
            "Instrument",
            &format!(
                "base note {}, {} loop(s)",
                instrument.basenote,
                instrument.active_loops().len()
            ),
            2,
        ),
        None => print_kv("Instrument", "none", 2),
    }
    match commands.broadcast_info().context("Failed to read bext chunk")? {
        Some(bext) => {
            print_kv("Broadcast", &bext.description(), 2);
            print_kv("Originator", &bext.originator(), 4);
            print_kv(
                "Time reference",
                &format_number(bext.time_reference()),
                4,
            );
        }
        None => print_kv("Broadcast", "none", 2),
    }
    match commands.cart_info().context("Failed to read cart chunk")? {
        Some(cart) => print_kv("Cart", &format!("{} / {}", cart.title(), cart.artist()), 2),
        None => print_kv("Cart", "none", 2),
    }
    let cues = commands.cue_count().context("Failed to read cue count")?;
    print_kv("Cue points", &cues.unwrap_or(0).to_string(), 2);

    if info.calc_max {
        print_verbose("Scanning samples for peaks", args.verbose);
        let peaks =
            measured_peaks(&commands, channels).context("Failed to scan channel peaks")?;
        print_header("Measured peaks");
        for (channel, peak) in peaks.iter().enumerate() {
            print_kv(
                &format!("Channel {}", channel + 1),
                &format!("{:.6} ({})", peak, format_dbfs(*peak)),
                2,
            );
        }
    }

    if info.log {
        let log = commands.log_info().context("Failed to read log")?;
        print_header("Log");
        print_separator();
        print!("{}", log);
        if !log.ends_with('\n') {
            println!();
        }
        print_separator();
    }

    Ok(())
}

/// Per-channel peaks from the PEAK chunk; a file without channels has none.
fn stored_peaks<B: Backend>(
    commands: &Commands<'_, B>,
    channels: usize,
) -> sndfile_rs::Result<Option<Vec<f64>>> {
    if channels == 0 {
        return Ok(None);
    }
    commands.max_all_channels(channels)
}

/// Per-channel peaks measured from the samples.
fn measured_peaks<B: Backend>(
    commands: &Commands<'_, B>,
    channels: usize,
) -> sndfile_rs::Result<Vec<f64>> {
    if channels == 0 {
        return Ok(Vec::new());
    }
    commands.calc_norm_max_all_channels(channels)
}

/// Look up a format's display name, falling back to its hex value.
fn format_name(format: Format, major: bool) -> String {
    let sf = Dispatcher::native();
    let found = if major {
        sf.major_format_count().ok().and_then(|count| {
            (0..count)
                .filter_map(|i| sf.major_format(i).ok())
                .find(|entry| entry.format == format)
        })
    } else {
        sf.format_info(format).ok()
    };
    match found {
        Some(entry) => format!("{} ({})", entry.name, format),
        None => format.to_string(),
    }
}

fn describe_loop(info: &LoopInfo) -> String {
    let mode = match info.mode() {
        Some(mode) => format!("{:?}", mode).to_lowercase(),
        None => "unknown".to_string(),
    };
    format!(
        "{} beats, {}/{}, {:.1} bpm, {}",
        info.num_beats, info.time_sig_num, info.time_sig_den, info.bpm, mode
    )
}

fn join_peaks(peaks: &[f64]) -> String {
    peaks
        .iter()
        .map(|p| format!("{:.4}", p))
        .collect::<Vec<_>>()
        .join(", ")
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn tag_label(tag: Tag) -> &'static str {
    match tag {
        Tag::Title => "Title",
        Tag::Copyright => "Copyright",
        Tag::Software => "Software",
        Tag::Artist => "Artist",
        Tag::Comment => "Comment",
        Tag::Date => "Date",
        Tag::Album => "Album",
        Tag::License => "License",
        Tag::TrackNumber => "Track",
        Tag::Genre => "Genre",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sndfile_rs::Handle;
    use std::cell::Cell;
    use std::ffi::c_void;
    use std::os::raw::c_int;
    use std::ptr::NonNull;

    /// Counts calls and reports no PEAK chunk.
    #[derive(Default)]
    struct Counting {
        calls: Cell<usize>,
    }

    // SAFETY: never touches `data`.
    unsafe impl Backend for Counting {
        unsafe fn command(&self, _: Handle, _: c_int, _: *mut c_void, _: c_int) -> c_int {
            self.calls.set(self.calls.get() + 1);
            0
        }
    }

    fn stream() -> Handle<'static> {
        // SAFETY: the counting backend never dereferences the handle.
        unsafe { Handle::from_raw(NonNull::dangling().as_ptr()) }
    }

    #[test]
    fn test_channel_queries_skipped_without_channels() {
        let sf = Dispatcher::new(Counting::default());
        let commands = sf.bind(stream());
        assert_eq!(stored_peaks(&commands, 0).unwrap(), None);
        assert!(measured_peaks(&commands, 0).unwrap().is_empty());
        assert_eq!(sf.backend().calls.get(), 0);
    }

    #[test]
    fn test_channel_queries_run_with_channels() {
        let sf = Dispatcher::new(Counting::default());
        let commands = sf.bind(stream());
        assert_eq!(stored_peaks(&commands, 2).unwrap(), None);
        assert_eq!(measured_peaks(&commands, 2).unwrap(), vec![0.0, 0.0]);
        assert_eq!(sf.backend().calls.get(), 2);
    }

    #[test]
    fn test_describe_loop() {
        let mut info = LoopInfo::default();
        info.num_beats = 8;
        info.time_sig_num = 4;
        info.time_sig_den = 4;
        info.bpm = 120.0;
        let text = describe_loop(&info);
        assert!(text.starts_with("8 beats, 4/4, 120.0 bpm"), "{}", text);
    }

    #[test]
    fn test_join_peaks() {
        assert_eq!(join_peaks(&[0.5, 0.25]), "0.5000, 0.2500");
        assert_eq!(join_peaks(&[]), "");
    }
}
