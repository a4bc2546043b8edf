//! Integration tests for the sndinfo CLI.

use assert_cmd::Command;
use predicates::prelude::*;
use sndfile_rs::{is_linked, Format, Mode, SoundFile, SoundInfo, Tag};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Get the sndinfo command.
fn sndinfo() -> Command {
    Command::cargo_bin("sndinfo").unwrap()
}

/// Write a one-second mono 16-bit WAV with a title tag.
fn write_wav(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("tone.wav");
    let info = SoundInfo::new(8000, 1, Format::WAV | Format::PCM_16);
    let mut file = SoundFile::open(&path, Mode::Write, Some(info)).unwrap();
    file.set_tag(Tag::Title, "Test tone").unwrap();
    let samples: Vec<f32> = (0..8000)
        .map(|i| 0.5 * (i as f32 * 440.0 * std::f32::consts::TAU / 8000.0).sin())
        .collect();
    file.write(&samples).unwrap();
    file.close().unwrap();
    path
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_help() {
    sndinfo()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Inspect sound files"))
        .stdout(predicate::str::contains("info"))
        .stdout(predicate::str::contains("formats"))
        .stdout(predicate::str::contains("EXAMPLES"));
}

#[test]
fn test_version_flag() {
    sndinfo()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sndinfo"));
}

#[test]
fn test_missing_subcommand() {
    sndinfo().assert().failure().stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_info_help_lists_flags() {
    sndinfo()
        .args(["info", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--calc-max"))
        .stdout(predicate::str::contains("--log"));
}

#[test]
fn test_nonexistent_input() {
    sndinfo()
        .args(["info", "/nonexistent/file.wav"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_quiet_and_verbose_conflict() {
    sndinfo()
        .args(["--quiet", "--verbose", "version"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--quiet and --verbose"));
}

#[test]
fn test_simple_conflicts_with_subtypes() {
    sndinfo()
        .args(["formats", "--simple", "--subtypes"])
        .assert()
        .failure();
}

#[test]
fn test_unreadable_file_reports_cause() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("noise.wav");
    fs::write(&input, "not a sound file").unwrap();

    sndinfo()
        .args(["info"])
        .arg(&input)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to open"))
        .stderr(predicate::str::contains("caused by"));
}

// ============================================================================
// Tests requiring libsndfile
// ============================================================================

#[test]
fn test_version_subcommand() {
    if !is_linked() {
        sndinfo()
            .arg("version")
            .assert()
            .code(1)
            .stderr(predicate::str::contains("built without libsndfile"));
        return;
    }

    sndinfo()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("libsndfile"));
}

#[test]
fn test_formats_lists_wav() {
    if !is_linked() {
        return;
    }

    sndinfo()
        .arg("formats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Major formats"))
        .stdout(predicate::str::contains("wav"));

    sndinfo()
        .args(["formats", "--subtypes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Subtypes"))
        .stdout(predicate::str::contains("16 bit"));
}

#[test]
fn test_info_on_generated_wav() {
    if !is_linked() {
        return;
    }
    let temp = TempDir::new().unwrap();
    let input = write_wav(&temp);

    sndinfo()
        .arg("info")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("8000 Hz"))
        .stdout(predicate::str::contains("8,000"))
        .stdout(predicate::str::contains("Test tone"))
        .stdout(predicate::str::contains("Cue points"));
}

#[test]
fn test_info_calc_max_and_log() {
    if !is_linked() {
        return;
    }
    let temp = TempDir::new().unwrap();
    let input = write_wav(&temp);

    sndinfo()
        .args(["info", "--calc-max", "--log"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Measured peaks"))
        .stdout(predicate::str::contains("Channel 1"))
        .stdout(predicate::str::contains("dBFS"))
        .stdout(predicate::str::contains("Log"));
}
