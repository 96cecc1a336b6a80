//! CLI-level checks: every validation failure must be reported, with a
//! nonzero exit, before ffmpeg is ever involved. None of these tests
//! require ffmpeg to be installed.

use assert_cmd::Command;
use predicates::prelude::*;

fn vidkit() -> Command {
    Command::cargo_bin("vidkit").unwrap()
}

#[test]
fn help_lists_the_subcommands() {
    vidkit()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("concatenate"))
        .stdout(predicate::str::contains("overlay"));
}

#[test]
fn concatenate_rejects_a_missing_folder() {
    vidkit()
        .args(["concatenate", "no/such/folder"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn concatenate_rejects_a_folder_without_videos() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("notes.txt"), "not a video").unwrap();

    vidkit()
        .arg("concatenate")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no .mp4 files"));
}

#[test]
fn concatenate_rejects_an_unknown_sort_method() {
    vidkit()
        .args(["concatenate", ".", "--sort", "shuffled"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn overlay_rejects_out_of_range_opacity() {
    vidkit()
        .args(["overlay", "clip.mp4", "logo.png", "--opacity", "1.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("opacity"));
}

#[test]
fn overlay_requires_offsets_for_a_custom_position() {
    vidkit()
        .args(["overlay", "clip.mp4", "logo.png", "--position", "custom"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--offset-x"));
}

#[test]
fn overlay_rejects_a_malformed_scale() {
    vidkit()
        .args(["overlay", "clip.mp4", "logo.png", "--scale", "bogus"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("bad scale"));
}

#[test]
fn overlay_rejects_a_malformed_start_time() {
    vidkit()
        .args(["overlay", "clip.mp4", "logo.png", "--start-time", "soon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("bad timestamp"));
}

#[test]
fn overlay_reports_a_missing_video() {
    let dir = tempfile::tempdir().unwrap();
    vidkit()
        .current_dir(dir.path())
        .args(["overlay", "clip.mp4", "logo.png"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}
