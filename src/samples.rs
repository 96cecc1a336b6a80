//! Generate small fixture files with ffmpeg's lavfi source, for trying out
//! the concatenate and overlay commands on something disposable.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;
use crate::ffmpeg;

/// Which fixture set to generate.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SampleKind {
    /// Three short solid-color clips, matched for concatenation
    Videos,
    /// Logo and watermark images for overlaying
    Images,
}

pub fn generate(kind: SampleKind, dir: Option<PathBuf>) -> Result<PathBuf> {
    let ffmpeg = ffmpeg::locate()?;
    match kind {
        SampleKind::Videos => {
            let dir = dir.unwrap_or_else(|| PathBuf::from("test_videos"));
            fs::create_dir_all(&dir)?;
            for (name, color, label) in [
                ("video1_intro.mp4", "red", "Video 1 - Intro"),
                ("video2_middle.mp4", "green", "Video 2 - Middle"),
                ("video3_outro.mp4", "blue", "Video 3 - Outro"),
            ] {
                sample_video(&ffmpeg, &dir.join(name), 3, color, label)?;
            }
            Ok(dir)
        }
        SampleKind::Images => {
            let dir = dir.unwrap_or_else(|| PathBuf::from("test_images"));
            fs::create_dir_all(&dir)?;
            sample_logo(&ffmpeg, &dir.join("logo.png"), "MY LOGO", 150, 80, "blue")?;
            sample_watermark(&ffmpeg, &dir.join("watermark.png"), "WATERMARK", 200)?;
            sample_logo(&ffmpeg, &dir.join("small_logo.png"), "©", 50, 50, "gray")?;
            Ok(dir)
        }
    }
}

fn sample_video(
    ffmpeg: &Path,
    output: &Path,
    duration: u32,
    color: &str,
    label: &str,
) -> Result<()> {
    info!("creating {}", output.display());
    let args: Vec<OsString> = vec![
        "-f".into(),
        "lavfi".into(),
        "-i".into(),
        format!("color={color}:size=640x480:duration={duration}").into(),
        "-vf".into(),
        centered_text(30, "white", label).into(),
        "-y".into(),
        output.into(),
    ];
    ffmpeg::run(ffmpeg, "sample generation", args)
}

fn sample_logo(
    ffmpeg: &Path,
    output: &Path,
    label: &str,
    width: u32,
    height: u32,
    color: &str,
) -> Result<()> {
    info!("creating {}", output.display());
    let args: Vec<OsString> = vec![
        "-f".into(),
        "lavfi".into(),
        "-i".into(),
        format!("color={color}:size={width}x{height}:duration=1").into(),
        "-vf".into(),
        centered_text(24, "white", label).into(),
        "-frames:v".into(),
        "1".into(),
        "-y".into(),
        output.into(),
    ];
    ffmpeg::run(ffmpeg, "sample generation", args)
}

fn sample_watermark(ffmpeg: &Path, output: &Path, label: &str, size: u32) -> Result<()> {
    info!("creating {}", output.display());
    let args: Vec<OsString> = vec![
        "-f".into(),
        "lavfi".into(),
        // Fully transparent canvas; only the text is visible
        "-i".into(),
        format!("color=c=black@0.0:s={size}x{size}:d=1").into(),
        "-vf".into(),
        centered_text(36, "white@0.8", label).into(),
        "-frames:v".into(),
        "1".into(),
        "-y".into(),
        output.into(),
    ];
    ffmpeg::run(ffmpeg, "sample generation", args)
}

fn centered_text(fontsize: u32, fontcolor: &str, text: &str) -> String {
    format!(
        "drawtext=fontsize={fontsize}:fontcolor={fontcolor}:\
         x=(w-text_w)/2:y=(h-text_h)/2:text={text}"
    )
}
