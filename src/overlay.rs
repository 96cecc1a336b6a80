//! Composite a still image onto a video via an ffmpeg filter graph.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Error, Result};
use crate::ffmpeg;
use crate::options::OverlayArgs;

/// Margin from the frame edge when no offsets are given.
const DEFAULT_MARGIN: i64 = 10;

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "mkv", "webm", "flv", "wmv", "m4v"];
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "tiff", "webp"];

/// Where the image lands on the frame. Everything but `Custom` is an offset
/// formula relative to the video and image dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Position {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Center,
    /// Absolute pixel placement; requires --offset-x and --offset-y
    Custom,
}

impl Position {
    /// The overlay `x:y` expression. For the edge presets the offsets are
    /// margins from that edge; for `Custom` they are absolute coordinates.
    fn expr(self, x: i64, y: i64) -> String {
        match self {
            Position::TopLeft | Position::Custom => format!("{x}:{y}"),
            Position::TopRight => format!("main_w-overlay_w-{x}:{y}"),
            Position::BottomLeft => format!("{x}:main_h-overlay_h-{y}"),
            Position::BottomRight => {
                format!("main_w-overlay_w-{x}:main_h-overlay_h-{y}")
            }
            Position::Center => "(main_w-overlay_w)/2:(main_h-overlay_h)/2".to_string(),
        }
    }
}

pub fn overlay(args: &OverlayArgs) -> Result<PathBuf> {
    // All argument validation happens up front, before the input files are
    // touched and before ffmpeg is resolved.
    if !(0.0..=1.0).contains(&args.opacity) {
        return Err(Error::InvalidArgument(format!(
            "opacity must be between 0.0 and 1.0, got {}",
            args.opacity
        )));
    }

    let (offset_x, offset_y) = match args.position {
        Position::Custom => match (args.offset_x, args.offset_y) {
            (Some(x), Some(y)) => (x, y),
            _ => {
                return Err(Error::InvalidArgument(
                    "--position custom requires --offset-x and --offset-y".into(),
                ))
            }
        },
        _ => (
            args.offset_x.unwrap_or(DEFAULT_MARGIN),
            args.offset_y.unwrap_or(DEFAULT_MARGIN),
        ),
    };

    let scale = args.scale.as_deref().map(scale_filter).transpose()?;
    let start = args.start_time.as_deref().map(parse_seconds).transpose()?;
    let duration = args.duration.as_deref().map(parse_seconds).transpose()?;

    check_input(&args.video, "video", VIDEO_EXTENSIONS)?;
    check_input(&args.image, "image", IMAGE_EXTENSIONS)?;

    let position = args.position.expr(offset_x, offset_y);
    let enable = enable_window(start, duration);
    let filter = filter_expression(
        scale.as_deref(),
        args.opacity,
        &position,
        enable.as_deref(),
    );

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(&args.video));
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    info!(
        "overlaying {} onto {}",
        args.image.display(),
        args.video.display()
    );

    let ffmpeg = ffmpeg::locate()?;
    ffmpeg::run(
        &ffmpeg,
        "overlay",
        [
            OsStr::new("-i"),
            args.video.as_os_str(),
            OsStr::new("-i"),
            args.image.as_os_str(),
            OsStr::new("-filter_complex"),
            OsStr::new(&filter),
            OsStr::new("-c:a"),
            OsStr::new("copy"),
            OsStr::new("-y"),
            output.as_os_str(),
        ],
    )?;

    Ok(output)
}

fn check_input(path: &Path, kind: &str, allowed: &[&str]) -> Result<()> {
    if !path.is_file() {
        return Err(Error::NotFound(path.to_path_buf()));
    }
    let supported = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| allowed.iter().any(|ok| ext.eq_ignore_ascii_case(ok)));
    if !supported {
        return Err(Error::InvalidArgument(format!(
            "unsupported {kind} format: {}",
            path.display()
        )));
    }
    Ok(())
}

/// Turn a scale spec into an ffmpeg scale filter. Accepts `W:H` (pixels or
/// iw/ih expressions) and `N%` for uniform scaling.
fn scale_filter(spec: &str) -> Result<String> {
    if let Some(percent) = spec.strip_suffix('%') {
        let factor = percent
            .parse::<f64>()
            .map_err(|_| Error::InvalidArgument(format!("bad scale percentage: {spec}")))?
            / 100.0;
        return Ok(format!("scale=iw*{factor}:ih*{factor}"));
    }
    match spec.split_once(':') {
        Some((w, h)) if !w.is_empty() && !h.is_empty() => Ok(format!("scale={spec}")),
        _ => Err(Error::InvalidArgument(format!(
            "bad scale spec (expected W:H or N%): {spec}"
        ))),
    }
}

/// `HH:MM:SS`, `MM:SS` or bare seconds, to fractional seconds.
fn parse_seconds(time: &str) -> Result<f64> {
    let bad = || Error::InvalidArgument(format!("bad timestamp (expected HH:MM:SS): {time}"));

    let parts: Vec<&str> = time.split(':').collect();
    if parts.len() > 3 || parts.iter().any(|part| part.is_empty()) {
        return Err(bad());
    }

    let mut seconds = 0.0;
    for part in parts {
        let value: f64 = part.parse().map_err(|_| bad())?;
        if value < 0.0 {
            return Err(bad());
        }
        seconds = seconds * 60.0 + value;
    }
    Ok(seconds)
}

/// The overlay `enable` expression for the requested time window, or `None`
/// when the image spans the whole video.
fn enable_window(start: Option<f64>, duration: Option<f64>) -> Option<String> {
    match (start, duration) {
        (Some(start), Some(duration)) => {
            Some(format!("between(t,{start},{})", start + duration))
        }
        (Some(start), None) => Some(format!("gte(t,{start})")),
        (None, Some(duration)) => Some(format!("between(t,0,{duration})")),
        (None, None) => None,
    }
}

/// Assemble the filter_complex: optional scale stage, optional alpha stage,
/// then the overlay itself.
fn filter_expression(
    scale: Option<&str>,
    opacity: f64,
    position: &str,
    enable: Option<&str>,
) -> String {
    let mut stages = Vec::new();
    let mut overlay_input = "[1:v]";

    if let Some(scale) = scale {
        stages.push(format!("[1:v]{scale}[scaled]"));
        overlay_input = "[scaled]";
    }
    if opacity < 1.0 {
        stages.push(format!(
            "{overlay_input}format=rgba,colorchannelmixer=aa={opacity}[faded]"
        ));
        overlay_input = "[faded]";
    }

    let mut compose = format!("[0:v]{overlay_input}overlay={position}");
    if let Some(window) = enable {
        compose.push_str(&format!(":enable='{window}'"));
    }
    stages.push(compose);

    stages.join(";")
}

/// `output/<video-stem>_overlay<video-ext>`.
pub fn default_output(video: &Path) -> PathBuf {
    let stem = video
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = video
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    Path::new("output").join(format!("{stem}_overlay{ext}"))
}
