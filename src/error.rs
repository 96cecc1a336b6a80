use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("path does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("no .mp4 files found in {}", .0.display())]
    EmptyInput(PathBuf),

    #[error("ffmpeg not found on PATH: {0}")]
    FfmpegMissing(#[from] which::Error),

    #[error("ffmpeg {action} failed ({status}):\n{stderr}")]
    FfmpegFailed {
        action: &'static str,
        status: ExitStatus,
        stderr: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
