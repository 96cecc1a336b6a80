//! Boundary around the external ffmpeg binary: resolve it on PATH, run it,
//! capture its diagnostics.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use crate::error::{Error, Result};

/// Resolve the ffmpeg executable on PATH. Callers validate their arguments
/// first, so bad flags are reported even on machines without ffmpeg.
pub fn locate() -> Result<PathBuf> {
    Ok(which::which("ffmpeg")?)
}

/// Run ffmpeg with the given arguments and block until it exits.
///
/// `action` names the operation for diagnostics. ffmpeg reports on stderr;
/// on success it is logged at debug, on a nonzero exit it is attached to
/// the returned error verbatim.
pub fn run<I, S>(ffmpeg: &Path, action: &'static str, args: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = Command::new(ffmpeg);
    command.args(args);

    let command_str = format!(
        "{:?} {}",
        command.get_program(),
        command
            .get_args()
            .map(|arg| arg.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    );
    info!("executing: {}", command_str);

    let output = command.output()?;
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
        return Err(Error::FfmpegFailed {
            action,
            status: output.status,
            stderr,
        });
    }

    debug!("ffmpeg reported:\n{}", stderr);
    Ok(())
}
