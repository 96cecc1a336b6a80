//! Merge every .mp4 in a folder into one file via ffmpeg's concat demuxer.
//!
//! The inputs are stream-copied (`-c copy`), so codecs, resolution and frame
//! rate must already match across the folder.

use std::ffi::OsStr;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tempfile::NamedTempFile;
use tracing::info;

use crate::error::{Error, Result};
use crate::ffmpeg;
use crate::options::ConcatArgs;

/// Order in which discovered files are concatenated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
#[clap(rename_all = "snake_case")]
pub enum SortMethod {
    /// Lexicographic by filename, case-insensitive
    Alphabetical,
    /// Oldest creation time first
    DateCreated,
    /// Oldest modification time first
    DateModified,
}

pub fn concatenate(args: &ConcatArgs) -> Result<PathBuf> {
    let files = find_mp4_files(&args.folder, args.sort)?;

    info!("found {} mp4 files in {}", files.len(), args.folder.display());
    for (i, file) in files.iter().enumerate() {
        info!("  {}. {}", i + 1, file.display());
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(&args.folder));
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let ffmpeg = ffmpeg::locate()?;

    // The manifest is a NamedTempFile, so it is removed when this function
    // returns, on the error paths included.
    let manifest = write_manifest(&files)?;
    ffmpeg::run(
        &ffmpeg,
        "concatenation",
        [
            OsStr::new("-f"),
            OsStr::new("concat"),
            OsStr::new("-safe"),
            OsStr::new("0"),
            OsStr::new("-i"),
            manifest.path().as_os_str(),
            OsStr::new("-c"),
            OsStr::new("copy"),
            OsStr::new("-y"),
            output.as_os_str(),
        ],
    )?;

    Ok(output)
}

/// Find all .mp4 files (case-insensitive) directly inside `folder`, sorted
/// by the chosen method.
pub fn find_mp4_files(folder: &Path, sort: SortMethod) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(Error::NotFound(folder.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(folder)? {
        let path = entry?.path();
        let is_mp4 = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("mp4"));
        if path.is_file() && is_mp4 {
            files.push(path);
        }
    }

    if files.is_empty() {
        return Err(Error::EmptyInput(folder.to_path_buf()));
    }

    sorted(files, sort)
}

fn sorted(mut files: Vec<PathBuf>, sort: SortMethod) -> Result<Vec<PathBuf>> {
    match sort {
        SortMethod::Alphabetical => {
            files.sort_by_key(|path| file_name_key(path));
            Ok(files)
        }
        SortMethod::DateCreated | SortMethod::DateModified => {
            let mut keyed: Vec<(SystemTime, PathBuf)> = Vec::with_capacity(files.len());
            for path in files {
                let meta = fs::metadata(&path)?;
                let time = match sort {
                    // Creation time is not available on every filesystem
                    SortMethod::DateCreated => meta.created().or_else(|_| meta.modified())?,
                    _ => meta.modified()?,
                };
                keyed.push((time, path));
            }
            keyed.sort_by(|a, b| {
                a.0.cmp(&b.0)
                    .then_with(|| file_name_key(&a.1).cmp(&file_name_key(&b.1)))
            });
            Ok(keyed.into_iter().map(|(_, path)| path).collect())
        }
    }
}

/// Lowercased filename: the alphabetical sort key and the tie-breaker for
/// the timestamp sorts.
fn file_name_key(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// `output/<folder-name>.mp4`, named after the folder being merged.
pub fn default_output(folder: &Path) -> PathBuf {
    let name = folder
        .canonicalize()
        .ok()
        .and_then(|path| path.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "merged".into());
    Path::new("output").join(format!("{name}.mp4"))
}

/// Write the concat-demuxer manifest: one `file '<path>'` line per input,
/// in concatenation order.
fn write_manifest(files: &[PathBuf]) -> Result<NamedTempFile> {
    let mut manifest = NamedTempFile::new()?;
    for path in files {
        let absolute = path.canonicalize()?;
        writeln!(manifest, "{}", manifest_line(&absolute))?;
    }
    manifest.flush()?;
    Ok(manifest)
}

/// Paths use forward slashes and escaped single quotes so ffmpeg reads them
/// back intact.
fn manifest_line(path: &Path) -> String {
    let escaped = path
        .to_string_lossy()
        .replace('\\', "/")
        .replace('\'', "\\'");
    format!("file '{escaped}'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::time::Duration;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        File::create(&path).unwrap();
        path
    }

    fn set_mtime(path: &Path, time: SystemTime) {
        let file = File::options().write(true).open(path).unwrap();
        file.set_modified(time).unwrap();
    }

    fn names(files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn alphabetical_sort_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "B.mp4");
        touch(dir.path(), "c.MP4");
        touch(dir.path(), "a.mp4");

        let files = find_mp4_files(dir.path(), SortMethod::Alphabetical).unwrap();
        assert_eq!(names(&files), ["a.mp4", "B.mp4", "c.MP4"]);
    }

    #[test]
    fn non_mp4_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "clip.mp4");
        touch(dir.path(), "notes.txt");
        touch(dir.path(), "cover.png");

        let files = find_mp4_files(dir.path(), SortMethod::Alphabetical).unwrap();
        assert_eq!(names(&files), ["clip.mp4"]);
    }

    #[test]
    fn missing_folder_is_not_found() {
        let err = find_mp4_files(Path::new("does/not/exist"), SortMethod::Alphabetical)
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn folder_without_videos_is_empty_input() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "readme.txt");

        let err = find_mp4_files(dir.path(), SortMethod::Alphabetical).unwrap_err();
        assert!(matches!(err, Error::EmptyInput(_)));
    }

    #[test]
    fn date_modified_sort_orders_oldest_first() {
        let dir = tempfile::tempdir().unwrap();
        let older = touch(dir.path(), "z_recorded_first.mp4");
        let newer = touch(dir.path(), "a_recorded_second.mp4");

        let base = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        set_mtime(&older, base);
        set_mtime(&newer, base + Duration::from_secs(60));

        let files = find_mp4_files(dir.path(), SortMethod::DateModified).unwrap();
        assert_eq!(names(&files), ["z_recorded_first.mp4", "a_recorded_second.mp4"]);
    }

    #[test]
    fn date_modified_ties_break_by_filename() {
        let dir = tempfile::tempdir().unwrap();
        let b = touch(dir.path(), "b.mp4");
        let a = touch(dir.path(), "a.mp4");

        let base = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        set_mtime(&b, base);
        set_mtime(&a, base);

        let files = find_mp4_files(dir.path(), SortMethod::DateModified).unwrap();
        assert_eq!(names(&files), ["a.mp4", "b.mp4"]);
    }

    #[test]
    fn manifest_line_escapes_single_quotes() {
        let line = manifest_line(Path::new("/videos/it's here.mp4"));
        assert_eq!(line, r"file '/videos/it\'s here.mp4'");
    }

    #[test]
    fn manifest_line_uses_forward_slashes() {
        let line = manifest_line(Path::new(r"C:\videos\a.mp4"));
        assert_eq!(line, "file 'C:/videos/a.mp4'");
    }

    #[test]
    fn write_manifest_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = touch(dir.path(), "a.mp4");
        let b = touch(dir.path(), "b.mp4");

        let manifest = write_manifest(&[a, b]).unwrap();
        let contents = fs::read_to_string(manifest.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("a.mp4"));
        assert!(lines[1].contains("b.mp4"));
    }

    #[test]
    fn default_output_mirrors_folder_name() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("ToMerge");
        fs::create_dir(&folder).unwrap();

        assert_eq!(default_output(&folder), Path::new("output/ToMerge.mp4"));
    }
}
