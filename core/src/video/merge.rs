//! Combine a silent video with its source audio.
//!
//! The merge writes to a temporary file beside the video. Only a successful
//! merge replaces the original; any failure removes the temporary and
//! leaves the silent video untouched.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

use super::encoder::program_name;
use super::process::{drain_stderr, stderr_tail, wait_with_timeout};
use super::VideoError;

/// Temporary output path for merging into `video`; keeps the extension so
/// ffmpeg picks the same container.
pub fn merge_temp_path(video: &Path) -> PathBuf {
    let stem = video.file_stem().unwrap_or_else(|| OsStr::new("video"));
    let mut name = OsString::from(stem);
    name.push(".merging");
    if let Some(ext) = video.extension() {
        name.push(".");
        name.push(ext);
    }
    video.with_file_name(name)
}

/// ffmpeg arguments: copy the video stream, re-encode audio, stop at the
/// shorter input.
pub fn merge_args(video: &Path, audio: &Path, output: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-y", "-nostdin", "-loglevel", "error", "-i"]
        .iter()
        .map(OsString::from)
        .collect();
    args.push(video.as_os_str().to_owned());
    args.push("-i".into());
    args.push(audio.as_os_str().to_owned());
    for arg in ["-map", "0:v:0", "-map", "1:a:0", "-c:v", "copy", "-c:a", "aac", "-shortest"] {
        args.push(arg.into());
    }
    args.push(output.as_os_str().to_owned());
    args
}

/// Merge `audio` into `video` in place using `program`.
pub fn merge_audio<S: AsRef<OsStr>>(
    program: S,
    video: &Path,
    audio: &Path,
    timeout: Duration,
) -> Result<(), VideoError> {
    let temp = merge_temp_path(video);
    let result = run_merge(program.as_ref(), video, audio, &temp, timeout);
    match &result {
        Ok(()) => log::info!("Merged audio into {}", video.display()),
        Err(e) => {
            if temp.exists() {
                if let Err(rm) = fs::remove_file(&temp) {
                    log::warn!("Failed to remove {}: {}", temp.display(), rm);
                }
            }
            log::warn!("Audio merge failed, keeping silent video: {}", e);
        }
    }
    result
}

fn run_merge(
    program: &OsStr,
    video: &Path,
    audio: &Path,
    temp: &Path,
    timeout: Duration,
) -> Result<(), VideoError> {
    let mut child = Command::new(program)
        .args(merge_args(video, audio, temp))
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| VideoError::Spawn { program: program_name(program), source })?;
    let stderr = child.stderr.take().map(|s| drain_stderr(s, "merge"));

    let waited = wait_with_timeout(&mut child, timeout, "audio merge");
    let tail = stderr_tail(stderr);
    let status = waited?;
    if !status.success() {
        return Err(VideoError::MergeFailed { status: status.to_string(), stderr: tail });
    }

    fs::rename(temp, video)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_path_keeps_extension() {
        assert_eq!(merge_temp_path(Path::new("/out/clip.mp4")), PathBuf::from("/out/clip.merging.mp4"));
        assert_eq!(merge_temp_path(Path::new("clip")), PathBuf::from("clip.merging"));
    }

    #[test]
    fn test_merge_args_map_streams() {
        let args = merge_args(Path::new("v.mp4"), Path::new("a.wav"), Path::new("t.mp4"));
        let joined = args.iter().map(|a| a.to_string_lossy()).collect::<Vec<_>>().join(" ");
        assert!(joined.contains("-i v.mp4 -i a.wav -map 0:v:0 -map 1:a:0 -c:v copy -c:a aac -shortest t.mp4"));
    }
}
