//! Raw-frame encoder that streams RGB24 frames to an external ffmpeg.
//!
//! Frames travel from the render thread to a single writer thread over a
//! bounded channel; the writer alone owns the encoder's stdin. If the
//! encoder closes its input early, later frames are counted and dropped.

use std::ffi::{OsStr, OsString};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, Sender};
use serde::{Deserialize, Serialize};

use super::process::{drain_stderr, stderr_tail, wait_with_timeout};

/// Video codec options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VideoCodec {
    /// H.264 for YouTube/TikTok/Instagram.
    #[default]
    H264,
    /// ProRes 4444 for professional workflows.
    ProRes,
    /// VP9 WebM for web use.
    Vp9,
}

impl VideoCodec {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "h264" | "x264" | "avc" | "mp4" => Some(Self::H264),
            "prores" | "prores4444" | "mov" => Some(Self::ProRes),
            "vp9" | "webm" => Some(Self::Vp9),
            _ => None,
        }
    }

    pub fn codec_name(&self) -> &'static str {
        match self {
            VideoCodec::H264 => "libx264",
            VideoCodec::ProRes => "prores_ks",
            VideoCodec::Vp9 => "libvpx-vp9",
        }
    }

    pub fn pixel_format(&self) -> &'static str {
        match self {
            VideoCodec::H264 => "yuv420p",
            VideoCodec::ProRes => "yuv444p10le",
            VideoCodec::Vp9 => "yuv420p",
        }
    }

    /// Conventional container extension.
    pub fn extension(&self) -> &'static str {
        match self {
            VideoCodec::H264 => "mp4",
            VideoCodec::ProRes => "mov",
            VideoCodec::Vp9 => "webm",
        }
    }

    fn quality_args(&self, crf: Option<u32>) -> Vec<String> {
        match (self, crf) {
            (VideoCodec::H264, Some(crf)) => {
                vec!["-crf".into(), crf.to_string(), "-preset".into(), "medium".into()]
            }
            (VideoCodec::Vp9, Some(crf)) => {
                vec!["-crf".into(), crf.to_string(), "-b:v".into(), "0".into()]
            }
            (VideoCodec::ProRes, _) => vec!["-profile:v".into(), "4".into()],
            (_, None) => vec!["-b:v".into(), "8M".into()],
        }
    }
}

/// Video encoding configuration.
#[derive(Debug, Clone)]
pub struct VideoConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Frame rate (frames per second).
    pub fps: u32,
    /// Video codec to use.
    pub codec: VideoCodec,
    /// CRF quality (lower is better). None uses a fixed bitrate.
    pub crf: Option<u32>,
    /// Encoder executable.
    pub program: PathBuf,
    /// Frames buffered between the render and writer threads.
    pub channel_capacity: usize,
    /// How long to wait for the encoder to exit after its input closes.
    pub wait_timeout: Duration,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fps: 30,
            codec: VideoCodec::H264,
            crf: Some(18),
            program: PathBuf::from("ffmpeg"),
            channel_capacity: 3,
            wait_timeout: Duration::from_secs(60),
        }
    }
}

impl VideoConfig {
    /// Bytes in one RGB24 frame.
    pub fn frame_size(&self) -> usize {
        self.width as usize * self.height as usize * 3
    }

    pub fn validate(&self) -> Result<(), VideoError> {
        if self.width == 0 || self.height == 0 {
            return Err(VideoError::InvalidConfig(format!(
                "frame size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.fps == 0 {
            return Err(VideoError::InvalidConfig("fps must be non-zero".into()));
        }
        Ok(())
    }

    /// Arguments for an ffmpeg that reads raw RGB24 frames from stdin.
    pub fn encoder_args(&self, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = [
            "-y",
            "-nostdin",
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pixel_format",
            "rgb24",
            "-video_size",
        ]
        .iter()
        .map(OsString::from)
        .collect();
        args.push(format!("{}x{}", self.width, self.height).into());
        args.push("-framerate".into());
        args.push(self.fps.to_string().into());
        for arg in ["-i", "pipe:0", "-c:v", self.codec.codec_name(), "-pix_fmt", self.codec.pixel_format()] {
            args.push(arg.into());
        }
        args.extend(self.codec.quality_args(self.crf).into_iter().map(OsString::from));
        args.push(output.as_os_str().to_owned());
        args
    }
}

/// Errors that can occur during video encoding.
#[derive(Debug, thiserror::Error)]
pub enum VideoError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("Encoder stdin not available")]
    NoStdin,
    #[error("Frame is {actual} bytes, expected {expected}")]
    FrameSize { expected: usize, actual: usize },
    #[error("Encoder exited with {status}: {stderr}")]
    EncoderFailed { status: String, stderr: String },
    #[error("Audio merge exited with {status}: {stderr}")]
    MergeFailed { status: String, stderr: String },
    #[error("{what} did not exit within {seconds}s")]
    Timeout { what: &'static str, seconds: u64 },
    #[error("Failed to wait for process: {0}")]
    Wait(#[source] io::Error),
    #[error("Encoder writer thread panicked")]
    WriterPanicked,
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Summary of a finished encode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderReport {
    /// Frames fully written to the encoder.
    pub frames_written: u64,
    /// Frames discarded because the encoder had closed its input.
    pub frames_dropped: u64,
    /// Exit code, if the process exited normally.
    pub exit_code: Option<i32>,
}

#[derive(Debug, Default)]
struct WriterStats {
    written: u64,
    dropped: u64,
}

/// Streams frames to an encoder process.
pub struct VideoEncoder {
    child: Option<Child>,
    sender: Option<Sender<Vec<u8>>>,
    writer: Option<JoinHandle<WriterStats>>,
    stderr: Option<JoinHandle<Vec<String>>>,
    config: VideoConfig,
    undelivered: u64,
}

impl VideoEncoder {
    /// Spawn `config.program` writing to `output`.
    pub fn new<P: AsRef<Path>>(output: P, config: VideoConfig) -> Result<Self, VideoError> {
        config.validate()?;
        let mut command = Command::new(&config.program);
        command.args(config.encoder_args(output.as_ref()));
        Self::with_command(command, config)
    }

    /// Spawn a caller-built command as the encoder. Its stdin receives the
    /// raw frames; stdout is discarded and stderr is drained into the log.
    pub fn with_command(mut command: Command, config: VideoConfig) -> Result<Self, VideoError> {
        config.validate()?;
        let program = program_name(command.get_program());
        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| VideoError::Spawn { program: program.clone(), source })?;

        let Some(stdin) = child.stdin.take() else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(VideoError::NoStdin);
        };
        let stderr = child.stderr.take().map(|s| drain_stderr(s, "encoder"));

        let (sender, receiver) = bounded(config.channel_capacity.max(1));
        let writer = thread::Builder::new()
            .name("frame-writer".into())
            .spawn(move || write_frames(stdin, receiver))?;

        log::info!(
            "Encoder started: {} {}x{} @ {}fps, codec={}",
            program,
            config.width,
            config.height,
            config.fps,
            config.codec.codec_name()
        );

        Ok(Self {
            child: Some(child),
            sender: Some(sender),
            writer: Some(writer),
            stderr,
            config,
            undelivered: 0,
        })
    }

    pub fn config(&self) -> &VideoConfig {
        &self.config
    }

    /// Queue one frame, blocking while the channel is full.
    pub fn send_frame(&mut self, frame: Vec<u8>) -> Result<(), VideoError> {
        let expected = self.config.frame_size();
        if frame.len() != expected {
            return Err(VideoError::FrameSize { expected, actual: frame.len() });
        }
        let delivered = match &self.sender {
            Some(sender) => sender.send(frame).is_ok(),
            None => false,
        };
        if !delivered {
            self.undelivered += 1;
        }
        Ok(())
    }

    /// Copy and queue one frame.
    pub fn write_frame(&mut self, frame: &[u8]) -> Result<(), VideoError> {
        self.send_frame(frame.to_vec())
    }

    /// Close the stream and wait for the encoder to exit.
    ///
    /// The wait is bounded by `wait_timeout` and covers draining the queued
    /// frames; a hung encoder is killed, which unblocks the writer.
    pub fn finish(mut self) -> Result<EncoderReport, VideoError> {
        drop(self.sender.take());
        let Some(mut child) = self.child.take() else {
            return Err(VideoError::NoStdin);
        };

        let waited = wait_with_timeout(&mut child, self.config.wait_timeout, "encoder");
        let joined = self.join_writer();
        let tail = stderr_tail(self.stderr.take());
        let status = waited?;
        let stats = joined?;

        if !status.success() {
            return Err(VideoError::EncoderFailed { status: status.to_string(), stderr: tail });
        }

        let report = EncoderReport {
            frames_written: stats.written,
            frames_dropped: stats.dropped + self.undelivered,
            exit_code: status.code(),
        };
        log::info!(
            "Encoder finished: {} frames written, {} dropped",
            report.frames_written,
            report.frames_dropped
        );
        Ok(report)
    }

    /// Stop the encoder without waiting for it to finish the file.
    pub fn abort(mut self) {
        self.kill();
    }

    /// Join the writer; only call once the sender is gone and the child has
    /// exited, or it may block on a full pipe.
    fn join_writer(&mut self) -> Result<WriterStats, VideoError> {
        match self.writer.take() {
            Some(handle) => handle.join().map_err(|_| VideoError::WriterPanicked),
            None => Ok(WriterStats::default()),
        }
    }

    fn kill(&mut self) {
        drop(self.sender.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
            log::debug!("Encoder killed");
        }
        if let Some(handle) = self.writer.take() {
            let _ = handle.join();
        }
        let _ = stderr_tail(self.stderr.take());
    }
}

impl Drop for VideoEncoder {
    fn drop(&mut self) {
        if self.child.is_some() {
            self.kill();
        }
    }
}

/// Writer thread body: write and flush each frame in order. After the first
/// failed write every remaining frame is dropped without retrying.
fn write_frames(mut stdin: ChildStdin, frames: Receiver<Vec<u8>>) -> WriterStats {
    let mut stats = WriterStats::default();
    let mut closed = false;
    for frame in frames {
        if closed {
            stats.dropped += 1;
            continue;
        }
        match stdin.write_all(&frame).and_then(|_| stdin.flush()) {
            Ok(()) => stats.written += 1,
            Err(e) => {
                log::warn!("Encoder input closed after {} frames: {}", stats.written, e);
                stats.dropped += 1;
                closed = true;
            }
        }
    }
    if stats.dropped > 0 {
        log::warn!("Dropped {} frames after the encoder closed its input", stats.dropped);
    }
    stats
}

/// Program name for log and error messages.
pub(crate) fn program_name(program: &OsStr) -> String {
    Path::new(program)
        .file_name()
        .unwrap_or(program)
        .to_string_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> VideoConfig {
        VideoConfig { width: 4, height: 2, fps: 10, ..Default::default() }
    }

    #[test]
    fn test_codec_names() {
        assert_eq!(VideoCodec::from_str("webm"), Some(VideoCodec::Vp9));
        assert_eq!(VideoCodec::from_str("PRORES"), Some(VideoCodec::ProRes));
        assert_eq!(VideoCodec::H264.codec_name(), "libx264");
        assert_eq!(VideoCodec::from_str("gif"), None);
    }

    #[test]
    fn test_encoder_args_describe_raw_input() {
        let args = small_config().encoder_args(Path::new("/tmp/out.mp4"));
        let args: Vec<String> = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();
        let joined = args.join(" ");
        assert!(joined.contains("-f rawvideo -pixel_format rgb24 -video_size 4x2 -framerate 10 -i pipe:0"));
        assert!(joined.contains("-c:v libx264"));
        assert!(joined.contains("-crf 18"));
        assert_eq!(args.last().map(String::as_str), Some("/tmp/out.mp4"));
    }

    #[test]
    fn test_zero_size_rejected_before_spawn() {
        let config = VideoConfig { width: 0, ..small_config() };
        let err = VideoEncoder::new("/tmp/never.mp4", config).err();
        assert!(matches!(err, Some(VideoError::InvalidConfig(_))));
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let config = VideoConfig { program: "/no/such/encoder".into(), ..small_config() };
        let err = VideoEncoder::new("/tmp/never.mp4", config).err();
        assert!(matches!(err, Some(VideoError::Spawn { .. })));
    }

    #[test]
    fn test_program_name() {
        assert_eq!(program_name(OsStr::new("/usr/bin/ffmpeg")), "ffmpeg");
    }

    #[cfg(unix)]
    #[test]
    fn test_wrong_frame_size_rejected() {
        let mut command = Command::new("sh");
        command.args(["-c", "cat > /dev/null"]);
        let mut encoder = VideoEncoder::with_command(command, small_config()).unwrap();
        let err = encoder.write_frame(&[0u8; 5]).unwrap_err();
        assert!(matches!(err, VideoError::FrameSize { expected: 24, actual: 5 }));
        let report = encoder.finish().unwrap();
        assert_eq!(report.frames_written, 0);
    }
}
