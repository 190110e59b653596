//! Full render pipeline: audio analysis, design rendering and encoding.
//!
//! Frames are generated strictly in order on the calling thread and handed
//! to the encoder's writer thread through a bounded channel. After the
//! encoder exits, the source audio is merged in; a failed merge leaves the
//! silent video in place.

mod frames;

pub use frames::{analyze_bands, BandSnapshot, FrameGenerator, FramePlan};

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use image::Rgb;

use crate::audio::{AudioClip, AudioError};
use crate::color::ColorMode;
use crate::designs::DesignParams;
use crate::video::{merge_audio, VideoCodec, VideoConfig, VideoEncoder, VideoError};

/// Pipeline configuration for rendering audio visualizations to video.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub codec: VideoCodec,
    /// CRF quality; `None` falls back to a fixed bitrate.
    pub crf: Option<u32>,
    pub design: DesignParams,
    pub color_mode: ColorMode,
    pub background: Rgb<u8>,
    /// Seed for every random choice a design makes.
    pub seed: u64,
    /// Frames in flight between rendering and the encoder.
    pub channel_capacity: usize,
    pub encoder_timeout: Duration,
    pub merge_timeout: Duration,
    /// Merge the source audio into the finished video.
    pub merge_audio: bool,
    /// ffmpeg executable used for encoding and merging.
    pub ffmpeg: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fps: 30,
            codec: VideoCodec::H264,
            crf: Some(18),
            design: DesignParams::default(),
            color_mode: ColorMode::default(),
            background: Rgb([0, 0, 0]),
            seed: 0x5eed,
            channel_capacity: 3,
            encoder_timeout: Duration::from_secs(60),
            merge_timeout: Duration::from_secs(120),
            merge_audio: true,
            ffmpeg: PathBuf::from("ffmpeg"),
        }
    }
}

impl PipelineConfig {
    pub fn to_video_config(&self) -> VideoConfig {
        VideoConfig {
            width: self.width,
            height: self.height,
            fps: self.fps,
            codec: self.codec,
            crf: self.crf,
            program: self.ffmpeg.clone(),
            channel_capacity: self.channel_capacity,
            wait_timeout: self.encoder_timeout,
        }
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.width == 0 || self.height == 0 {
            return Err(PipelineError::InvalidConfig(format!(
                "frame size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.fps == 0 {
            return Err(PipelineError::InvalidConfig("fps must be non-zero".into()));
        }
        Ok(())
    }
}

/// Errors that can occur during pipeline execution.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),
    #[error("Video error: {0}")]
    Video(#[from] VideoError),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Input audio not found: {}", .0.display())]
    MissingInput(PathBuf),
    #[error("Output directory does not exist: {}", .0.display())]
    MissingDirectory(PathBuf),
    #[error("Render cancelled at frame {0}")]
    Cancelled(usize),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Cooperative cancellation flag, checked between frames.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Result of a finished render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutcome {
    /// The finished video file.
    pub path: PathBuf,
    pub frames_rendered: u64,
    pub frames_written: u64,
    /// Frames discarded because the encoder closed its input early.
    pub frames_dropped: u64,
    /// False when there was nothing to merge or the merge failed.
    pub audio_merged: bool,
}

type ProgressFn = Box<dyn Fn(f32) + Send>;
type EncoderCommandFn = Box<dyn Fn(&Path, &VideoConfig) -> Command + Send>;

/// One configured render run.
pub struct Pipeline {
    config: PipelineConfig,
    progress: Option<ProgressFn>,
    cancel: CancelToken,
    encoder_command: Option<EncoderCommandFn>,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            progress: None,
            cancel: CancelToken::new(),
            encoder_command: None,
        }
    }

    /// Called after every frame with the completed fraction in `(0, 1]`.
    pub fn with_progress(mut self, progress: impl Fn(f32) + Send + 'static) -> Self {
        self.progress = Some(Box::new(progress));
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Build the encoder process from this closure instead of `ffmpeg`.
    /// It receives the output path and the video configuration.
    pub fn with_encoder_command(
        mut self,
        build: impl Fn(&Path, &VideoConfig) -> Command + Send + 'static,
    ) -> Self {
        self.encoder_command = Some(Box::new(build));
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Render `clip` to `output`, then merge `audio` into it when configured.
    pub fn render(
        &self,
        clip: &AudioClip,
        audio: Option<&Path>,
        output: &Path,
    ) -> Result<RenderOutcome, PipelineError> {
        let config = &self.config;
        config.validate()?;
        if clip.sample_rate == 0 && !clip.is_empty() {
            return Err(PipelineError::InvalidConfig("sample rate must be non-zero".into()));
        }
        let merge_source = audio.filter(|_| config.merge_audio);
        if let Some(path) = merge_source {
            if !path.is_file() {
                return Err(PipelineError::MissingInput(path.to_path_buf()));
            }
        }
        if let Some(dir) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !dir.is_dir() {
                return Err(PipelineError::MissingDirectory(dir.to_path_buf()));
            }
        }

        let mut frames = FrameGenerator::new(clip, config);
        let plan = frames.plan();
        log::info!(
            "Rendering {} frames ({} samples each) as {} at {}x{} @ {}fps",
            plan.total_frames,
            plan.samples_per_frame,
            config.design.design_type().name(),
            config.width,
            config.height,
            config.fps
        );

        if plan.is_empty() {
            std::fs::File::create(output)?;
            log::info!("No frames to render, wrote empty {}", output.display());
            return Ok(RenderOutcome {
                path: output.to_path_buf(),
                frames_rendered: 0,
                frames_written: 0,
                frames_dropped: 0,
                audio_merged: false,
            });
        }

        let video_config = config.to_video_config();
        let mut encoder = match &self.encoder_command {
            Some(build) => VideoEncoder::with_command(build(output, &video_config), video_config)?,
            None => VideoEncoder::new(output, video_config)?,
        };

        let start = Instant::now();
        let total = plan.total_frames;
        let mut rendered = 0u64;
        loop {
            if self.cancel.is_cancelled() {
                let at = frames.position();
                log::warn!("Render cancelled at frame {}/{}", at, total);
                encoder.abort();
                return Err(PipelineError::Cancelled(at));
            }
            let Some(frame) = frames.next() else { break };
            encoder.send_frame(frame.into_bytes())?;
            rendered += 1;
            if let Some(progress) = &self.progress {
                progress(rendered as f32 / total as f32);
            }
        }

        let report = encoder.finish()?;
        let elapsed = start.elapsed().as_secs_f64();
        log::info!(
            "Encoded {} frames in {:.1}s ({:.1} fps)",
            report.frames_written,
            elapsed,
            rendered as f64 / elapsed.max(1e-9)
        );

        let audio_merged = match merge_source {
            Some(path) => merge_audio(&config.ffmpeg, output, path, config.merge_timeout).is_ok(),
            None => false,
        };

        Ok(RenderOutcome {
            path: output.to_path_buf(),
            frames_rendered: rendered,
            frames_written: report.frames_written,
            frames_dropped: report.frames_dropped,
            audio_merged,
        })
    }
}

/// Render visualization video from decoded audio.
///
/// `audio_path` names the file the samples came from; it is merged into the
/// result when `config.merge_audio` is set.
pub fn render_video<P: AsRef<Path>>(
    clip: &AudioClip,
    audio_path: Option<&Path>,
    output_path: P,
    config: PipelineConfig,
    progress_callback: Option<Box<dyn Fn(f32) + Send>>,
) -> Result<RenderOutcome, PipelineError> {
    let mut pipeline = Pipeline::new(config);
    pipeline.progress = progress_callback;
    pipeline.render(clip, audio_path, output_path.as_ref())
}

/// Per-frame band levels for a clip, for export or inspection.
pub fn analyze_clip(clip: &AudioClip, fps: u32) -> Result<Vec<BandSnapshot>, PipelineError> {
    if fps == 0 {
        return Err(PipelineError::InvalidConfig("fps must be non-zero".into()));
    }
    Ok(analyze_bands(clip, fps))
}

/// Parse a hex color (6-char RGB or 8-char RGBA, alpha is ignored).
pub fn parse_hex_color(hex: &str) -> Option<Rgb<u8>> {
    let hex = hex.trim_start_matches('#');
    if (hex.len() != 6 && hex.len() != 8) || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Rgb([r, g, b]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#00ff88"), Some(Rgb([0, 255, 136])));
        assert_eq!(parse_hex_color("ffffff"), Some(Rgb([255, 255, 255])));
        assert_eq!(parse_hex_color("#00000000"), Some(Rgb([0, 0, 0])));
        assert_eq!(parse_hex_color("invalid"), None);
        assert_eq!(parse_hex_color("ééé"), None);
    }

    #[test]
    fn test_pipeline_config_default() {
        let config = PipelineConfig::default();
        assert_eq!(config.width, 1280);
        assert_eq!(config.height, 720);
        assert_eq!(config.fps, 30);
        assert_eq!(config.channel_capacity, 3);
        assert!(matches!(config.design, DesignParams::SpectrumBars(_)));
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let config = PipelineConfig { height: 0, ..Default::default() };
        assert!(matches!(config.validate(), Err(PipelineError::InvalidConfig(_))));
        let config = PipelineConfig { fps: 0, ..Default::default() };
        assert!(matches!(config.validate(), Err(PipelineError::InvalidConfig(_))));
    }

    #[test]
    fn test_cancel_token_is_shared() {
        let token = CancelToken::new();
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_analyze_clip_rejects_zero_fps() {
        let clip = AudioClip::new(vec![0.0; 100], 100);
        assert!(analyze_clip(&clip, 0).is_err());
        assert_eq!(analyze_clip(&clip, 10).unwrap().len(), 10);
    }
}
