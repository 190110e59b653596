//! Mono sample input for a render run.
//!
//! Decoding is delegated to an external `ffmpeg` process that writes mono
//! little-endian f32 samples to stdout.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use thiserror::Error;

/// Errors that can occur while obtaining audio samples.
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Audio file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to run audio decoder: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("Audio decoder exited with {status}: {stderr}")]
    Decoder { status: String, stderr: String },

    #[error("Invalid sample rate: {0}")]
    InvalidSampleRate(u32),
}

/// Decoded mono audio handed to the pipeline.
#[derive(Debug, Clone, Default)]
pub struct AudioClip {
    /// Mono samples, normalized to roughly -1.0..1.0.
    pub samples: Vec<f32>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl AudioClip {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self { samples, sample_rate }
    }

    /// Duration of the clip in seconds.
    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Decode `path` to mono f32 at `sample_rate` using `ffmpeg` from `PATH`.
pub fn decode_audio(path: &Path, sample_rate: u32) -> Result<AudioClip, AudioError> {
    decode_audio_with("ffmpeg", path, sample_rate)
}

/// Decode `path` with an explicit ffmpeg executable.
pub fn decode_audio_with<S: AsRef<OsStr>>(
    program: S,
    path: &Path,
    sample_rate: u32,
) -> Result<AudioClip, AudioError> {
    if !path.exists() {
        return Err(AudioError::NotFound(path.to_path_buf()));
    }
    if sample_rate == 0 {
        return Err(AudioError::InvalidSampleRate(sample_rate));
    }

    let output = Command::new(program)
        .arg("-nostdin")
        .args(["-loglevel", "error"])
        .arg("-i")
        .arg(path)
        .args(["-f", "f32le", "-ac", "1"])
        .args(["-ar", &sample_rate.to_string()])
        .arg("pipe:1")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(AudioError::Spawn)?;

    if !output.status.success() {
        return Err(AudioError::Decoder {
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let samples = samples_from_f32le(&output.stdout);

    log::info!(
        "Decoded audio: {} samples, {}Hz, {:.1}s",
        samples.len(),
        sample_rate,
        samples.len() as f64 / sample_rate as f64
    );

    Ok(AudioClip::new(samples, sample_rate))
}

/// Parse packed little-endian f32 samples; a trailing partial sample is ignored.
pub fn samples_from_f32le(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect()
}
