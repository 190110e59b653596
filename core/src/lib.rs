//! Wavecast Core
//!
//! Audio-reactive procedural visualizer that renders frames on the CPU and
//! streams them to an external FFmpeg encoder.
//!
//! # Features
//!
//! - FFT spectrum analysis via RustFFT (2048-point, Hamming window)
//! - Smoothed bass/mid/high bands and a 30-block history ring
//! - Thirteen deterministic, seeded visualization designs
//! - Seven color policies
//! - Raw RGB24 streaming to FFmpeg (H.264, ProRes 4444, VP9) with an
//!   audio merge pass
//!
//! ```no_run
//! use wavecast::{generate_sine, render_video, AudioClip, PipelineConfig};
//!
//! let clip = AudioClip::new(generate_sine(220.0, 44_100, 2.0, 0.5), 44_100);
//! let config = PipelineConfig { merge_audio: false, ..Default::default() };
//! let outcome = render_video(&clip, None, "out.mp4", config, None).unwrap();
//! println!("{} frames", outcome.frames_rendered);
//! ```

pub mod audio;
pub mod canvas;
pub mod color;
pub mod context;
pub mod designs;
pub mod physics;
pub mod pipeline;
pub mod video;

// Re-export commonly used types
pub use audio::{
    decode_audio, generate_sine, AudioClip, AudioError, Bands, Signals, SpectrumAnalyzer,
    TemporalState,
};
pub use canvas::{Affine, Frame};
pub use color::{map_color, ColorMode};
pub use context::AnalysisContext;
pub use designs::{create_design, default_params, Design, DesignParams, DesignType};
pub use pipeline::{
    analyze_clip, parse_hex_color, render_video, BandSnapshot, CancelToken, FrameGenerator,
    FramePlan, Pipeline, PipelineConfig, PipelineError, RenderOutcome,
};
pub use video::{EncoderReport, VideoCodec, VideoConfig, VideoEncoder, VideoError};
