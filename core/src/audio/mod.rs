//! Audio input and per-frame analysis.
//!
//! This module provides:
//! - Mono sample input (`AudioClip`), decoded by an external ffmpeg process
//! - FFT magnitude spectrum via RustFFT with a Hamming window
//! - Bass/mid/high band aggregation with exponential smoothing
//! - Temporal state: history ring, frame counter, smoothed bands
//! - Synthetic test signals

pub mod bands;
pub mod fft;
pub mod source;
pub mod state;
pub mod synth;

pub use bands::{soft_level, BandSmoother, Bands, BAND_KNEE, BAND_SMOOTHING};
pub use fft::{SpectrumAnalyzer, FFT_SIZE};
pub use source::{decode_audio, decode_audio_with, AudioClip, AudioError};
pub use state::{average_amplitude, HistoryRing, Signals, TemporalState, HISTORY_CAPACITY};
pub use synth::{
    generate_click_track, generate_kick, generate_sine, generate_silence, generate_test_beat,
    generate_white_noise,
};
