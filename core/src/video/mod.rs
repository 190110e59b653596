//! Video output through external ffmpeg processes.
//!
//! Provides:
//! - A raw RGB24 frame encoder (H.264, ProRes 4444 or VP9) fed over a pipe
//! - Bounded waits that kill a hung process
//! - The final audio/video merge

pub mod encoder;
pub mod merge;
mod process;

pub use encoder::{EncoderReport, VideoCodec, VideoConfig, VideoEncoder, VideoError};
pub use merge::{merge_audio, merge_temp_path};
