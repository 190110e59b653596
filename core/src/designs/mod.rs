//! Visualization design system.
//!
//! Each design paints one frame from the current sample block and the run's
//! [`AnalysisContext`]:
//! - Waveform: oscilloscope line across the frame
//! - CircularWave: samples wrapped around a circle
//! - SphericalPulse: concentric rings from the history ring
//! - SpectrumBars: 64 frequency bars, linear or log spaced
//! - ParticleFlow: amplitude-spawned particles under band forces
//! - Kaleidoscope: a spiral repeated with rotational symmetry
//! - DnaHelix: two phase-shifted strands with rungs
//! - Aurora: layered curtains filled to the bottom edge
//! - MatrixRain: falling glyph trails
//! - WaveGrid: history rows in perspective
//! - LaserFan: rotating beam fan with treble flashes
//! - RippleField: rings spawned on amplitude spikes
//! - FractalTree: recursive branching tree
//!
//! A design is chosen once per run by [`create_design`]; it owns its
//! parameters and any entity pools.

mod aurora;
mod circular_wave;
mod dna_helix;
mod fractal_tree;
mod kaleidoscope;
mod laser_fan;
mod matrix_rain;
pub mod params;
mod particle_flow;
mod registry;
mod ripple_field;
mod spectrum_bars;
mod spherical_pulse;
mod wave_grid;
mod waveform;

pub use aurora::AuroraDesign;
pub use circular_wave::CircularWaveDesign;
pub use dna_helix::DnaHelixDesign;
pub use fractal_tree::FractalTreeDesign;
pub use kaleidoscope::KaleidoscopeDesign;
pub use laser_fan::LaserFanDesign;
pub use matrix_rain::MatrixRainDesign;
pub use params::*;
pub use particle_flow::ParticleFlowDesign;
pub use registry::{create_design, default_params};
pub use ripple_field::RippleFieldDesign;
pub use spectrum_bars::SpectrumBarsDesign;
pub use spherical_pulse::SphericalPulseDesign;
pub use wave_grid::WaveGridDesign;
pub use waveform::WaveformDesign;

use crate::canvas::Frame;
use crate::context::AnalysisContext;
use crate::physics::Environment;

/// Magnitude that maps to half height when drawing frequency bins.
pub const BIN_KNEE: f32 = 24.0;

/// Margin outside the frame that entities may drift into before culling.
pub const ENTITY_MARGIN: f32 = 50.0;

/// Available design types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DesignType {
    Waveform,
    CircularWave,
    SphericalPulse,
    SpectrumBars,
    ParticleFlow,
    Kaleidoscope,
    DnaHelix,
    Aurora,
    MatrixRain,
    WaveGrid,
    LaserFan,
    RippleField,
    FractalTree,
}

impl DesignType {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "waveform" | "wave" | "oscilloscope" => Some(Self::Waveform),
            "circular-wave" | "circularwave" | "circle" => Some(Self::CircularWave),
            "spherical-pulse" | "sphericalpulse" | "pulse" | "sphere" => Some(Self::SphericalPulse),
            "spectrum-bars" | "spectrumbars" | "bars" | "spectrum" => Some(Self::SpectrumBars),
            "particle-flow" | "particleflow" | "particles" => Some(Self::ParticleFlow),
            "kaleidoscope" | "kaleidoscope-wave" => Some(Self::Kaleidoscope),
            "dna-helix" | "dnahelix" | "dna" | "helix" => Some(Self::DnaHelix),
            "aurora" | "northern-lights" => Some(Self::Aurora),
            "matrix-rain" | "matrixrain" | "matrix" | "rain" => Some(Self::MatrixRain),
            "wave-grid" | "wavegrid" | "grid" | "3d" => Some(Self::WaveGrid),
            "laser-fan" | "laserfan" | "laser" | "lasers" => Some(Self::LaserFan),
            "ripple-field" | "ripplefield" | "ripples" | "ripple" => Some(Self::RippleField),
            "fractal-tree" | "fractaltree" | "tree" | "fractal" => Some(Self::FractalTree),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Waveform => "waveform",
            Self::CircularWave => "circular-wave",
            Self::SphericalPulse => "spherical-pulse",
            Self::SpectrumBars => "spectrum-bars",
            Self::ParticleFlow => "particle-flow",
            Self::Kaleidoscope => "kaleidoscope",
            Self::DnaHelix => "dna-helix",
            Self::Aurora => "aurora",
            Self::MatrixRain => "matrix-rain",
            Self::WaveGrid => "wave-grid",
            Self::LaserFan => "laser-fan",
            Self::RippleField => "ripple-field",
            Self::FractalTree => "fractal-tree",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Waveform => "Oscilloscope line colored by local amplitude",
            Self::CircularWave => "Samples wrapped around a pulsing circle",
            Self::SphericalPulse => "Concentric rings from recent history",
            Self::SpectrumBars => "Frequency bars with optional glow",
            Self::ParticleFlow => "Particles spawned by loudness, pushed by bass and treble",
            Self::Kaleidoscope => "Sample-driven spiral with rotational symmetry",
            Self::DnaHelix => "Twin strands twisting with the music",
            Self::Aurora => "Layered curtains of light",
            Self::MatrixRain => "Falling glyph columns, denser on bass",
            Self::WaveGrid => "History rows in 3D perspective",
            Self::LaserFan => "Rotating beam fan with treble flashes",
            Self::RippleField => "Rings spawned on amplitude spikes",
            Self::FractalTree => "Recursive tree swaying with the bands",
        }
    }

    /// True for the designs that keep an entity pool between frames.
    pub fn is_stateful(&self) -> bool {
        matches!(
            self,
            Self::ParticleFlow | Self::MatrixRain | Self::LaserFan | Self::RippleField
        )
    }

    pub fn all() -> &'static [Self] {
        &[
            Self::Waveform,
            Self::CircularWave,
            Self::SphericalPulse,
            Self::SpectrumBars,
            Self::ParticleFlow,
            Self::Kaleidoscope,
            Self::DnaHelix,
            Self::Aurora,
            Self::MatrixRain,
            Self::WaveGrid,
            Self::LaserFan,
            Self::RippleField,
            Self::FractalTree,
        ]
    }
}

/// Trait for visualization designs.
///
/// `render` is called once per frame after the context has been advanced
/// with `block`. Designs must tolerate an empty or very short block.
pub trait Design: Send {
    /// Paint the current frame.
    fn render(&mut self, ctx: &mut AnalysisContext, block: &[f32], frame: &mut Frame);

    /// Design type identifier.
    fn design_type(&self) -> DesignType;

    /// Entities currently alive in this design's pools.
    fn live_entities(&self) -> usize {
        0
    }
}

/// Sample at `i`, clamped into the block. Empty blocks read as silence.
#[inline]
pub(crate) fn sample_at(block: &[f32], i: usize) -> f32 {
    match block.len() {
        0 => 0.0,
        n => block[i.min(n - 1)],
    }
}

/// The `i`-th of `count` evenly strided samples.
#[inline]
pub(crate) fn strided(block: &[f32], i: usize, count: usize) -> f32 {
    if count == 0 {
        return 0.0;
    }
    sample_at(block, i * block.len() / count)
}

/// Peak-magnitude downsample of `block` into `out.len()` buckets.
pub(crate) fn downsample_into(block: &[f32], out: &mut [f32]) {
    let n = out.len();
    if n == 0 {
        return;
    }
    if block.is_empty() {
        out.fill(0.0);
        return;
    }
    for (i, slot) in out.iter_mut().enumerate() {
        let start = i * block.len() / n;
        let end = ((i + 1) * block.len() / n).max(start + 1).min(block.len());
        *slot = block[start.min(block.len() - 1)..end]
            .iter()
            .copied()
            .fold(0.0f32, |acc, s| if s.abs() > acc.abs() { s } else { acc });
    }
}

/// Entity environment for the current frame.
pub(crate) fn environment(ctx: &AnalysisContext) -> Environment {
    let signals = ctx.signals();
    Environment {
        width: ctx.width as f32,
        height: ctx.height as f32,
        margin: ENTITY_MARGIN,
        bass: signals.bass,
        mid: signals.mid,
        high: signals.high,
    }
}
