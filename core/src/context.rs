//! Per-run context handed to every design.

use image::Rgb;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::audio::{Signals, SpectrumAnalyzer, TemporalState};
use crate::canvas::Frame;
use crate::color::{map_color, ColorMode};

/// Temporal state, color policy, seeded rng and canvas geometry for one run.
///
/// Built fresh for every render; designs receive it by `&mut` each frame.
pub struct AnalysisContext {
    pub state: TemporalState,
    pub color_mode: ColorMode,
    pub rng: StdRng,
    pub width: u32,
    pub height: u32,
    pub background: Rgb<u8>,
    analyzer: SpectrumAnalyzer,
}

impl AnalysisContext {
    pub fn new(width: u32, height: u32, color_mode: ColorMode, background: Rgb<u8>, seed: u64) -> Self {
        Self {
            state: TemporalState::new(),
            color_mode,
            rng: StdRng::seed_from_u64(seed),
            width,
            height,
            background,
            analyzer: SpectrumAnalyzer::default(),
        }
    }

    /// Analyze the next frame's block and update temporal state.
    pub fn advance(&mut self, block: &[f32]) {
        self.state.advance(block, &mut self.analyzer);
    }

    pub fn signals(&self) -> Signals {
        self.state.signals()
    }

    /// Color for `intensity` at `position` under the run's policy.
    pub fn color(&self, intensity: f32, position: f32) -> Rgb<u8> {
        map_color(self.color_mode, intensity, position, &self.state.signals())
    }

    /// A blank frame in the run's geometry.
    pub fn blank_frame(&self) -> Frame {
        Frame::new(self.width, self.height, self.background)
    }

    pub fn center(&self) -> (f32, f32) {
        (self.width as f32 * 0.5, self.height as f32 * 0.5)
    }

    pub fn min_dim(&self) -> f32 {
        self.width.min(self.height) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::generate_sine;

    #[test]
    fn test_advance_counts_frames() {
        let mut ctx = AnalysisContext::new(64, 32, ColorMode::default(), Rgb([0, 0, 0]), 1);
        let block = generate_sine(440.0, 44100, 0.02, 0.5);
        ctx.advance(&block);
        ctx.advance(&block);
        assert_eq!(ctx.state.frame(), 2);
        assert_eq!(ctx.signals().frame, 2);
        assert_eq!(ctx.blank_frame().as_bytes().len(), 64 * 32 * 3);
    }

    #[test]
    fn test_color_follows_policy() {
        let a = AnalysisContext::new(8, 8, ColorMode::AmplitudeGradient, Rgb([0, 0, 0]), 1);
        let b = AnalysisContext::new(8, 8, ColorMode::BassReactive, Rgb([0, 0, 0]), 1);
        assert_ne!(a.color(0.8, 0.2), b.color(0.8, 0.2));
    }
}
