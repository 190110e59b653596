//! Fractal tree visualization design.
//!
//! A tree grown by bounded recursion from the bottom center. Branch angle
//! widens with mids, length ratio grows with bass, and each level sways by
//! a sample from the current block. Strong bass adds a center branch on
//! the upper levels.

use super::{strided, Design, DesignType, FractalTreeParams};
use crate::audio::Signals;
use crate::canvas::Frame;
use crate::color::{map_color, ColorMode};
use crate::context::AnalysisContext;

/// Recursion cap regardless of parameters.
pub const MAX_DEPTH: u32 = 12;
/// Levels below the root that may carry the bass branch.
const EXTRA_BRANCH_LEVELS: u32 = 4;
/// Branches shorter than this are not drawn or split.
const MIN_LENGTH: f32 = 1.5;

pub struct FractalTreeDesign {
    params: FractalTreeParams,
    branches: usize,
}

impl FractalTreeDesign {
    pub fn new(params: FractalTreeParams) -> Self {
        Self { params, branches: 0 }
    }

    /// Branch segments drawn in the last frame.
    pub fn branches(&self) -> usize {
        self.branches
    }
}

/// Per-frame growth settings shared by every level.
struct Growth<'a> {
    block: &'a [f32],
    signals: Signals,
    mode: ColorMode,
    depth: u32,
    spread: f32,
    shrink: f32,
    extra: bool,
}

impl Growth<'_> {
    fn grow(&self, frame: &mut Frame, from: (f32, f32), angle: f32, length: f32, level: u32) -> usize {
        if level >= self.depth || length < MIN_LENGTH {
            return 0;
        }

        let sway = strided(self.block, level as usize, self.depth as usize) * 0.35;
        let heading = angle + sway;
        let to = (from.0 + length * heading.cos(), from.1 + length * heading.sin());

        let t = level as f32 / self.depth as f32;
        let color = map_color(self.mode, 1.0 - t * 0.6, t, &self.signals);
        let thickness = ((self.depth - level) as f32 * 0.7).max(1.0);
        frame.line(from, to, color, 1.0 - t * 0.4, thickness);

        let next = length * self.shrink;
        let mut drawn = 1;
        drawn += self.grow(frame, to, heading - self.spread, next, level + 1);
        drawn += self.grow(frame, to, heading + self.spread, next, level + 1);
        if self.extra && level < EXTRA_BRANCH_LEVELS {
            drawn += self.grow(frame, to, heading, next * 0.8, level + 1);
        }
        drawn
    }
}

impl Design for FractalTreeDesign {
    fn design_type(&self) -> DesignType {
        DesignType::FractalTree
    }

    fn render(&mut self, ctx: &mut AnalysisContext, block: &[f32], frame: &mut Frame) {
        self.branches = 0;
        if block.is_empty() {
            return;
        }

        let signals = ctx.signals();
        let growth = Growth {
            block,
            signals,
            mode: ctx.color_mode,
            depth: self.params.depth.min(MAX_DEPTH),
            spread: self.params.angle * (1.0 + signals.mid * 0.6),
            shrink: (self.params.shrink * (0.9 + 0.2 * signals.bass)).clamp(0.1, 0.85),
            extra: signals.bass > self.params.extra_branch_bass,
        };

        let height = frame.height() as f32;
        let root = (frame.width() as f32 * 0.5, height);
        let trunk = height * self.params.trunk * (0.85 + 0.3 * signals.bass);
        self.branches = growth.grow(frame, root, -std::f32::consts::FRAC_PI_2, trunk, 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn render(params: FractalTreeParams) -> usize {
        let mut ctx = AnalysisContext::new(200, 200, ColorMode::default(), Rgb([0, 0, 0]), 0);
        let block = vec![0.1; 64];
        ctx.advance(&block);
        let mut frame = ctx.blank_frame();
        let mut design = FractalTreeDesign::new(params);
        design.render(&mut ctx, &block, &mut frame);
        design.branches()
    }

    #[test]
    fn test_binary_tree_branch_count() {
        let params = FractalTreeParams { depth: 4, extra_branch_bass: 2.0, ..Default::default() };
        assert_eq!(render(params), 15);
    }

    #[test]
    fn test_depth_is_capped() {
        let params = FractalTreeParams { depth: 40, trunk: 0.4, shrink: 0.85, extra_branch_bass: 2.0, ..Default::default() };
        assert!(render(params) < 1 << MAX_DEPTH);
    }
}
