//! Kaleidoscope visualization design.
//!
//! A spiral whose radius follows the samples, drawn once per segment under
//! an accumulated rotation about the frame center. The canvas transform is
//! reset when the pattern is done.

use std::f32::consts::TAU;

use super::{strided, Design, DesignType, KaleidoscopeParams};
use crate::canvas::{Affine, Frame};
use crate::context::AnalysisContext;

const MAX_SEGMENTS: u32 = 64;

pub struct KaleidoscopeDesign {
    params: KaleidoscopeParams,
    spiral: Vec<(f32, f32)>,
}

impl KaleidoscopeDesign {
    pub fn new(params: KaleidoscopeParams) -> Self {
        Self {
            params,
            spiral: Vec::new(),
        }
    }
}

impl Design for KaleidoscopeDesign {
    fn design_type(&self) -> DesignType {
        DesignType::Kaleidoscope
    }

    fn render(&mut self, ctx: &mut AnalysisContext, block: &[f32], frame: &mut Frame) {
        let points = self.params.points.min(block.len());
        if points < 2 {
            return;
        }

        let segments = self.params.segments.clamp(1, MAX_SEGMENTS);
        let (cx, cy) = ctx.center();
        let reach = ctx.min_dim() * 0.45;
        let swirl = ctx.state.frame() as f32 * self.params.spin;

        self.spiral.clear();
        self.spiral.extend((0..points).map(|i| {
            let t = i as f32 / (points - 1) as f32;
            let angle = t * self.params.turns * TAU;
            let radius = reach * t * (1.0 + strided(block, i, points) * 0.5);
            (cx + radius * angle.cos(), cy + radius * angle.sin())
        }));

        let step = Affine::rotation_about(cx, cy, TAU / segments as f32);
        let mut transform = Affine::rotation_about(cx, cy, swirl);
        for segment in 0..segments {
            frame.set_transform(transform);
            for (i, pair) in self.spiral.windows(2).enumerate() {
                let t = i as f32 / (points - 1) as f32;
                let intensity = strided(block, i, points).abs() * 2.0 + t * 0.3;
                let color = ctx.color(intensity, (t + segment as f32 / segments as f32) * 0.5);
                frame.line(pair[0], pair[1], color, 0.9, self.params.line_width);
            }
            transform = transform.then(&step);
        }
        frame.reset_transform();
    }
}
