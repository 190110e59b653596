//! Circular wave visualization design.
//!
//! Up to 360 samples wrapped around the frame center as a closed loop,
//! radius = base + sample × base.

use std::f32::consts::{FRAC_PI_2, TAU};

use super::{strided, CircularWaveParams, Design, DesignType};
use crate::canvas::Frame;
use crate::context::AnalysisContext;

/// Hard cap on loop points.
const MAX_POINTS: usize = 360;

pub struct CircularWaveDesign {
    params: CircularWaveParams,
    points: Vec<(f32, f32)>,
}

impl CircularWaveDesign {
    pub fn new(params: CircularWaveParams) -> Self {
        Self {
            params,
            points: Vec::with_capacity(MAX_POINTS),
        }
    }
}

impl Design for CircularWaveDesign {
    fn design_type(&self) -> DesignType {
        DesignType::CircularWave
    }

    fn render(&mut self, ctx: &mut AnalysisContext, block: &[f32], frame: &mut Frame) {
        let count = self.params.points.min(MAX_POINTS).min(block.len());
        if count < 2 {
            return;
        }

        let (cx, cy) = ctx.center();
        let base = ctx.min_dim() * self.params.base_radius;

        self.points.clear();
        self.points.extend((0..count).map(|i| {
            let angle = i as f32 / count as f32 * TAU - FRAC_PI_2;
            let radius = (base + strided(block, i, count) * base).max(0.0);
            (cx + radius * angle.cos(), cy + radius * angle.sin())
        }));

        for i in 0..count {
            let a = self.points[i];
            let b = self.points[(i + 1) % count];
            let intensity = strided(block, i, count).abs() * 2.0;
            let color = ctx.color(intensity, i as f32 / count as f32);
            frame.line(a, b, color, 1.0, self.params.line_width);
        }
    }
}
