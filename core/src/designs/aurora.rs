//! Aurora visualization design.
//!
//! Layered curtains. Each layer's edge is two traveling sines plus the
//! sample at that column, lightly smoothed, and the area below the edge is
//! filled with an alpha gradient that fades out at the bottom.

use super::{strided, AuroraParams, Design, DesignType};
use crate::canvas::Frame;
use crate::context::AnalysisContext;

const MAX_LAYERS: usize = 12;

pub struct AuroraDesign {
    params: AuroraParams,
    edge: Vec<f32>,
    smoothed: Vec<f32>,
}

impl AuroraDesign {
    pub fn new(params: AuroraParams) -> Self {
        Self {
            params,
            edge: Vec::new(),
            smoothed: Vec::new(),
        }
    }
}

/// Three-tap moving average with clamped ends.
fn smooth_into(src: &[f32], dst: &mut Vec<f32>) {
    dst.clear();
    let n = src.len();
    dst.extend((0..n).map(|i| {
        let a = src[i.saturating_sub(1)];
        let c = src[(i + 1).min(n - 1)];
        (a + src[i] * 2.0 + c) * 0.25
    }));
}

impl Design for AuroraDesign {
    fn design_type(&self) -> DesignType {
        DesignType::Aurora
    }

    fn render(&mut self, ctx: &mut AnalysisContext, block: &[f32], frame: &mut Frame) {
        let layers = self.params.layers.min(MAX_LAYERS);
        let width = frame.width() as usize;
        if block.is_empty() || layers == 0 || width == 0 {
            return;
        }

        let height = frame.height() as f32;
        let time = ctx.state.frame() as f32 * self.params.speed;
        let signals = ctx.signals();
        let wave = self.params.wave_height * height * (1.0 + signals.bass);
        let gain = self.params.sample_gain * height;

        for layer in 0..layers {
            let l = layer as f32;
            let base = height * (0.2 + 0.5 * l / layers as f32);
            let k1 = 0.008 + 0.003 * l;
            let k2 = 0.021 - 0.002 * l;

            self.edge.clear();
            self.edge.extend((0..width).map(|x| {
                let xf = x as f32;
                base + (xf * k1 + time * (1.0 + 0.3 * l)).sin() * wave
                    + (xf * k2 - time * 0.7 + l).sin() * wave * 0.5
                    + strided(block, x, width) * gain
            }));
            smooth_into(&self.edge, &mut self.smoothed);

            let position = l / layers as f32;
            let color = ctx.color(0.5 + signals.mid * 0.5, position);
            let alpha = self.params.alpha * (1.0 - 0.5 * position);
            for (x, &top) in self.smoothed.iter().enumerate() {
                frame.fill_to_bottom(x as i32, top, color, alpha, 0.0);
                frame.blend(x as i32, top.round() as i32, color, (alpha * 2.0).min(1.0));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smooth_preserves_constant() {
        let mut out = Vec::new();
        smooth_into(&[3.0; 5], &mut out);
        assert_eq!(out, vec![3.0; 5]);

        smooth_into(&[0.0, 4.0, 0.0], &mut out);
        assert_eq!(out, vec![1.0, 2.0, 1.0]);
    }
}
