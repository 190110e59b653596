//! Ripple field visualization design.
//!
//! A ripple is spawned wherever the current amplitude jumps above its
//! running average. Ripples expand faster with bass, fade each frame, and
//! are drawn as several concentric rings.

use rand::Rng;

use super::{environment, Design, DesignType, RippleFieldParams};
use crate::canvas::Frame;
use crate::context::AnalysisContext;
use crate::physics::{Pool, Ripple};

/// Weight of the newest frame in the running amplitude average.
const AVERAGE_RATE: f32 = 0.1;
/// Pixel gap between a ripple's concentric rings.
const LAYER_SPACING: f32 = 14.0;
const MAX_LAYERS: u32 = 8;

pub struct RippleFieldDesign {
    params: RippleFieldParams,
    pool: Pool<Ripple>,
    running: f32,
}

impl RippleFieldDesign {
    pub fn new(params: RippleFieldParams) -> Self {
        let pool = Pool::new(params.max_ripples);
        Self {
            params,
            pool,
            running: 0.0,
        }
    }

    pub fn pool(&self) -> &Pool<Ripple> {
        &self.pool
    }

    fn is_spike(&self, amplitude: f32) -> bool {
        amplitude > self.params.min_amplitude && amplitude > self.running * self.params.spike_ratio
    }
}

impl Design for RippleFieldDesign {
    fn design_type(&self) -> DesignType {
        DesignType::RippleField
    }

    fn live_entities(&self) -> usize {
        self.pool.len()
    }

    fn render(&mut self, ctx: &mut AnalysisContext, block: &[f32], frame: &mut Frame) {
        if block.is_empty() {
            return;
        }

        let amplitude = ctx.state.amplitude();
        if self.is_spike(amplitude) {
            let x = ctx.rng.random_range(0.0..frame.width().max(1) as f32);
            let y = ctx.rng.random_range(0.0..frame.height().max(1) as f32);
            self.pool.spawn(Ripple {
                x,
                y,
                radius: 0.0,
                speed: self.params.speed,
                intensity: (amplitude * 4.0).min(1.0),
                decay: self.params.decay.max(f32::EPSILON),
                layers: self.params.layers.clamp(1, MAX_LAYERS),
            });
        }
        self.running += (amplitude - self.running) * AVERAGE_RATE;
        self.pool.update(&environment(ctx));

        let width = frame.width() as f32;
        for ripple in self.pool.iter() {
            let color = ctx.color(ripple.intensity, ripple.x / width);
            for k in 0..ripple.layers {
                let radius = ripple.radius - k as f32 * LAYER_SPACING;
                if radius <= 0.0 {
                    break;
                }
                let alpha = ripple.intensity * (1.0 - k as f32 / ripple.layers as f32);
                frame.circle(ripple.x, ripple.y, radius, color, alpha, 2.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorMode;
    use image::Rgb;

    #[test]
    fn test_spike_spawns_and_steady_does_not_repeat() {
        let mut ctx = AnalysisContext::new(120, 80, ColorMode::default(), Rgb([0, 0, 0]), 5);
        let mut design = RippleFieldDesign::new(RippleFieldParams::default());

        let quiet = vec![0.0; 256];
        let loud = vec![0.6; 256];
        for block in [&quiet, &quiet, &loud] {
            ctx.advance(block);
            let mut frame = ctx.blank_frame();
            design.render(&mut ctx, block, &mut frame);
        }
        assert_eq!(design.pool().spawned(), 1);

        // The running average catches up; a steady level stops spawning.
        for _ in 0..60 {
            ctx.advance(&loud);
            let mut frame = ctx.blank_frame();
            design.render(&mut ctx, &loud, &mut frame);
        }
        let before = design.pool().spawned();
        ctx.advance(&loud);
        let mut frame = ctx.blank_frame();
        design.render(&mut ctx, &loud, &mut frame);
        assert_eq!(design.pool().spawned(), before);
    }
}
