//! Particle flow visualization design.
//!
//! Particles burst from the center in proportion to the recent average
//! amplitude. Bass lifts them, treble pushes them sideways, damping slows
//! them and their life decays until they are culled.

use std::f32::consts::TAU;

use rand::Rng;

use super::{environment, Design, DesignType, ParticleFlowParams};
use crate::audio::average_amplitude;
use crate::canvas::Frame;
use crate::context::AnalysisContext;
use crate::physics::{Particle, Pool};

pub struct ParticleFlowDesign {
    params: ParticleFlowParams,
    pool: Pool<Particle>,
}

impl ParticleFlowDesign {
    pub fn new(params: ParticleFlowParams) -> Self {
        let pool = Pool::new(params.max_particles);
        Self { params, pool }
    }

    pub fn pool(&self) -> &Pool<Particle> {
        &self.pool
    }

    /// How many particles the given recent amplitude asks for this frame.
    fn spawn_budget(&self, recent: f32) -> usize {
        if recent.is_nan() || recent <= self.params.spawn_threshold {
            return 0;
        }
        let wanted = ((recent - self.params.spawn_threshold) * self.params.spawn_rate).ceil() as usize;
        wanted.min(self.params.max_spawn_per_frame).min(self.pool.room())
    }

    fn spawn(&mut self, ctx: &mut AnalysisContext, count: usize, energy: f32) {
        let (cx, cy) = ctx.center();
        let (min_size, max_size) = (
            self.params.min_size.min(self.params.max_size),
            self.params.max_size.max(self.params.min_size),
        );
        for _ in 0..count {
            let angle = ctx.rng.random_range(0.0..TAU);
            let speed = ctx.rng.random_range(0.5f32..2.5) * (1.0 + energy * 8.0);
            let size = if max_size > min_size {
                ctx.rng.random_range(min_size..max_size)
            } else {
                min_size
            };
            self.pool.spawn(Particle {
                x: cx + ctx.rng.random_range(-4.0f32..4.0),
                y: cy + ctx.rng.random_range(-4.0f32..4.0),
                vx: angle.cos() * speed,
                vy: angle.sin() * speed,
                life: 1.0,
                decay: self.params.decay.max(f32::EPSILON),
                size,
                damping: self.params.damping,
                bass_lift: self.params.bass_lift,
                treble_push: self.params.treble_push,
                hue: ctx.rng.random::<f32>(),
            });
        }
    }
}

impl Design for ParticleFlowDesign {
    fn design_type(&self) -> DesignType {
        DesignType::ParticleFlow
    }

    fn live_entities(&self) -> usize {
        self.pool.len()
    }

    fn render(&mut self, ctx: &mut AnalysisContext, block: &[f32], frame: &mut Frame) {
        if block.is_empty() {
            return;
        }

        let lookback = self.params.lookback.max(1);
        let history = ctx.state.history();
        let taken = history.len().min(lookback);
        let recent = if taken == 0 {
            0.0
        } else {
            history.recent(lookback).map(average_amplitude).sum::<f32>() / taken as f32
        };

        let budget = self.spawn_budget(recent);
        self.spawn(ctx, budget, recent);
        self.pool.update(&environment(ctx));

        for p in self.pool.iter() {
            let color = ctx.color(p.life, p.hue);
            frame.fill_circle(p.x, p.y, p.size * (0.5 + 0.5 * p.life), color, p.life);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorMode;
    use image::Rgb;

    fn run(block: &[f32], frames: usize, params: ParticleFlowParams) -> ParticleFlowDesign {
        let mut ctx = AnalysisContext::new(160, 90, ColorMode::default(), Rgb([0, 0, 0]), 3);
        let mut design = ParticleFlowDesign::new(params);
        for _ in 0..frames {
            ctx.advance(block);
            let mut frame = ctx.blank_frame();
            design.render(&mut ctx, block, &mut frame);
            assert!(design.live_entities() <= design.pool().capacity());
        }
        design
    }

    #[test]
    fn test_loud_input_spawns_within_caps() {
        let params = ParticleFlowParams { max_particles: 50, max_spawn_per_frame: 10, ..Default::default() };
        let design = run(&[0.8; 735], 20, params);
        assert!(design.pool().spawned() > 0);
        assert!(design.live_entities() <= 50);
    }

    #[test]
    fn test_silence_spawns_nothing() {
        let design = run(&[0.0; 735], 30, ParticleFlowParams::default());
        assert_eq!(design.pool().spawned(), 0);
    }

    #[test]
    fn test_per_frame_cap() {
        let params = ParticleFlowParams { max_spawn_per_frame: 7, decay: 0.001, ..Default::default() };
        let design = run(&[0.9; 512], 1, params);
        assert_eq!(design.pool().spawned(), 7);
    }
}
