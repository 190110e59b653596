//! Laser fan visualization design.
//!
//! Layers of beams fan out from the bottom center. Each layer follows one
//! band: its reach and brightness track that band's level, and the whole
//! fan sways as it rotates. Treble peaks fire short-lived flash beams.

use std::f32::consts::{FRAC_PI_2, PI};

use rand::Rng;

use super::{environment, Design, DesignType, LaserFanParams};
use crate::canvas::Frame;
use crate::context::AnalysisContext;
use crate::physics::{Beam, Pool};
use image::Rgb;

const MAX_BEAMS: usize = 128;
const MAX_LAYERS: usize = 8;

pub struct LaserFanDesign {
    params: LaserFanParams,
    flashes: Pool<Beam>,
    rotation: f32,
}

impl LaserFanDesign {
    pub fn new(params: LaserFanParams) -> Self {
        let flashes = Pool::new(params.max_flashes);
        Self {
            params,
            flashes,
            rotation: 0.0,
        }
    }
}

impl Design for LaserFanDesign {
    fn design_type(&self) -> DesignType {
        DesignType::LaserFan
    }

    fn live_entities(&self) -> usize {
        self.flashes.len()
    }

    fn render(&mut self, ctx: &mut AnalysisContext, block: &[f32], frame: &mut Frame) {
        let beams = self.params.beams.min(MAX_BEAMS);
        let layers = self.params.layers.min(MAX_LAYERS);
        if block.is_empty() || beams == 0 || layers == 0 {
            return;
        }

        let signals = ctx.signals();
        let bands = [signals.bass, signals.mid, signals.high];
        self.rotation += self.params.spin * (1.0 + signals.mid * 2.0);

        let width = frame.width() as f32;
        let height = frame.height() as f32;
        let origin = (width * 0.5, height);
        let diagonal = width.hypot(height);
        let spread = self.params.spread * (1.0 + signals.bass * 0.3);

        for layer in 0..layers {
            let level = bands[layer % bands.len()];
            let sway = (self.rotation + layer as f32 * 0.7).sin() * 0.35;
            let reach = diagonal * self.params.length * (0.4 + 0.6 * level);
            let alpha = (0.25 + 0.65 * level) / (1.0 + layer as f32 * 0.3);
            let thickness = (layers - layer) as f32;

            for b in 0..beams {
                let u = if beams > 1 { b as f32 / (beams - 1) as f32 } else { 0.5 };
                let angle = -FRAC_PI_2 + (u - 0.5) * spread + sway;
                let end = (origin.0 + reach * angle.cos(), origin.1 + reach * angle.sin());
                let color = ctx.color(level, u);
                frame.line(origin, end, color, alpha, thickness);
            }
        }

        if signals.high > self.params.flash_threshold && ctx.rng.random::<f32>() < signals.high {
            let angle = -FRAC_PI_2 + ctx.rng.random_range(-0.5f32..0.5) * spread;
            let spin = ctx.rng.random_range(-0.03f32..0.03);
            let length = ctx.rng.random_range(0.5f32..1.0) * self.params.length;
            self.flashes.spawn(Beam { angle, spin, length, intensity: 1.0, decay: 0.08 });
        }
        self.flashes.update(&environment(ctx));

        for flash in self.flashes.iter() {
            let reach = diagonal * flash.length;
            let end = (
                origin.0 + reach * flash.angle.cos(),
                origin.1 + reach * flash.angle.sin(),
            );
            let color = ctx.color(flash.intensity, (flash.angle + PI) / (2.0 * PI));
            frame.line(origin, end, color, flash.intensity * 0.6, 5.0);
            frame.line(origin, end, Rgb([255, 255, 255]), flash.intensity, 1.0);
        }
    }
}
