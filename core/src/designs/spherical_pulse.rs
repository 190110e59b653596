//! Spherical pulse visualization design.
//!
//! One circle per history entry, most recent innermost. Rings spread with
//! age and swell with the average historical amplitude; older rings fade.

use super::{Design, DesignType, SphericalPulseParams};
use crate::audio::average_amplitude;
use crate::canvas::Frame;
use crate::context::AnalysisContext;

/// Hard cap on rings.
const MAX_CIRCLES: usize = 20;

pub struct SphericalPulseDesign {
    params: SphericalPulseParams,
}

impl SphericalPulseDesign {
    pub fn new(params: SphericalPulseParams) -> Self {
        Self { params }
    }
}

impl Design for SphericalPulseDesign {
    fn design_type(&self) -> DesignType {
        DesignType::SphericalPulse
    }

    fn render(&mut self, ctx: &mut AnalysisContext, block: &[f32], frame: &mut Frame) {
        let history = ctx.state.history();
        let count = self.params.max_circles.min(MAX_CIRCLES).min(history.len());
        if block.is_empty() || count == 0 {
            return;
        }

        let mean = history.iter().map(average_amplitude).sum::<f32>() / history.len() as f32;
        let swell = 1.0 + mean * self.params.amplitude_gain;
        let (cx, cy) = ctx.center();
        let unit = ctx.min_dim();

        for (age, past) in history.recent(count).enumerate() {
            let t = age as f32 / count as f32;
            let own = average_amplitude(past);
            let radius =
                unit * (self.params.base_radius + self.params.spacing * age as f32) * swell + own * unit * 0.05;
            let color = ctx.color(own * 3.0, t);
            frame.circle(cx, cy, radius, color, 1.0 - t, self.params.line_width);
        }
    }
}
