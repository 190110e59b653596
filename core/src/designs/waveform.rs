//! Waveform visualization design.
//!
//! Classic oscilloscope line: one sample per horizontal pixel, deflected
//! around mid-height, each segment colored by its local amplitude.

use super::{sample_at, Design, DesignType, WaveformParams};
use crate::canvas::Frame;
use crate::context::AnalysisContext;

pub struct WaveformDesign {
    params: WaveformParams,
}

impl WaveformDesign {
    pub fn new(params: WaveformParams) -> Self {
        Self { params }
    }
}

impl Design for WaveformDesign {
    fn design_type(&self) -> DesignType {
        DesignType::Waveform
    }

    fn render(&mut self, ctx: &mut AnalysisContext, block: &[f32], frame: &mut Frame) {
        let width = frame.width() as usize;
        if block.is_empty() || width < 2 {
            return;
        }

        let stride = (block.len() / width).max(1);
        let mid = frame.height() as f32 * 0.5;
        let deflection = frame.height() as f32 * self.params.amplitude;
        let point = |x: usize| {
            let s = sample_at(block, x * stride);
            (x as f32, mid - s * deflection, s)
        };

        let mut prev = point(0);
        for x in 1..width {
            let cur = point(x);
            let local = prev.2.abs() + cur.2.abs();
            let color = ctx.color(local, x as f32 / width as f32);
            frame.line((prev.0, prev.1), (cur.0, cur.1), color, 1.0, self.params.line_width);
            prev = cur;
        }
    }
}
