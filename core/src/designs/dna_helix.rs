//! DNA helix visualization design.
//!
//! Two strands half a turn apart run down the frame. Their radius breathes
//! with the local amplitude and a slow phase; rungs join them every few
//! points and the far side of each strand is drawn dimmer.

use std::f32::consts::{PI, TAU};

use super::{strided, Design, DesignType, DnaHelixParams};
use crate::canvas::Frame;
use crate::context::AnalysisContext;

pub struct DnaHelixDesign {
    params: DnaHelixParams,
}

impl DnaHelixDesign {
    pub fn new(params: DnaHelixParams) -> Self {
        Self { params }
    }
}

/// One point of both strands: x positions and a depth term in `[-1, 1]`.
#[derive(Clone, Copy)]
struct Rung {
    y: f32,
    left: f32,
    right: f32,
    depth: f32,
    amp: f32,
}

impl Design for DnaHelixDesign {
    fn design_type(&self) -> DesignType {
        DesignType::DnaHelix
    }

    fn render(&mut self, ctx: &mut AnalysisContext, block: &[f32], frame: &mut Frame) {
        let points = self.params.points;
        if block.is_empty() || points < 2 {
            return;
        }

        let (cx, _) = ctx.center();
        let height = frame.height() as f32;
        let time = ctx.state.frame() as f32 * self.params.speed;
        let breathe = 0.8 + 0.2 * (time * 0.5).sin();
        let base = frame.width() as f32 * self.params.radius;

        let rung = |i: usize| {
            let t = i as f32 / (points - 1) as f32;
            let phase = time + t * self.params.twists * TAU;
            let amp = strided(block, i, points).abs();
            let radius = base * (breathe + amp);
            Rung {
                y: t * height,
                left: cx + radius * phase.sin(),
                right: cx + radius * (phase + PI).sin(),
                depth: phase.cos(),
                amp,
            }
        };

        let mut prev = rung(0);
        for i in 1..points {
            let cur = rung(i);
            let t = i as f32 / points as f32;
            let front = 0.55 + 0.45 * cur.depth;
            let back = 0.55 - 0.45 * cur.depth;

            let color_a = ctx.color(cur.amp * 2.0 + 0.3, t);
            let color_b = ctx.color(cur.amp * 2.0 + 0.3, 1.0 - t);
            frame.line((prev.left, prev.y), (cur.left, cur.y), color_a, front, self.params.line_width);
            frame.line((prev.right, prev.y), (cur.right, cur.y), color_b, back, self.params.line_width);

            let every = self.params.connect_every;
            if every > 0 && i % every == 0 {
                let rung_color = ctx.color(cur.amp * 3.0, 0.5);
                frame.line((cur.left, cur.y), (cur.right, cur.y), rung_color, 0.45, 1.0);
                frame.fill_circle(cur.left, cur.y, self.params.line_width * 1.5, color_a, front);
                frame.fill_circle(cur.right, cur.y, self.params.line_width * 1.5, color_b, back);
            }
            prev = cur;
        }
    }
}
