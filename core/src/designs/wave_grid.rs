//! 3D wave grid visualization design.
//!
//! Each history block becomes one grid row, downsampled to a fixed column
//! count. The newest row sits in front and older rows recede toward a
//! horizon under a simple perspective divide. Rows are joined column-wise
//! so the surface reads as a mesh.

use super::{downsample_into, Design, DesignType, WaveGridParams};
use crate::audio::HISTORY_CAPACITY;
use crate::canvas::Frame;
use crate::context::AnalysisContext;

const MAX_COLUMNS: usize = 256;

pub struct WaveGridDesign {
    params: WaveGridParams,
    samples: Vec<f32>,
    rows: Vec<Vec<(f32, f32)>>,
}

impl WaveGridDesign {
    pub fn new(params: WaveGridParams) -> Self {
        Self {
            params,
            samples: Vec::new(),
            rows: Vec::new(),
        }
    }
}

/// Screen projection for grid space: `u` across in `[0, 1]`, `depth` from
/// 0 (front) to 1 (back), `lift` up in pixels at the front row.
struct Projection {
    width: f32,
    horizon: f32,
    front: f32,
    strength: f32,
}

impl Projection {
    fn scale(&self, depth: f32) -> f32 {
        1.0 / (1.0 + depth * self.strength)
    }

    fn project(&self, u: f32, depth: f32, lift: f32) -> (f32, f32) {
        let s = self.scale(depth);
        let x = self.width * 0.5 + (u - 0.5) * self.width * 0.9 * s;
        let y = self.horizon + (self.front - self.horizon) * s - lift * s;
        (x, y)
    }
}

impl Design for WaveGridDesign {
    fn design_type(&self) -> DesignType {
        DesignType::WaveGrid
    }

    fn render(&mut self, ctx: &mut AnalysisContext, block: &[f32], frame: &mut Frame) {
        let history = ctx.state.history();
        let rows = self.params.rows.min(HISTORY_CAPACITY).min(history.len());
        let columns = self.params.columns.min(MAX_COLUMNS);
        if block.is_empty() || rows == 0 || columns < 2 {
            return;
        }

        let height = frame.height() as f32;
        let projection = Projection {
            width: frame.width() as f32,
            horizon: height * 0.3,
            front: height * 0.88,
            strength: self.params.perspective.max(0.0),
        };
        let lift = self.params.height_scale * height;
        let depth_step = 1.0 / rows.max(2).saturating_sub(1) as f32;

        self.samples.resize(columns, 0.0);
        self.rows.resize_with(rows, Vec::new);
        for (r, past) in history.recent(rows).enumerate() {
            downsample_into(past, &mut self.samples);
            let depth = r as f32 * depth_step;
            let row = &mut self.rows[r];
            row.clear();
            row.extend(self.samples.iter().enumerate().map(|(c, &s)| {
                let u = c as f32 / (columns - 1) as f32;
                projection.project(u, depth, s * lift)
            }));
        }

        // Back to front so nearer rows paint over farther ones.
        for r in (0..rows).rev() {
            let depth = r as f32 * depth_step;
            let alpha = 1.0 - depth * 0.75;
            let width = self.params.line_width * projection.scale(depth);
            for c in 0..columns {
                let position = c as f32 / columns as f32;
                let color = ctx.color(1.0 - depth, position);
                let here = self.rows[r][c];
                if c + 1 < columns {
                    frame.line(here, self.rows[r][c + 1], color, alpha, width);
                }
                if r + 1 < rows {
                    frame.line(here, self.rows[r + 1][c], color, alpha * 0.5, width);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_recedes() {
        let p = Projection { width: 100.0, horizon: 30.0, front: 90.0, strength: 2.0 };
        let (_, near) = p.project(0.5, 0.0, 0.0);
        let (_, far) = p.project(0.5, 1.0, 0.0);
        assert_eq!(near, 90.0);
        assert!(far < near && far > 30.0);

        let (left_near, _) = p.project(0.0, 0.0, 0.0);
        let (left_far, _) = p.project(0.0, 1.0, 0.0);
        assert!(left_far > left_near);
    }
}
