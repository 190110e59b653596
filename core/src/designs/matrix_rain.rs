//! Matrix rain visualization design.
//!
//! Glyph trails fall down a grid of columns. A free column starts a new
//! trail with a probability that rises with bass. Glyphs are 3×5 bitmaps
//! that flicker as the trail moves.

use rand::Rng;

use super::{environment, Design, DesignType, MatrixRainParams};
use crate::canvas::Frame;
use crate::context::AnalysisContext;
use crate::physics::{Pool, RainDrop};
use image::Rgb;

const GLYPH_COLS: u32 = 3;
const GLYPH_ROWS: u32 = 5;

pub struct MatrixRainDesign {
    params: MatrixRainParams,
    pool: Pool<RainDrop>,
    occupied: Vec<bool>,
}

impl MatrixRainDesign {
    pub fn new(params: MatrixRainParams) -> Self {
        let pool = Pool::new(params.max_drops);
        Self {
            params,
            pool,
            occupied: Vec::new(),
        }
    }

    pub fn pool(&self) -> &Pool<RainDrop> {
        &self.pool
    }

    fn spawn(&mut self, ctx: &mut AnalysisContext, columns: u32, cell: f32) {
        self.occupied.clear();
        self.occupied.resize(columns as usize, false);
        for trail in self.pool.iter() {
            // A column frees up once its trail has fully entered the frame.
            if trail.y < trail.length as f32 * cell {
                if let Some(slot) = self.occupied.get_mut(trail.column as usize) {
                    *slot = true;
                }
            }
        }

        let chance = (self.params.spawn_chance + self.params.bass_weight * ctx.signals().bass).clamp(0.0, 1.0);
        let (min_trail, max_trail) = (
            self.params.min_trail.max(1),
            self.params.max_trail.max(self.params.min_trail.max(1)),
        );
        for column in 0..columns {
            if self.occupied[column as usize] || self.pool.room() == 0 {
                continue;
            }
            if ctx.rng.random::<f32>() >= chance {
                continue;
            }
            let speed = cell * self.params.speed * ctx.rng.random_range(0.6f32..1.6);
            let length = ctx.rng.random_range(min_trail..=max_trail);
            let seed = ctx.rng.random::<u32>();
            self.pool.spawn(RainDrop { column, y: 0.0, speed, length, cell, seed });
        }
    }
}

/// Draw a 3×5 glyph from the low 15 bits of `bits` into a `cell`-sized box.
fn draw_glyph(frame: &mut Frame, x: f32, y: f32, cell: f32, bits: u16, color: Rgb<u8>, alpha: f32) {
    let dot = (cell / (GLYPH_COLS + 1) as f32).max(1.0);
    let pad = (cell - dot * GLYPH_COLS as f32) * 0.5;
    for row in 0..GLYPH_ROWS {
        for col in 0..GLYPH_COLS {
            if bits & (1 << (row * GLYPH_COLS + col)) != 0 {
                let px = x + pad + col as f32 * dot;
                let py = y + row as f32 * dot * 0.8;
                frame.fill_rect(px, py, dot, dot * 0.8, color, alpha);
            }
        }
    }
}

impl Design for MatrixRainDesign {
    fn design_type(&self) -> DesignType {
        DesignType::MatrixRain
    }

    fn live_entities(&self) -> usize {
        self.pool.len()
    }

    fn render(&mut self, ctx: &mut AnalysisContext, block: &[f32], frame: &mut Frame) {
        let cell = self.params.cell_size.max(4);
        let columns = frame.width() / cell;
        if block.is_empty() || columns == 0 {
            return;
        }
        let cell = cell as f32;

        self.spawn(ctx, columns, cell);
        self.pool.update(&environment(ctx));

        let height = frame.height() as f32;
        let tick = ctx.state.frame();
        for trail in self.pool.iter() {
            let x = trail.column as f32 * cell;
            let position = trail.column as f32 / columns as f32;
            for i in 0..trail.length {
                let y = trail.y - i as f32 * cell;
                if y < -cell || y > height {
                    continue;
                }
                let fade = 1.0 - i as f32 / trail.length as f32;
                let (color, alpha) = if i == 0 {
                    (Rgb([230, 255, 230]), 0.95)
                } else {
                    (ctx.color(fade, position), fade * 0.9)
                };
                draw_glyph(frame, x, y, cell, trail.glyph(i, tick), color, alpha);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorMode;

    #[test]
    fn test_rain_respects_pool_cap() {
        let params = MatrixRainParams { spawn_chance: 1.0, max_drops: 5, ..Default::default() };
        let mut design = MatrixRainDesign::new(params);
        let mut ctx = AnalysisContext::new(200, 100, ColorMode::default(), Rgb([0, 0, 0]), 9);
        let block = vec![0.2; 128];
        for _ in 0..10 {
            ctx.advance(&block);
            let mut frame = ctx.blank_frame();
            design.render(&mut ctx, &block, &mut frame);
            assert!(design.live_entities() <= 5);
        }
        assert!(design.pool().spawned() >= 5);
    }

    #[test]
    fn test_narrow_frame_is_noop() {
        let mut design = MatrixRainDesign::new(MatrixRainParams::default());
        let mut ctx = AnalysisContext::new(3, 100, ColorMode::default(), Rgb([0, 0, 0]), 9);
        let mut frame = ctx.blank_frame();
        design.render(&mut ctx, &[0.5; 64], &mut frame);
        assert_eq!(design.live_entities(), 0);
    }
}
