//! Falling glyph trails for the matrix rain design.

use super::{Entity, Environment};

/// Head of a falling glyph trail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RainDrop {
    /// Column index into the glyph grid.
    pub column: u32,
    /// Head position in pixels.
    pub y: f32,
    /// Fall speed in pixels per frame before the bass boost.
    pub speed: f32,
    /// Trail length in cells.
    pub length: u32,
    /// Cell height in pixels.
    pub cell: f32,
    /// Seed for the glyphs along this trail.
    pub seed: u32,
}

impl RainDrop {
    /// Glyph bitmap for trail cell `i` at `frame`. Glyphs flicker every few frames.
    pub fn glyph(&self, i: u32, frame: u64) -> u16 {
        let mut h = self
            .seed
            .wrapping_add(i.wrapping_mul(0x9e37_79b9))
            .wrapping_add((frame / 4) as u32);
        h ^= h >> 15;
        h = h.wrapping_mul(0x2c1b_3c6d);
        h ^= h >> 12;
        (h & 0x7fff) as u16
    }
}

impl Entity for RainDrop {
    fn update(&mut self, env: &Environment) -> bool {
        self.y += self.speed * (1.0 + env.bass * 0.5);
        let tail = self.y - self.length as f32 * self.cell;
        tail <= env.height + env.margin
    }
}
