//! Software canvas that designs paint onto.
//!
//! A [`Frame`] is a top-down, packed RGB24 buffer (3 bytes per pixel), the
//! same layout the encoder reads as `rgb24` rawvideo. Drawing is clipped to
//! the frame and alpha-blended; nothing here can index out of bounds.

use std::f32::consts::TAU;
use std::path::Path;

use image::{ImageResult, Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

/// 2x3 affine transform applied to the points of lines, polylines and
/// circle centers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    tx: f32,
    ty: f32,
}

impl Affine {
    pub const IDENTITY: Affine = Affine { a: 1.0, b: 0.0, c: 0.0, d: 1.0, tx: 0.0, ty: 0.0 };

    /// Rotation by `angle` radians around `(cx, cy)`.
    pub fn rotation_about(cx: f32, cy: f32, angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            a: cos,
            b: -sin,
            c: sin,
            d: cos,
            tx: cx - cos * cx + sin * cy,
            ty: cy - sin * cx - cos * cy,
        }
    }

    /// `other` applied after `self`.
    pub fn then(&self, other: &Affine) -> Affine {
        Affine {
            a: other.a * self.a + other.b * self.c,
            b: other.a * self.b + other.b * self.d,
            c: other.c * self.a + other.d * self.c,
            d: other.c * self.b + other.d * self.d,
            tx: other.a * self.tx + other.b * self.ty + other.tx,
            ty: other.c * self.tx + other.d * self.ty + other.ty,
        }
    }

    #[inline]
    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.b * y + self.tx,
            self.c * x + self.d * y + self.ty,
        )
    }
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// One output frame.
#[derive(Debug, Clone)]
pub struct Frame {
    image: RgbImage,
    transform: Affine,
}

impl Frame {
    /// A frame filled with `background`.
    pub fn new(width: u32, height: u32, background: Rgb<u8>) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, background),
            transform: Affine::IDENTITY,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Packed RGB24 bytes, rows top to bottom.
    pub fn as_bytes(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.image.into_raw()
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb<u8>> {
        self.image.get_pixel_checked(x, y).copied()
    }

    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> ImageResult<()> {
        self.image.save_with_format(path, image::ImageFormat::Png)
    }

    pub fn transform(&self) -> Affine {
        self.transform
    }

    pub fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
    }

    pub fn reset_transform(&mut self) {
        self.transform = Affine::IDENTITY;
    }

    /// Alpha-blend one pixel; out-of-frame coordinates are ignored.
    #[inline]
    pub fn blend(&mut self, x: i32, y: i32, color: Rgb<u8>, alpha: f32) {
        if x < 0 || y < 0 || alpha.is_nan() || alpha <= 0.0 {
            return;
        }
        let Some(px) = self.image.get_pixel_mut_checked(x as u32, y as u32) else {
            return;
        };
        let a = alpha.min(1.0);
        for (dst, src) in px.0.iter_mut().zip(color.0) {
            *dst = (*dst as f32 + (src as f32 - *dst as f32) * a).round() as u8;
        }
    }

    /// Axis-aligned rectangle in screen space (the transform is not applied).
    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb<u8>, alpha: f32) {
        if !(x.is_finite() && y.is_finite() && w.is_finite() && h.is_finite()) {
            return;
        }
        let (x0, x1) = (x.min(x + w), x.max(x + w));
        let (y0, y1) = (y.min(y + h), y.max(y + h));
        let x0 = x0.round().max(0.0) as i64;
        let y0 = y0.round().max(0.0) as i64;
        let x1 = (x1.round() as i64).min(self.width() as i64);
        let y1 = (y1.round() as i64).min(self.height() as i64);
        if x1 <= x0 || y1 <= y0 {
            return;
        }
        if alpha >= 1.0 {
            let rect = Rect::at(x0 as i32, y0 as i32).of_size((x1 - x0) as u32, (y1 - y0) as u32);
            draw_filled_rect_mut(&mut self.image, rect, color);
            return;
        }
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend(px as i32, py as i32, color, alpha);
            }
        }
    }

    /// Line segment with the current transform applied.
    pub fn line(&mut self, from: (f32, f32), to: (f32, f32), color: Rgb<u8>, alpha: f32, thickness: f32) {
        let a = self.transform.apply(from.0, from.1);
        let b = self.transform.apply(to.0, to.1);
        self.raw_line(a, b, color, alpha, thickness);
    }

    /// Connected segments through `points`, optionally closing the loop.
    pub fn polyline(&mut self, points: &[(f32, f32)], closed: bool, color: Rgb<u8>, alpha: f32, thickness: f32) {
        for pair in points.windows(2) {
            self.line(pair[0], pair[1], color, alpha, thickness);
        }
        if closed && points.len() > 2 {
            self.line(points[points.len() - 1], points[0], color, alpha, thickness);
        }
    }

    /// Circle outline.
    pub fn circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgb<u8>, alpha: f32, thickness: f32) {
        if !(radius.is_finite() && radius > 0.0) {
            return;
        }
        let segments = ((radius * TAU / 3.0).ceil() as usize).clamp(12, 720);
        let points: Vec<(f32, f32)> = (0..segments)
            .map(|i| {
                let angle = i as f32 / segments as f32 * TAU;
                (cx + radius * angle.cos(), cy + radius * angle.sin())
            })
            .collect();
        self.polyline(&points, true, color, alpha, thickness);
    }

    /// Filled disc; the transform moves the center.
    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgb<u8>, alpha: f32) {
        let (cx, cy) = self.transform.apply(cx, cy);
        self.disc(cx, cy, radius, color, alpha);
    }

    /// Column `x` from `top` down to the bottom edge, alpha ramping from
    /// `alpha_top` to `alpha_bottom`.
    pub fn fill_to_bottom(&mut self, x: i32, top: f32, color: Rgb<u8>, alpha_top: f32, alpha_bottom: f32) {
        if x < 0 || x >= self.width() as i32 || !top.is_finite() {
            return;
        }
        let height = self.height() as f32;
        let span = (height - top).max(1.0);
        let start = top.max(0.0).round() as i32;
        for y in start..self.height() as i32 {
            let t = (y as f32 - top) / span;
            self.blend(x, y, color, alpha_top + (alpha_bottom - alpha_top) * t);
        }
    }

    fn disc(&mut self, cx: f32, cy: f32, radius: f32, color: Rgb<u8>, alpha: f32) {
        if !(cx.is_finite() && cy.is_finite() && radius.is_finite()) || radius <= 0.0 {
            return;
        }
        let r2 = radius * radius;
        let x0 = (cx - radius).floor().max(0.0) as i64;
        let y0 = (cy - radius).floor().max(0.0) as i64;
        let x1 = ((cx + radius).ceil() as i64).min(self.width() as i64 - 1);
        let y1 = ((cy + radius).ceil() as i64).min(self.height() as i64 - 1);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f32 - cx;
                let dy = y as f32 - cy;
                if dx * dx + dy * dy <= r2 {
                    self.blend(x as i32, y as i32, color, alpha);
                }
            }
        }
    }

    fn raw_line(&mut self, a: (f32, f32), b: (f32, f32), color: Rgb<u8>, alpha: f32, thickness: f32) {
        let pad = thickness.max(1.0);
        let bounds = (-pad, -pad, self.width() as f32 + pad, self.height() as f32 + pad);
        let Some((a, b)) = clip_segment(a, b, bounds) else {
            return;
        };

        let (dx, dy) = (b.0 - a.0, b.1 - a.1);
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;
        let half = thickness * 0.5;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let (x, y) = (a.0 + dx * t, a.1 + dy * t);
            if half <= 0.75 {
                self.blend(x.round() as i32, y.round() as i32, color, alpha);
            } else {
                self.disc(x, y, half, color, alpha);
            }
        }
    }
}

/// Liang–Barsky clip of a segment to `(min_x, min_y, max_x, max_y)`.
fn clip_segment(
    a: (f32, f32),
    b: (f32, f32),
    (min_x, min_y, max_x, max_y): (f32, f32, f32, f32),
) -> Option<((f32, f32), (f32, f32))> {
    if !(a.0.is_finite() && a.1.is_finite() && b.0.is_finite() && b.1.is_finite()) {
        return None;
    }
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let mut t0 = 0.0f32;
    let mut t1 = 1.0f32;
    for (p, q) in [
        (-dx, a.0 - min_x),
        (dx, max_x - a.0),
        (-dy, a.1 - min_y),
        (dy, max_y - a.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }
    Some((
        (a.0 + dx * t0, a.1 + dy * t0),
        (a.0 + dx * t1, a.1 + dy * t1),
    ))
}
