use image::{Rgba as Pixel, RgbaImage};

use crate::geometry::{Point, Shape};
use crate::gradient::Gradient;
use crate::models::Rgba;

pub const DEFAULT_SUPERSAMPLE: u32 = 4;
pub const MAX_SUPERSAMPLE: u32 = 16;

/// What a shape gets filled with.
pub enum Paint<'a> {
    Solid(Rgba),
    /// Gradient projected onto the axis `from -> to`.
    Linear { gradient: &'a Gradient, from: Point, to: Point },
}

impl Paint<'_> {
    fn color_at(&self, x: f32, y: f32) -> Rgba {
        match self {
            Paint::Solid(c) => *c,
            Paint::Linear { gradient, from, to } => {
                let (ax, ay) = (to.0 - from.0, to.1 - from.1);
                let len_sq = ax * ax + ay * ay;
                let t = if len_sq > 0.0 { ((x - from.0) * ax + (y - from.1) * ay) / len_sq } else { 0.0 };
                gradient.sample(t)
            }
        }
    }
}

/// Square RGBA surface, transparent on creation. Shapes are rasterised with
/// `samples × samples` points per pixel and composited source-over.
pub struct Canvas {
    img: RgbaImage,
    samples: u32,
}

impl Canvas {
    pub fn new(size: u32, samples: u32) -> Self {
        Self {
            img: RgbaImage::new(size, size),
            samples: samples.clamp(1, MAX_SUPERSAMPLE),
        }
    }

    pub fn size(&self) -> u32 {
        self.img.width()
    }

    pub fn fill(&mut self, shape: &dyn Shape, paint: &Paint) {
        let b = shape.bounds();
        if b.is_empty() {
            return;
        }
        let (w, h) = self.img.dimensions();
        let x_start = b.min_x.floor().max(0.0) as u32;
        let y_start = b.min_y.floor().max(0.0) as u32;
        let x_end = (b.max_x.ceil().max(0.0) as u32).min(w);
        let y_end = (b.max_y.ceil().max(0.0) as u32).min(h);

        let n = self.samples;
        let step = 1.0 / n as f32;
        let total = (n * n) as f32;

        for y in y_start..y_end {
            for x in x_start..x_end {
                let mut hits = 0u32;
                for j in 0..n {
                    let sy = y as f32 + (j as f32 + 0.5) * step;
                    for i in 0..n {
                        let sx = x as f32 + (i as f32 + 0.5) * step;
                        if shape.contains(sx, sy) {
                            hits += 1;
                        }
                    }
                }
                if hits == 0 {
                    continue;
                }
                let color = paint.color_at(x as f32 + 0.5, y as f32 + 0.5);
                let px = self.img.get_pixel_mut(x, y);
                *px = blend_over(*px, color, hits as f32 / total);
            }
        }
    }

    pub fn into_image(self) -> RgbaImage {
        self.img
    }
}

/// Source-over on straight alpha, with `coverage` scaling the source alpha.
fn blend_over(dst: Pixel<u8>, src: Rgba, coverage: f32) -> Pixel<u8> {
    let sa = src.alpha() as f32 / 255.0 * coverage;
    if sa <= 0.0 {
        return dst;
    }
    let da = dst.0[3] as f32 / 255.0;
    let oa = sa + da * (1.0 - sa);
    if oa <= 0.0 {
        return Pixel([0, 0, 0, 0]);
    }
    let mut out = [0u8; 4];
    for i in 0..3 {
        let s = src.0[i] as f32;
        let d = dst.0[i] as f32;
        out[i] = ((s * sa + d * da * (1.0 - sa)) / oa).round().clamp(0.0, 255.0) as u8;
    }
    out[3] = (oa * 255.0).round().clamp(0.0, 255.0) as u8;
    Pixel(out)
}
