use image::RgbaImage;

use crate::canvas::{Canvas, Paint};
use crate::error::IconError;
use crate::geometry::{cubic_bezier, ArcStroke, Circle, Outline, Point, Polygon, Ring, RoundedRect};
use crate::gradient::Gradient;
use crate::models::{Style, TentacleSpec, Vec2, MAX_ICON_SIZE};

/// Draw the app icon (gradient-bordered rounded square with the octopus) at `size` pixels.
pub fn generate_icon(size: u32, style: &Style, samples: u32) -> Result<RgbaImage, IconError> {
    if size == 0 || size > MAX_ICON_SIZE {
        return Err(IconError::InvalidSize(size));
    }
    style.validate()?;
    let gradient = Gradient::new(style.gradient.clone())?;
    let mut canvas = Canvas::new(size, samples);
    let s = size as f32;

    // Border: gradient square, then the white inset on top of it.
    let radius = style.corner_radius * s;
    let border = style.border_width * s;
    let outer = RoundedRect::inset_square(s, 0.0, radius);
    canvas.fill(&outer, &Paint::Linear { gradient: &gradient, from: (0.0, 0.0), to: (s, s) });
    let inner = RoundedRect::inset_square(s, border, radius);
    canvas.fill(&inner, &Paint::Solid(style.background));

    let octopus = Octopus {
        cx: s * 0.5,
        cy: s * 0.5,
        scale: style.creature_scale * s,
        outline_px: (style.outline_width * s).max(1.0),
        style,
    };
    octopus.draw(&mut canvas);

    Ok(canvas.into_image())
}

struct Octopus<'a> {
    cx: f32,
    cy: f32,
    scale: f32,
    outline_px: f32,
    style: &'a Style,
}

impl Octopus<'_> {
    fn at(&self, v: Vec2) -> Point {
        (self.cx + v.0 * self.scale, self.cy + v.1 * self.scale)
    }

    fn draw(&self, canvas: &mut Canvas) {
        let st = self.style;
        let fill = Paint::Solid(st.body_fill);
        let line = Paint::Solid(st.outline);

        for limb in &st.tentacles {
            let points = self.tentacle_outline(limb);
            canvas.fill(&Polygon { points: points.clone() }, &fill);
            canvas.fill(&Outline { points, width: self.outline_px }, &line);
        }

        let (bx, by) = self.at(st.body_offset);
        let body = Circle { cx: bx, cy: by, r: st.body_radius * self.scale };
        canvas.fill(&body, &fill);
        canvas.fill(&Ring { circle: body, width: self.outline_px }, &line);

        let accent_fill = Paint::Solid(st.accent_fill);
        let accent_line = (self.outline_px * 0.5).max(1.0);
        for accent in &st.accents {
            let (ax, ay) = self.at(accent.offset);
            let dot = Circle { cx: ax, cy: ay, r: accent.radius * self.scale };
            canvas.fill(&dot, &accent_fill);
            canvas.fill(&Ring { circle: dot, width: accent_line }, &line);
        }

        for &eye in &st.eyes {
            let (ex, ey) = self.at(eye);
            canvas.fill(&Circle { cx: ex, cy: ey, r: st.eye_radius * self.scale }, &line);
        }

        let smile = &st.smile;
        let (sx, sy) = self.at(smile.center);
        let arc = ArcStroke {
            circle: Circle { cx: sx, cy: sy, r: smile.radius * self.scale },
            width: smile.width * self.scale,
            start: smile.start_deg.to_radians(),
            end: smile.end_deg.to_radians(),
        };
        canvas.fill(&arc, &line);
    }

    /// Closed outline of a tapering limb: the Bezier offset left on the way out
    /// and right on the way back.
    fn tentacle_outline(&self, limb: &TentacleSpec) -> Vec<Point> {
        let st = self.style;
        let n = st.tentacle_samples.max(2);
        let (p0, p1, p2, p3) = (self.at(limb.start), self.at(limb.control1), self.at(limb.control2), self.at(limb.end));
        let sample = |i: usize| {
            let t = i as f32 / (n - 1) as f32;
            let (x, y) = cubic_bezier(p0, p1, p2, p3, t);
            let half = st.tentacle_width * self.scale * (1.0 - st.tentacle_taper * t) * 0.5;
            (x, y, half)
        };

        let mut points = Vec::with_capacity(n * 2);
        points.extend((0..n).map(sample).map(|(x, y, half)| (x - half, y)));
        points.extend((0..n).rev().map(sample).map(|(x, y, half)| (x + half, y)));
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::DEFAULT_SUPERSAMPLE;
    use crate::models::MAX_TENTACLE_SAMPLES;

    fn icon(size: u32) -> RgbaImage {
        generate_icon(size, &Style::default(), DEFAULT_SUPERSAMPLE).unwrap()
    }

    #[test]
    fn dimensions_match_request() {
        for size in [16, 32, 64, 128] {
            let img = icon(size);
            assert_eq!(img.dimensions(), (size, size));
        }
    }

    #[test]
    fn zero_size_is_rejected() {
        assert!(matches!(
            generate_icon(0, &Style::default(), 1),
            Err(IconError::InvalidSize(0))
        ));
        assert!(matches!(
            generate_icon(MAX_ICON_SIZE + 1, &Style::default(), 1),
            Err(IconError::InvalidSize(_))
        ));
        let bad = Style { tentacle_samples: MAX_TENTACLE_SAMPLES + 1, ..Style::default() };
        assert!(matches!(generate_icon(16, &bad, 1), Err(IconError::InvalidStyle(_))));
    }

    #[test]
    fn border_band_is_opaque_gradient_and_corners_transparent() {
        let img = icon(256);
        // Middle of the top border band, near the top-left end of the gradient.
        let top = img.get_pixel(128, 4).0;
        assert_eq!(top[3], 255);
        assert_ne!(&top[..3], &[255, 255, 255]);
        // Extreme corner lies outside the rounded square.
        assert_eq!(img.get_pixel(0, 0).0[3], 0);
        assert_eq!(img.get_pixel(255, 255).0[3], 0);
    }

    #[test]
    fn interior_away_from_creature_is_white() {
        let img = icon(256);
        assert_eq!(img.get_pixel(40, 40).0, [255, 255, 255, 255]);
        assert_eq!(img.get_pixel(215, 40).0, [255, 255, 255, 255]);
    }

    #[test]
    fn creature_body_is_sage_green() {
        let img = icon(256);
        // Right of the smile, level with the canvas centre: lower half of the body.
        let s = 256.0 * 0.35;
        let px = img.get_pixel(128 + (0.15 * s) as u32, 128).0;
        assert_eq!(px, [140, 166, 140, 255]);
    }

    #[test]
    fn rendering_is_deterministic() {
        assert_eq!(icon(64).as_raw(), icon(64).as_raw());
    }

    #[test]
    fn smallest_size_is_not_empty() {
        let img = icon(16);
        assert!(img.pixels().any(|p| p.0[3] > 0));
    }

    #[test]
    fn tentacle_outline_is_closed_and_tapers() {
        let style = Style::default();
        let o = Octopus { cx: 0.0, cy: 0.0, scale: 100.0, outline_px: 1.0, style: &style };
        let pts = o.tentacle_outline(&style.tentacles[0]);
        assert_eq!(pts.len(), 42);
        let base = pts[41].0 - pts[0].0;
        let tip = pts[21].0 - pts[20].0;
        assert!((base - 8.0).abs() < 1e-3);
        assert!((tip - 4.0).abs() < 1e-3);
    }
}
