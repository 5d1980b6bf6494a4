use crate::error::IconError;
use crate::models::{ColorStop, Rgba};

/// Piecewise-linear colour ramp over `0..=1`.
///
/// Stops must be sorted by non-decreasing offset, start at exactly 0.0 and end at
/// exactly 1.0. Two stops sharing an offset form a hard edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    stops: Vec<ColorStop>,
}

impl Gradient {
    pub fn new(stops: Vec<ColorStop>) -> Result<Self, IconError> {
        if stops.len() < 2 {
            return Err(IconError::InvalidGradient(format!(
                "need at least two stops, got {}",
                stops.len()
            )));
        }
        for (i, s) in stops.iter().enumerate() {
            if !s.offset.is_finite() || !(0.0..=1.0).contains(&s.offset) {
                return Err(IconError::InvalidGradient(format!(
                    "stop {} has offset {} outside 0..=1",
                    i, s.offset
                )));
            }
        }
        if let Some(i) = stops.windows(2).position(|w| w[1].offset < w[0].offset) {
            return Err(IconError::InvalidGradient(format!(
                "offsets decrease between stop {} and {}",
                i,
                i + 1
            )));
        }
        let first = stops[0].offset;
        let last = stops[stops.len() - 1].offset;
        if first != 0.0 || last != 1.0 {
            return Err(IconError::InvalidGradient(format!(
                "stops must span 0..1, got {}..{}",
                first, last
            )));
        }
        Ok(Self { stops })
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Colour at `t`; values outside `0..=1` are clamped.
    pub fn sample(&self, t: f32) -> Rgba {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.offset {
                let span = b.offset - a.offset;
                if span <= f32::EPSILON {
                    return b.color;
                }
                return lerp_color(a.color, b.color, (t - a.offset) / span);
            }
        }
        self.stops[self.stops.len() - 1].color
    }
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

pub fn lerp_color(a: Rgba, b: Rgba, t: f32) -> Rgba {
    let t = t.clamp(0.0, 1.0);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = lerp(a.0[i] as f32, b.0[i] as f32, t).round().clamp(0.0, 255.0) as u8;
    }
    Rgba(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Style;

    fn two_stop() -> Gradient {
        Gradient::new(vec![
            ColorStop::new(0.0, Rgba([0, 100, 200, 255])),
            ColorStop::new(1.0, Rgba([200, 100, 0, 255])),
        ])
        .unwrap()
    }

    #[test]
    fn endpoints_and_midpoint() {
        let g = two_stop();
        assert_eq!(g.sample(0.0), Rgba([0, 100, 200, 255]));
        assert_eq!(g.sample(1.0), Rgba([200, 100, 0, 255]));
        assert_eq!(g.sample(0.5), Rgba([100, 100, 100, 255]));
    }

    #[test]
    fn out_of_range_is_clamped() {
        let g = two_stop();
        assert_eq!(g.sample(-3.0), g.sample(0.0));
        assert_eq!(g.sample(7.5), g.sample(1.0));
        assert_eq!(g.sample(f32::NAN), g.sample(0.0));
    }

    #[test]
    fn samples_never_overshoot_adjacent_stops() {
        let g = Gradient::new(Style::default().gradient).unwrap();
        for pair in g.stops().windows(2) {
            let (a, b) = (pair[0], pair[1]);
            for k in 0..=50 {
                let t = a.offset + (b.offset - a.offset) * k as f32 / 50.0;
                let c = g.sample(t);
                for ch in 0..4 {
                    let lo = a.color.0[ch].min(b.color.0[ch]);
                    let hi = a.color.0[ch].max(b.color.0[ch]);
                    assert!(c.0[ch] >= lo && c.0[ch] <= hi, "t={} ch={} got {}", t, ch, c.0[ch]);
                }
            }
        }
    }

    #[test]
    fn hard_edge_on_duplicate_offset() {
        let g = Gradient::new(vec![
            ColorStop::new(0.0, Rgba([0, 0, 0, 255])),
            ColorStop::new(0.5, Rgba([0, 0, 0, 255])),
            ColorStop::new(0.5, Rgba([255, 255, 255, 255])),
            ColorStop::new(1.0, Rgba([255, 255, 255, 255])),
        ])
        .unwrap();
        assert_eq!(g.sample(0.49), Rgba([0, 0, 0, 255]));
        assert_eq!(g.sample(0.51), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn rejects_malformed_stop_lists() {
        let c = Rgba::WHITE;
        assert!(Gradient::new(vec![]).is_err());
        assert!(Gradient::new(vec![ColorStop::new(0.0, c)]).is_err());
        assert!(Gradient::new(vec![ColorStop::new(0.0, c), ColorStop::new(0.9, c)]).is_err());
        assert!(Gradient::new(vec![ColorStop::new(0.1, c), ColorStop::new(1.0, c)]).is_err());
        assert!(Gradient::new(vec![
            ColorStop::new(0.0, c),
            ColorStop::new(0.6, c),
            ColorStop::new(0.4, c),
            ColorStop::new(1.0, c),
        ])
        .is_err());
        assert!(Gradient::new(vec![ColorStop::new(0.0, c), ColorStop::new(1.5, c)]).is_err());
    }
}
