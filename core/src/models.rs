use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::IconError;
use crate::gradient::Gradient;

/// 8-bit RGBA colour. Style files may give it as `[r, g, b, a]` bytes,
/// as `[r, g, b, a]` floats in `0..=1`, or as a `#rrggbb` / `#rrggbbaa` hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ColorRepr", into = "[u8; 4]")]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba([0, 0, 0, 0]);
    pub const WHITE: Rgba = Rgba([255, 255, 255, 255]);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Rgba([r, g, b, 255])
    }

    pub fn alpha(self) -> u8 {
        self.0[3]
    }
}

impl From<Rgba> for [u8; 4] {
    fn from(c: Rgba) -> Self {
        c.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Bytes([u8; 4]),
    Unit([f32; 4]),
    Hex(String),
}

impl TryFrom<ColorRepr> for Rgba {
    type Error = String;

    fn try_from(repr: ColorRepr) -> Result<Self, Self::Error> {
        match repr {
            ColorRepr::Bytes(b) => Ok(Rgba(b)),
            ColorRepr::Unit(f) => {
                let mut out = [0u8; 4];
                for (o, v) in out.iter_mut().zip(f) {
                    if !(0.0..=1.0).contains(&v) {
                        return Err(format!("colour channel {} outside 0..=1", v));
                    }
                    *o = (v * 255.0).round() as u8;
                }
                Ok(Rgba(out))
            }
            ColorRepr::Hex(s) => parse_hex(&s).ok_or_else(|| format!("bad hex colour '{}'", s)),
        }
    }
}

fn parse_hex(s: &str) -> Option<Rgba> {
    let hex = s.trim().trim_start_matches('#');
    if !hex.is_ascii() || (hex.len() != 6 && hex.len() != 8) {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let a = if hex.len() == 8 { byte(6)? } else { 255 };
    Some(Rgba([byte(0)?, byte(2)?, byte(4)?, a]))
}

/// Largest square edge, in pixels, the renderer accepts.
pub const MAX_ICON_SIZE: u32 = 8192;
pub const MAX_TENTACLE_SAMPLES: usize = 1024;

/// 2-D offset, in fractions of the creature scale relative to its centre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec2(pub f32, pub f32);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Rgba,
}

impl ColorStop {
    pub const fn new(offset: f32, color: Rgba) -> Self {
        Self { offset, color }
    }
}

/// One limb: a cubic Bezier from `start` to `end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TentacleSpec {
    pub start: Vec2,
    pub control1: Vec2,
    pub control2: Vec2,
    pub end: Vec2,
}

impl TentacleSpec {
    pub const fn new(start: Vec2, control1: Vec2, control2: Vec2, end: Vec2) -> Self {
        Self { start, control1, control2, end }
    }
}

/// Decorative dot on a tentacle base.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Accent {
    pub offset: Vec2,
    pub radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Smile {
    pub center: Vec2,
    pub radius: f32,
    pub width: f32,
    /// Degrees, clockwise from 3 o'clock (y grows downwards).
    pub start_deg: f32,
    pub end_deg: f32,
}

/// Visual style table. Canvas-level proportions (`corner_radius`, `border_width`,
/// `creature_scale`, `outline_width`) are fractions of the canvas size; everything
/// describing the creature is a fraction of the creature scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    pub gradient: Vec<ColorStop>,
    pub corner_radius: f32,
    pub border_width: f32,
    pub background: Rgba,
    pub creature_scale: f32,
    pub outline_width: f32,
    pub body_fill: Rgba,
    pub outline: Rgba,
    pub accent_fill: Rgba,
    pub tentacle_width: f32,
    pub tentacle_taper: f32,
    pub tentacle_samples: usize,
    pub tentacles: Vec<TentacleSpec>,
    pub body_radius: f32,
    pub body_offset: Vec2,
    pub accents: Vec<Accent>,
    pub eye_radius: f32,
    pub eyes: Vec<Vec2>,
    pub smile: Smile,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            gradient: vec![
                ColorStop::new(0.0, Rgba::rgb(0xe8, 0x63, 0xb8)),  // pink
                ColorStop::new(0.25, Rgba::rgb(0x87, 0x9e, 0xe4)), // blue
                ColorStop::new(0.5, Rgba::rgb(0x6b, 0xc0, 0xd1)),  // teal
                ColorStop::new(0.75, Rgba::rgb(0x8c, 0xd1, 0xb0)), // light green
                ColorStop::new(1.0, Rgba::rgb(0xf0, 0xb0, 0x6b)),  // yellow/orange
            ],
            corner_radius: 0.15,
            border_width: 0.04,
            background: Rgba::WHITE,
            creature_scale: 0.35,
            outline_width: 2.0 / 1024.0,
            body_fill: Rgba::rgb(140, 166, 140),
            outline: Rgba::rgb(51, 77, 64),
            accent_fill: Rgba::rgb(230, 191, 102),
            tentacle_width: 0.08,
            tentacle_taper: 0.5,
            tentacle_samples: 21,
            tentacles: vec![
                TentacleSpec::new(Vec2(-0.3, 0.1), Vec2(-0.35, 0.25), Vec2(-0.38, 0.35), Vec2(-0.4, 0.4)),
                TentacleSpec::new(Vec2(-0.15, 0.05), Vec2(-0.18, 0.2), Vec2(-0.19, 0.3), Vec2(-0.2, 0.35)),
                TentacleSpec::new(Vec2(0.15, 0.05), Vec2(0.18, 0.2), Vec2(0.19, 0.3), Vec2(0.2, 0.35)),
                TentacleSpec::new(Vec2(0.3, 0.1), Vec2(0.35, 0.25), Vec2(0.38, 0.35), Vec2(0.4, 0.4)),
                TentacleSpec::new(Vec2(0.0, 0.15), Vec2(0.02, 0.3), Vec2(0.01, 0.4), Vec2(0.0, 0.45)),
            ],
            body_radius: 0.25,
            body_offset: Vec2(0.0, -0.1),
            accents: vec![
                Accent { offset: Vec2(-0.35, 0.25), radius: 0.06 },
                Accent { offset: Vec2(-0.18, 0.22), radius: 0.05 },
                Accent { offset: Vec2(0.18, 0.22), radius: 0.05 },
                Accent { offset: Vec2(0.35, 0.25), radius: 0.06 },
                Accent { offset: Vec2(0.0, 0.32), radius: 0.05 },
            ],
            eye_radius: 0.02,
            eyes: vec![Vec2(-0.08, -0.12), Vec2(0.08, -0.12)],
            smile: Smile {
                center: Vec2(0.0, -0.08),
                radius: 0.08,
                width: 0.015,
                start_deg: 0.0,
                end_deg: 180.0,
            },
        }
    }
}

impl Style {
    /// Load a (possibly partial) style from JSON; missing keys keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Style, IconError> {
        let s = fs::read_to_string(path).map_err(|e| IconError::io(path, e))?;
        Style::from_json_str(&s)
    }

    pub fn from_json_str(s: &str) -> Result<Style, IconError> {
        let style: Style = serde_json::from_str(s)?;
        style.validate()?;
        Ok(style)
    }

    pub fn validate(&self) -> Result<(), IconError> {
        Gradient::new(self.gradient.clone())?;
        let fractions = [
            ("creature_scale", self.creature_scale),
            ("tentacle_width", self.tentacle_width),
            ("body_radius", self.body_radius),
            ("eye_radius", self.eye_radius),
        ];
        for (name, v) in fractions {
            if !v.is_finite() || v <= 0.0 {
                return Err(IconError::InvalidStyle(format!("{} must be positive, got {}", name, v)));
            }
        }
        if !(0.0..0.5).contains(&self.border_width) {
            return Err(IconError::InvalidStyle(format!("border_width {} outside 0..0.5", self.border_width)));
        }
        if !(0.0..=0.5).contains(&self.corner_radius) {
            return Err(IconError::InvalidStyle(format!("corner_radius {} outside 0..=0.5", self.corner_radius)));
        }
        if !(0.0..=1.0).contains(&self.tentacle_taper) {
            return Err(IconError::InvalidStyle(format!("tentacle_taper {} outside 0..=1", self.tentacle_taper)));
        }
        if !(2..=MAX_TENTACLE_SAMPLES).contains(&self.tentacle_samples) {
            return Err(IconError::InvalidStyle(format!(
                "tentacle_samples must be in 2..={}, got {}",
                MAX_TENTACLE_SAMPLES, self.tentacle_samples
            )));
        }
        if self.outline_width < 0.0 || self.smile.width < 0.0 {
            return Err(IconError::InvalidStyle("stroke widths must not be negative".into()));
        }
        Ok(())
    }
}

/// One icon to render: a square of `size` pixels written to `output_path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub size: u32,
    pub output_path: PathBuf,
}

impl RenderRequest {
    pub fn new(size: u32, output_path: impl Into<PathBuf>) -> Result<Self, IconError> {
        if size == 0 || size > MAX_ICON_SIZE {
            return Err(IconError::InvalidSize(size));
        }
        Ok(Self { size, output_path: output_path.into() })
    }
}
