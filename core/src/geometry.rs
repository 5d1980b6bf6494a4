//! Shapes the icon is built from, expressed as point-containment tests in
//! pixel space (x to the right, y downwards).

use std::f32::consts::TAU;

pub type Point = (f32, f32);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds {
    pub fn around(cx: f32, cy: f32, half: f32) -> Self {
        Self { min_x: cx - half, min_y: cy - half, max_x: cx + half, max_y: cy + half }
    }

    fn of_points(points: &[Point], pad: f32) -> Self {
        let mut b = Bounds { min_x: f32::MAX, min_y: f32::MAX, max_x: f32::MIN, max_y: f32::MIN };
        for &(x, y) in points {
            b.min_x = b.min_x.min(x);
            b.min_y = b.min_y.min(y);
            b.max_x = b.max_x.max(x);
            b.max_y = b.max_y.max(y);
        }
        b.min_x -= pad;
        b.min_y -= pad;
        b.max_x += pad;
        b.max_y += pad;
        b
    }

    pub fn is_empty(&self) -> bool {
        !(self.max_x > self.min_x && self.max_y > self.min_y)
    }
}

pub trait Shape {
    fn bounds(&self) -> Bounds;
    fn contains(&self, x: f32, y: f32) -> bool;
}

/// Axis-aligned rectangle whose corners are quarter circles of `radius`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundedRect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
    pub radius: f32,
}

impl RoundedRect {
    /// The square `0..size` shrunk by `inset` on every side; the radius shrinks with it.
    pub fn inset_square(size: f32, inset: f32, radius: f32) -> Self {
        let x0 = inset;
        let x1 = (size - inset).max(x0);
        let r = (radius - inset).max(0.0).min((x1 - x0) * 0.5);
        Self { x0, y0: x0, x1, y1: x1, radius: r }
    }
}

impl Shape for RoundedRect {
    fn bounds(&self) -> Bounds {
        Bounds { min_x: self.x0, min_y: self.y0, max_x: self.x1, max_y: self.y1 }
    }

    fn contains(&self, x: f32, y: f32) -> bool {
        if x < self.x0 || x > self.x1 || y < self.y0 || y > self.y1 {
            return false;
        }
        // Nearest point of the inner (radius-shrunk) rectangle.
        let nx = x.clamp(self.x0 + self.radius, self.x1 - self.radius);
        let ny = y.clamp(self.y0 + self.radius, self.y1 - self.radius);
        let (dx, dy) = (x - nx, y - ny);
        dx * dx + dy * dy <= self.radius * self.radius
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub cx: f32,
    pub cy: f32,
    pub r: f32,
}

impl Shape for Circle {
    fn bounds(&self) -> Bounds {
        Bounds::around(self.cx, self.cy, self.r)
    }

    fn contains(&self, x: f32, y: f32) -> bool {
        let (dx, dy) = (x - self.cx, y - self.cy);
        dx * dx + dy * dy <= self.r * self.r
    }
}

/// Outline of a circle, `width` wide and centred on the circumference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ring {
    pub circle: Circle,
    pub width: f32,
}

impl Shape for Ring {
    fn bounds(&self) -> Bounds {
        Bounds::around(self.circle.cx, self.circle.cy, self.circle.r + self.width * 0.5)
    }

    fn contains(&self, x: f32, y: f32) -> bool {
        let d = ((x - self.circle.cx).powi(2) + (y - self.circle.cy).powi(2)).sqrt();
        (d - self.circle.r).abs() <= self.width * 0.5
    }
}

/// Stroke along part of a circle, from `start` to `end` radians (clockwise on screen).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcStroke {
    pub circle: Circle,
    pub width: f32,
    pub start: f32,
    pub end: f32,
}

impl Shape for ArcStroke {
    fn bounds(&self) -> Bounds {
        Bounds::around(self.circle.cx, self.circle.cy, self.circle.r + self.width * 0.5)
    }

    fn contains(&self, x: f32, y: f32) -> bool {
        let (dx, dy) = (x - self.circle.cx, y - self.circle.cy);
        let d = (dx * dx + dy * dy).sqrt();
        if (d - self.circle.r).abs() > self.width * 0.5 {
            return false;
        }
        let sweep = (self.end - self.start).rem_euclid(TAU);
        if sweep == 0.0 && self.end != self.start {
            return true;
        }
        let a = (dy.atan2(dx) - self.start).rem_euclid(TAU);
        a <= sweep
    }
}

/// Closed polygon, filled with the non-zero winding rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub points: Vec<Point>,
}

impl Shape for Polygon {
    fn bounds(&self) -> Bounds {
        Bounds::of_points(&self.points, 0.0)
    }

    fn contains(&self, px: f32, py: f32) -> bool {
        winding_number(&self.points, px, py) != 0
    }
}

/// Stroke of `width` following a closed polygon's edges.
#[derive(Debug, Clone, PartialEq)]
pub struct Outline {
    pub points: Vec<Point>,
    pub width: f32,
}

impl Shape for Outline {
    fn bounds(&self) -> Bounds {
        Bounds::of_points(&self.points, self.width * 0.5)
    }

    fn contains(&self, x: f32, y: f32) -> bool {
        let n = self.points.len();
        let limit = (self.width * 0.5).powi(2);
        (0..n).any(|i| dist_sq_to_segment((x, y), self.points[i], self.points[(i + 1) % n]) <= limit)
    }
}

#[inline]
fn cross(ax: f32, ay: f32, bx: f32, by: f32) -> f32 {
    ax * by - ay * bx
}

fn winding_number(points: &[Point], px: f32, py: f32) -> i32 {
    let n = points.len();
    let mut wn = 0;
    for i in 0..n {
        let (x1, y1) = points[i];
        let (x2, y2) = points[(i + 1) % n];
        let side = cross(x2 - x1, y2 - y1, px - x1, py - y1);
        if y1 <= py {
            if y2 > py && side > 0.0 {
                wn += 1;
            }
        } else if y2 <= py && side < 0.0 {
            wn -= 1;
        }
    }
    wn
}

fn dist_sq_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let (abx, aby) = (b.0 - a.0, b.1 - a.1);
    let len_sq = abx * abx + aby * aby;
    let t = if len_sq > 0.0 {
        (((p.0 - a.0) * abx + (p.1 - a.1) * aby) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (qx, qy) = (a.0 + abx * t, a.1 + aby * t);
    (p.0 - qx).powi(2) + (p.1 - qy).powi(2)
}

/// Point at `t` on the cubic Bezier `p0 p1 p2 p3`.
pub fn cubic_bezier(p0: Point, p1: Point, p2: Point, p3: Point, t: f32) -> Point {
    let u = 1.0 - t;
    let (b0, b1, b2, b3) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
    (
        b0 * p0.0 + b1 * p1.0 + b2 * p2.0 + b3 * p3.0,
        b0 * p0.1 + b1 * p1.1 + b2 * p2.1 + b3 * p3.1,
    )
}
