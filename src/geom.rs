// Copyright 2025 Lars Brubaker
// License: MIT
//
// Geometric kernel shared by the subdivision and the trapezoid map.
//
// All horizontal comparisons go through the lexicographic (x, then y) order.
// This is the symbolic shear transform: no two distinct points ever share an
// "x-coordinate", so vertical segments and vertically aligned endpoints need
// no special casing in the decomposition.

pub type Real = f64;

#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: Real,
    pub y: Real,
}

impl Point {
    #[inline]
    pub const fn new(x: Real, y: Real) -> Self {
        Point { x, y }
    }
}

impl From<(Real, Real)> for Point {
    fn from((x, y): (Real, Real)) -> Self {
        Point { x, y }
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Position of a point relative to the (sheared) vertical line through another point.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HorizontalOrientation {
    Left,
    On,
    Right,
}

/// Position of a point relative to the supporting line of a segment.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VerticalOrientation {
    Above,
    On,
    Below,
}

/// Side of a directed line a point lies on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Orientation {
    Left,
    On,
    Right,
}

/// Returns true if u is lexicographically <= v (x first, then y).
#[inline]
pub fn point_leq(u: Point, v: Point) -> bool {
    u.x < v.x || (u.x == v.x && u.y <= v.y)
}

/// Returns true if u is lexicographically < v.
#[inline]
pub fn point_lt(u: Point, v: Point) -> bool {
    u.x < v.x || (u.x == v.x && u.y < v.y)
}

/// Classifies `p` against the sheared vertical line through `q`.
#[inline]
pub fn horizontal_orientation(p: Point, q: Point) -> HorizontalOrientation {
    if point_lt(p, q) {
        HorizontalOrientation::Left
    } else if p == q {
        HorizontalOrientation::On
    } else {
        HorizontalOrientation::Right
    }
}

/// Twice the signed area of the triangle (a, b, c).
/// Positive when (a, b, c) is counter-clockwise.
#[inline]
pub fn orient2d(a: Point, b: Point, c: Point) -> Real {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Side of the directed line a -> b that `p` lies on.
#[inline]
pub fn orientation(p: Point, a: Point, b: Point) -> Orientation {
    let det = orient2d(a, b, p);
    if det > 0.0 {
        Orientation::Left
    } else if det < 0.0 {
        Orientation::Right
    } else {
        Orientation::On
    }
}

/// Classifies `p` against the line through the segment `left` -> `right`,
/// where `left` precedes `right` in the lexicographic order.
///
/// For a vertical segment the points left of it count as above, which is what
/// the shear transform yields.
#[inline]
pub fn vertical_orientation(p: Point, left: Point, right: Point) -> VerticalOrientation {
    match orientation(p, left, right) {
        Orientation::Left => VerticalOrientation::Above,
        Orientation::Right => VerticalOrientation::Below,
        Orientation::On => VerticalOrientation::On,
    }
}

/// Slope of the segment `left` -> `right`. Vertical segments (which run upward
/// after lexicographic ordering) get `+inf`.
#[inline]
pub fn slope(left: Point, right: Point) -> Real {
    let dx = right.x - left.x;
    if dx == 0.0 {
        Real::INFINITY
    } else {
        (right.y - left.y) / dx
    }
}

/// Signed area of a closed polygon (shoelace). Counter-clockwise is positive.
pub fn signed_area(points: &[Point]) -> Real {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut acc = 0.0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        acc += (a.y + b.y) * (a.x - b.x);
    }
    acc / 2.0
}

/// Crossing-number test. Points exactly on the boundary may go either way.
pub fn polygon_contains(points: &[Point], p: Point) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (points[i], points[j]);
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Axis-aligned rectangle enclosing everything the trapezoid map may contain.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    pub left: Real,
    pub lower: Real,
    pub right: Real,
    pub upper: Real,
}

impl BoundingBox {
    pub fn new(lower_left: Point, upper_right: Point) -> Self {
        BoundingBox {
            left: lower_left.x.min(upper_right.x),
            lower: lower_left.y.min(upper_right.y),
            right: lower_left.x.max(upper_right.x),
            upper: lower_left.y.max(upper_right.y),
        }
    }

    pub fn upper_left(&self) -> Point {
        Point::new(self.left, self.upper)
    }

    pub fn upper_right(&self) -> Point {
        Point::new(self.right, self.upper)
    }

    pub fn lower_left(&self) -> Point {
        Point::new(self.left, self.lower)
    }

    pub fn lower_right(&self) -> Point {
        Point::new(self.right, self.lower)
    }

    /// True if `p` lies in the open interior of the box.
    pub fn contains_strictly(&self, p: Point) -> bool {
        self.left < p.x && p.x < self.right && self.lower < p.y && p.y < self.upper
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        BoundingBox::new(Point::new(0.0, 0.0), Point::new(400.0, 400.0))
    }
}
