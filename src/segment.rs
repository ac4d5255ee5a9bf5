// Copyright 2025 Lars Brubaker
// License: MIT
//
// Line segments as seen by the trapezoid map.

use crate::dcel::{Dcel, FaceIdx};
use crate::error::{LocateError, Result};
use crate::geom::{point_lt, slope, vertical_orientation, Point, Real, VerticalOrientation};

/// Index into the decomposition's segment list.
pub type SegIdx = u32;

/// A non-degenerate segment with `left` lexicographically before `right`.
/// `above_face` is the subdivision face directly above it, if known.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment {
    pub left: Point,
    pub right: Point,
    pub above_face: Option<FaceIdx>,
}

impl Segment {
    /// Build a segment from two endpoints in any order.
    pub fn new(a: Point, b: Point) -> Result<Self> {
        Self::with_face(a, b, None)
    }

    pub fn with_face(a: Point, b: Point, above_face: Option<FaceIdx>) -> Result<Self> {
        if a == b {
            return Err(LocateError::InvalidSegment(a));
        }
        let (left, right) = if point_lt(a, b) { (a, b) } else { (b, a) };
        Ok(Segment {
            left,
            right,
            above_face,
        })
    }

    #[inline]
    pub fn slope(&self) -> Real {
        slope(self.left, self.right)
    }

    #[inline]
    pub fn orientation_of(&self, p: Point) -> VerticalOrientation {
        vertical_orientation(p, self.left, self.right)
    }
}

/// One segment per undirected edge of `dcel`, tagged with the face above it.
///
/// The half-edge running left to right has the upper face on its left, so its
/// incident face is the one recorded.
pub fn segments_of(dcel: &Dcel) -> Vec<Segment> {
    let mut out = Vec::with_capacity(dcel.num_edges());
    for (e, he) in dcel.edges().iter().enumerate() {
        if he.twin as usize == e {
            continue;
        }
        let a = dcel.vertex(he.origin).point;
        let b = dcel.vertex(dcel.destination(e as u32)).point;
        if point_lt(a, b) {
            out.push(Segment {
                left: a,
                right: b,
                above_face: Some(he.incident_face),
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dcel::OUTER_FACE;

    #[test]
    fn endpoints_are_normalized() {
        let s = Segment::new(Point::new(5.0, 5.0), Point::new(1.0, 9.0)).unwrap();
        assert_eq!(s.left, Point::new(1.0, 9.0));
        assert_eq!(s.right, Point::new(5.0, 5.0));

        // vertical: lower point first
        let s = Segment::new(Point::new(2.0, 8.0), Point::new(2.0, 1.0)).unwrap();
        assert_eq!(s.left, Point::new(2.0, 1.0));
        assert_eq!(s.slope(), Real::INFINITY);
    }

    #[test]
    fn zero_length_rejected() {
        let p = Point::new(3.0, 3.0);
        assert_eq!(Segment::new(p, p), Err(LocateError::InvalidSegment(p)));
    }

    #[test]
    fn triangle_segments_carry_faces() {
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(5.0, 10.0),
        ];
        let d = Dcel::from_parts(&pts, &[(0, 1), (1, 2), (2, 0)]).unwrap();
        let segs = segments_of(&d);
        assert_eq!(segs.len(), 3);

        let bottom = segs
            .iter()
            .find(|s| s.left == pts[0] && s.right == pts[1])
            .unwrap();
        assert_eq!(bottom.above_face, Some(1));

        let right = segs
            .iter()
            .find(|s| s.left == pts[2] && s.right == pts[1])
            .unwrap();
        assert_eq!(right.above_face, Some(OUTER_FACE));
    }
}
