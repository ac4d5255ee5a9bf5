// Copyright 2025 Lars Brubaker
// Shared test utilities for planar-locate tests.

#![allow(dead_code)]

use planar_locate::{BoundingBox, Dcel, FaceIdx, Point, PointLocation, Real, Segment, OUTER_FACE};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

pub fn p(x: Real, y: Real) -> Point {
    Point::new(x, y)
}

pub fn seg(ax: Real, ay: Real, bx: Real, by: Real) -> Segment {
    Segment::new(p(ax, ay), p(bx, by)).unwrap()
}

pub fn bbox(x0: Real, y0: Real, x1: Real, y1: Real) -> BoundingBox {
    BoundingBox::new(p(x0, y0), p(x1, y1))
}

/// Closed polygon with the given corners, edges in order.
pub fn polygon_dcel(corners: &[Point]) -> Dcel {
    let n = corners.len() as u32;
    let edges: Vec<(u32, u32)> = (0..n).map(|i| (i, (i + 1) % n)).collect();
    Dcel::from_parts(corners, &edges).unwrap()
}

/// The triangle (0,0), (10,0), (5,10).
pub fn triangle_dcel() -> Dcel {
    polygon_dcel(&[p(0.0, 0.0), p(10.0, 0.0), p(5.0, 10.0)])
}

/// An n x n grid of square cells of size 10, lower-left corner at (5, 5).
/// Horizontal edges go in first, so every vertical edge after the first
/// one closes a cell.
pub fn grid_dcel(n: u32) -> Dcel {
    let mut d = Dcel::new();
    let id = |i: u32, j: u32| j * (n + 1) + i;
    for j in 0..=n {
        for i in 0..=n {
            d.add_vertex(p(5.0 + 10.0 * i as Real, 5.0 + 10.0 * j as Real));
        }
    }
    for j in 0..=n {
        for i in 0..n {
            d.add_edge(id(i, j), id(i + 1, j)).unwrap();
        }
    }
    for i in 0..=n {
        for j in 0..n {
            d.add_edge(id(i, j), id(i, j + 1)).unwrap();
        }
    }
    d
}

/// One random segment per cell of a `cells` x `cells` grid over `bounds`,
/// kept away from the cell borders, so no two segments touch. Segments are
/// tagged with their index + 1 as the face above them and returned shuffled.
pub fn random_disjoint_segments(seed: u64, cells: u32, bounds: &BoundingBox) -> Vec<Segment> {
    let mut rng = StdRng::seed_from_u64(seed);
    let w = (bounds.right - bounds.left) / cells as Real;
    let h = (bounds.upper - bounds.lower) / cells as Real;
    let mut out = Vec::new();
    for i in 0..cells {
        for j in 0..cells {
            let x0 = bounds.left + w * i as Real;
            let y0 = bounds.lower + h * j as Real;
            let mut pick = || {
                p(
                    x0 + rng.random_range(0.05..0.95) * w,
                    y0 + rng.random_range(0.05..0.95) * h,
                )
            };
            let (a, b) = (pick(), pick());
            if a == b {
                continue;
            }
            let tag = out.len() as FaceIdx + 1;
            out.push(Segment::with_face(a, b, Some(tag)).unwrap());
        }
    }
    out.shuffle(&mut rng);
    out
}

/// Face of the first segment straight below `q`, found by scanning all
/// segments. Assumes `q` is not vertically aligned with any endpoint.
pub fn brute_force_face(segments: &[Segment], q: Point) -> Option<FaceIdx> {
    let mut best: Option<(Real, Option<FaceIdx>)> = None;
    for s in segments {
        if !(s.left.x < q.x && q.x < s.right.x) {
            continue;
        }
        let t = (q.x - s.left.x) / (s.right.x - s.left.x);
        let y = s.left.y + t * (s.right.y - s.left.y);
        if y < q.y && best.map_or(true, |(by, _)| y > by) {
            best = Some((y, s.above_face));
        }
    }
    match best {
        Some((_, face)) => face,
        None => Some(OUTER_FACE),
    }
}

pub fn assert_valid(pl: &PointLocation) {
    if let Err(e) = pl.validate() {
        panic!("point location structure invalid: {}", e);
    }
}
