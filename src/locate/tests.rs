// Copyright 2025 Lars Brubaker
// License: MIT

use super::*;
use crate::dcel::OUTER_FACE;
use crate::geom::Real;

fn p(x: Real, y: Real) -> Point {
    Point::new(x, y)
}

fn seg(ax: Real, ay: Real, bx: Real, by: Real) -> Segment {
    Segment::new(p(ax, ay), p(bx, by)).unwrap()
}

fn box100() -> BoundingBox {
    BoundingBox::new(p(0.0, 0.0), p(100.0, 100.0))
}

#[test]
fn empty_map_is_one_trapezoid() {
    let pl = PointLocation::new(box100());
    assert_eq!(pl.num_trapezoids(), 1);
    assert!(pl.segments().is_empty());
    pl.validate().unwrap();
    assert_eq!(pl.query(p(50.0, 50.0)).unwrap(), Some(OUTER_FACE));
}

#[test]
fn default_bounds() {
    let pl = PointLocation::default();
    assert_eq!(*pl.bounds(), BoundingBox::new(p(0.0, 0.0), p(400.0, 400.0)));
}

#[test]
fn single_segment_gives_four_trapezoids() {
    let mut pl = PointLocation::new(box100());
    pl.insert(seg(20.0, 20.0, 80.0, 80.0)).unwrap();
    assert_eq!(pl.num_trapezoids(), 4);
    assert_eq!(pl.segments().len(), 1);
    pl.validate().unwrap();
}

#[test]
fn out_of_bounds_rejected() {
    let mut pl = PointLocation::new(box100());
    let err = pl.insert(seg(20.0, 20.0, 100.0, 50.0)).unwrap_err();
    assert_eq!(err, LocateError::OutOfBounds(p(100.0, 50.0)));
    assert_eq!(pl.num_trapezoids(), 1);
    assert!(matches!(
        pl.query(p(-1.0, 5.0)),
        Err(LocateError::OutOfBounds(_))
    ));
}

#[test]
fn degenerate_segment_rejected() {
    let mut pl = PointLocation::new(box100());
    let bad = Segment {
        left: p(5.0, 5.0),
        right: p(5.0, 5.0),
        above_face: None,
    };
    assert_eq!(
        pl.insert(bad).unwrap_err(),
        LocateError::InvalidSegment(p(5.0, 5.0))
    );
}

#[test]
fn unordered_segment_is_normalized() {
    let mut pl = PointLocation::new(box100());
    let raw = Segment {
        left: p(80.0, 10.0),
        right: p(20.0, 30.0),
        above_face: Some(3),
    };
    pl.insert(raw).unwrap();
    assert_eq!(pl.segments()[0].left, p(20.0, 30.0));
    assert_eq!(pl.query(p(50.0, 50.0)).unwrap(), Some(3));
    pl.validate().unwrap();
}

#[test]
fn build_replaces_previous_map() {
    let mut pl = PointLocation::new(box100());
    pl.insert(seg(20.0, 20.0, 80.0, 80.0)).unwrap();
    pl.build(vec![seg(10.0, 50.0, 90.0, 50.0)]).unwrap();
    assert_eq!(pl.segments().len(), 1);
    assert_eq!(pl.num_trapezoids(), 4);
    pl.validate().unwrap();
}

#[test]
fn clear_decomposition_keeps_dcel() {
    let mut dcel = Dcel::new();
    dcel.add_vertex(p(10.0, 10.0));
    dcel.add_vertex(p(30.0, 20.0));
    dcel.add_edge(0, 1).unwrap();
    let mut pl = PointLocation::with_dcel(box100(), dcel).unwrap();
    assert_eq!(pl.num_trapezoids(), 4);

    pl.clear_decomposition();
    assert_eq!(pl.num_trapezoids(), 1);
    assert_eq!(pl.dcel().num_edges(), 1);

    pl.rebuild().unwrap();
    assert_eq!(pl.num_trapezoids(), 4);

    pl.clear();
    assert_eq!(pl.num_trapezoids(), 1);
    assert_eq!(pl.dcel().num_vertices(), 0);
}

#[test]
fn validate_each_insertion_option() {
    let mut pl = PointLocation::new(box100());
    pl.set_option(LocateOption::ValidateEachInsertion, true);
    pl.insert(seg(10.0, 10.0, 40.0, 30.0)).unwrap();
    pl.insert(seg(40.0, 30.0, 70.0, 10.0)).unwrap();
    pl.insert(seg(5.0, 60.0, 95.0, 70.0)).unwrap();
    assert!(pl.num_trapezoids() <= 4 * 3 + 1);
}

#[test]
fn shared_right_endpoint() {
    let mut pl = PointLocation::new(box100());
    pl.insert(seg(10.0, 20.0, 60.0, 50.0)).unwrap();
    pl.insert(seg(10.0, 80.0, 60.0, 50.0)).unwrap();
    pl.validate().unwrap();
    // region between the two segments
    let t = pl.locate(p(20.0, 50.0)).unwrap();
    let trap = pl.trapezoid(t).unwrap();
    assert_eq!(pl.decomposition().segment(trap.top).left, p(10.0, 80.0));
    assert_eq!(pl.decomposition().segment(trap.bottom).left, p(10.0, 20.0));
}

#[test]
fn vertical_segment_uses_shear() {
    let mut pl = PointLocation::new(box100());
    pl.insert(seg(50.0, 20.0, 50.0, 80.0)).unwrap();
    pl.insert(seg(20.0, 50.0, 45.0, 50.0)).unwrap();
    pl.validate().unwrap();

    let left = pl.locate(p(48.0, 50.0)).unwrap();
    let right = pl.locate(p(52.0, 50.0)).unwrap();
    assert_ne!(left, right);
    assert!(matches!(
        pl.locate(p(50.0, 50.0)),
        Err(LocateError::Degenerate { .. })
    ));
}
