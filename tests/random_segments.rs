// Copyright 2025 Lars Brubaker
// Randomized insertion of disjoint segments, validated after every step and
// cross-checked against a brute-force vertical ray query.

mod helpers;

use helpers::*;
use planar_locate::{LocateOption, PointLocation};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn random_disjoint_segments_stay_consistent() {
    let bounds = bbox(0.0, 0.0, 1000.0, 1000.0);
    for seed in 0..8u64 {
        let segments = random_disjoint_segments(seed, 6, &bounds);
        let mut pl = PointLocation::new(bounds);
        pl.set_option(LocateOption::ValidateEachInsertion, true);
        for (n, s) in segments.iter().enumerate() {
            if let Err(e) = pl.insert(*s) {
                panic!("seed {}: insertion {} failed: {}", seed, n, e);
            }
        }
        assert_eq!(pl.segments().len(), segments.len());
        assert!(pl.num_trapezoids() <= 3 * segments.len() + 1);
    }
}

#[test]
fn random_queries_match_brute_force() {
    let bounds = bbox(0.0, 0.0, 1000.0, 1000.0);
    let segments = random_disjoint_segments(42, 8, &bounds);
    let mut pl = PointLocation::new(bounds);
    pl.build(segments.iter().copied()).unwrap();
    assert_valid(&pl);

    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..2000 {
        let q = p(rng.random_range(1.0..999.0), rng.random_range(1.0..999.0));
        let got = pl.query(q).unwrap();
        assert_eq!(got, brute_force_face(&segments, q), "query {}", q);
    }
}

#[test]
fn insertion_order_does_not_change_answers() {
    let bounds = bbox(0.0, 0.0, 500.0, 500.0);
    let segments = random_disjoint_segments(3, 5, &bounds);
    let mut reversed = segments.clone();
    reversed.reverse();

    let mut a = PointLocation::new(bounds);
    a.build(segments.iter().copied()).unwrap();
    let mut b = PointLocation::new(bounds);
    b.build(reversed).unwrap();
    assert_eq!(a.num_trapezoids(), b.num_trapezoids());

    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..500 {
        let q = p(rng.random_range(1.0..499.0), rng.random_range(1.0..499.0));
        assert_eq!(a.query(q).unwrap(), b.query(q).unwrap(), "query {}", q);
    }
}

#[test]
fn grid_subdivision_random_queries() {
    let n = 6;
    let d = grid_dcel(n);
    let pl = PointLocation::with_dcel(bbox(0.0, 0.0, 100.0, 100.0), d.clone()).unwrap();
    assert_valid(&pl);

    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..500 {
        let q = p(rng.random_range(1.0..99.0), rng.random_range(1.0..99.0));
        let expected = d.find_containing_face(q);
        assert_eq!(pl.query(q).unwrap(), Some(expected), "query {}", q);
    }
    // each insertion adds at most three levels
    assert!(pl.search_structure().depth() <= 3 * d.num_edges());
}
