// Copyright 2025 Lars Brubaker
// License: MIT
//
// Point location facade: owns a planar subdivision together with the
// trapezoid map of its edges and the search structure over that map.
//
// Segments are inserted in the order the caller supplies them. Each insertion
// locates the left endpoint through the search structure, updates the map,
// then mirrors the change in the search structure.

#[cfg(test)]
mod tests;

use tracing::debug;

use crate::dcel::{Dcel, FaceIdx};
use crate::decomposition::{Decomposition, TrapId, Trapezoid};
use crate::error::{LocateError, Result};
use crate::geom::{BoundingBox, Point};
use crate::search::SearchStructure;
use crate::segment::{segments_of, Segment};

/// Number of bounding-box segments stored ahead of the inserted ones.
const SENTINEL_SEGMENTS: usize = 2;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LocateOption {
    /// Run the full structure validation after every segment insertion.
    ValidateEachInsertion,
}

#[derive(Clone, Debug)]
pub struct PointLocation {
    bounds: BoundingBox,
    dcel: Dcel,
    decomposition: Decomposition,
    search: SearchStructure,
    validate_each: bool,
}

impl PointLocation {
    /// Empty subdivision and a map consisting of the bounding box alone.
    pub fn new(bounds: BoundingBox) -> Self {
        let (decomposition, search) = Self::fresh_map(bounds);
        PointLocation {
            bounds,
            dcel: Dcel::new(),
            decomposition,
            search,
            validate_each: false,
        }
    }

    /// Take ownership of `dcel` and build the map of its edges.
    pub fn with_dcel(bounds: BoundingBox, dcel: Dcel) -> Result<Self> {
        let mut pl = PointLocation::new(bounds);
        pl.dcel = dcel;
        pl.rebuild()?;
        Ok(pl)
    }

    fn fresh_map(bounds: BoundingBox) -> (Decomposition, SearchStructure) {
        let (mut decomposition, seed) = Decomposition::with_seed(bounds);
        let search = SearchStructure::new(&mut decomposition, seed);
        (decomposition, search)
    }

    pub fn set_option(&mut self, option: LocateOption, value: bool) {
        match option {
            LocateOption::ValidateEachInsertion => self.validate_each = value,
        }
    }

    // ──────────────────────────── Accessors ────────────────────────────────

    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    pub fn dcel(&self) -> &Dcel {
        &self.dcel
    }

    /// Mutable access to the subdivision. The map does not follow edits
    /// made through this; call `rebuild` afterwards.
    pub fn dcel_mut(&mut self) -> &mut Dcel {
        &mut self.dcel
    }

    pub fn decomposition(&self) -> &Decomposition {
        &self.decomposition
    }

    pub fn search_structure(&self) -> &SearchStructure {
        &self.search
    }

    /// Inserted segments in insertion order (bounding-box segments excluded).
    pub fn segments(&self) -> &[Segment] {
        &self.decomposition.segments()[SENTINEL_SEGMENTS..]
    }

    pub fn trapezoids(&self) -> impl Iterator<Item = (TrapId, &Trapezoid)> + '_ {
        self.decomposition.trapezoids()
    }

    pub fn trapezoid(&self, id: TrapId) -> Option<&Trapezoid> {
        self.decomposition.trapezoid(id)
    }

    pub fn num_trapezoids(&self) -> usize {
        self.decomposition.num_trapezoids()
    }

    // ──────────────────────── Construction ─────────────────────────────────

    /// Insert one segment into the map.
    ///
    /// Both endpoints must lie strictly inside the bounding box. The segment
    /// may share endpoints with earlier segments but must not cross or
    /// overlap them, nor pass through their endpoints.
    pub fn insert(&mut self, segment: Segment) -> Result<()> {
        let s = Segment::with_face(segment.left, segment.right, segment.above_face)?;
        for p in [s.left, s.right] {
            if !self.bounds.contains_strictly(p) {
                return Err(LocateError::OutOfBounds(p));
            }
        }

        let start = self.search.search(&self.decomposition, s.left, Some(&s))?;
        let split = self.decomposition.insert(s, start)?;
        self.search.update(&mut self.decomposition, &split)?;
        debug!(
            left = %s.left,
            right = %s.right,
            crossed = split.crossed.len(),
            trapezoids = self.decomposition.num_trapezoids(),
            "segment inserted"
        );

        if self.validate_each {
            self.validate()?;
        }
        Ok(())
    }

    /// Discard the current map and insert `segments` in the given order.
    pub fn build<I>(&mut self, segments: I) -> Result<()>
    where
        I: IntoIterator<Item = Segment>,
    {
        self.clear_decomposition();
        for s in segments {
            self.insert(s)?;
        }
        Ok(())
    }

    /// Rebuild the map from the edges of the owned subdivision.
    pub fn rebuild(&mut self) -> Result<()> {
        let segments = segments_of(&self.dcel);
        self.build(segments)
    }

    /// Drop the subdivision and the map.
    pub fn clear(&mut self) {
        self.clear_decomposition();
        self.dcel.clear();
    }

    /// Drop the map only; the subdivision is kept.
    pub fn clear_decomposition(&mut self) {
        let (decomposition, search) = Self::fresh_map(self.bounds);
        self.decomposition = decomposition;
        self.search = search;
    }

    // ──────────────────────────── Queries ──────────────────────────────────

    /// The trapezoid containing `point`.
    pub fn locate(&self, point: Point) -> Result<TrapId> {
        if !self.bounds.contains_strictly(point) {
            return Err(LocateError::OutOfBounds(point));
        }
        self.search.search(&self.decomposition, point, None)
    }

    /// The subdivision face containing `point`: the face above the bottom
    /// segment of its trapezoid. None if that segment carries no face.
    pub fn query(&self, point: Point) -> Result<Option<FaceIdx>> {
        let t = self.locate(point)?;
        let trap = self
            .decomposition
            .trapezoid(t)
            .ok_or_else(|| LocateError::Inconsistent(format!("search reached retired trapezoid {:?}", t)))?;
        Ok(self.decomposition.segment(trap.bottom).above_face)
    }

    /// Exhaustive consistency check of the subdivision, the map and the
    /// search structure. Meant for tests and debugging.
    pub fn validate(&self) -> Result<()> {
        self.dcel.check()?;
        self.decomposition.validate()?;
        self.search.validate(&self.decomposition)
    }
}

impl Default for PointLocation {
    fn default() -> Self {
        Self::new(BoundingBox::default())
    }
}
