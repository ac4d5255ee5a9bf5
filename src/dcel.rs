// Copyright 2025 Lars Brubaker
// License: MIT
//
// Doubly connected edge list (planar subdivision).
//
// All references between records are u32 indices into Vec arenas.
// Records are never removed, so indices stay valid for the life of the Dcel.
//
// Design:
//   - INVALID: u32::MAX  (null reference)
//   - faces[0] is the unbounded outer face; it has no outer component.
//   - A vertex without edges owns one self-referential half-edge
//     (twin == next == prev == itself). The first edge attached to the vertex
//     reuses that record as one half of its twin pair.
//   - Bounded faces are traced counter-clockwise by `next`; the outer
//     boundary of a component, seen from the outer face, runs clockwise.

mod check;

use tracing::{debug, warn};

use crate::error::DcelError;
use crate::geom::{orientation, polygon_contains, signed_area, Orientation, Point, Real};

pub const INVALID: u32 = u32::MAX;

/// Index into Dcel::verts
pub type VertIdx = u32;
/// Index into Dcel::edges
pub type EdgeIdx = u32;
/// Index into Dcel::faces
pub type FaceIdx = u32;

/// The unbounded face.
pub const OUTER_FACE: FaceIdx = 0;

#[derive(Clone, Debug)]
pub struct Vertex {
    pub point: Point,
    /// One outgoing half-edge (the self-referential marker for isolated vertices).
    pub edge: EdgeIdx,
}

#[derive(Clone, Debug)]
pub struct HalfEdge {
    pub origin: VertIdx,
    pub twin: EdgeIdx,
    /// Next half-edge along the boundary of the incident face.
    pub next: EdgeIdx,
    /// Previous half-edge along the boundary of the incident face.
    pub prev: EdgeIdx,
    pub incident_face: FaceIdx,
}

#[derive(Clone, Debug)]
pub struct Face {
    /// One half-edge of the outer boundary cycle, INVALID for the outer face.
    pub outer_component: EdgeIdx,
    pub is_outer: bool,
}

/// The planar subdivision.
#[derive(Clone, Debug)]
pub struct Dcel {
    pub(crate) verts: Vec<Vertex>,
    pub(crate) edges: Vec<HalfEdge>,
    pub(crate) faces: Vec<Face>,
}

impl Dcel {
    /// Create an empty subdivision consisting of the outer face only.
    pub fn new() -> Self {
        Dcel {
            verts: Vec::new(),
            edges: Vec::new(),
            faces: vec![Face {
                outer_component: INVALID,
                is_outer: true,
            }],
        }
    }

    /// Build a subdivision from a point list and index pairs into it.
    /// Duplicate points are skipped, as `add_vertex` does.
    pub fn from_parts(points: &[Point], edges: &[(VertIdx, VertIdx)]) -> Result<Self, DcelError> {
        let mut dcel = Dcel::new();
        for &p in points {
            dcel.add_vertex(p);
        }
        for &(i, j) in edges {
            dcel.add_edge(i, j)?;
        }
        Ok(dcel)
    }

    /// Remove every vertex, edge and inner face.
    pub fn clear(&mut self) {
        *self = Dcel::new();
    }

    // ──────────────────────────── Accessors ────────────────────────────────

    pub fn vertices(&self) -> &[Vertex] {
        &self.verts
    }

    pub fn edges(&self) -> &[HalfEdge] {
        &self.edges
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn vertex(&self, v: VertIdx) -> &Vertex {
        &self.verts[v as usize]
    }

    pub fn edge(&self, e: EdgeIdx) -> &HalfEdge {
        &self.edges[e as usize]
    }

    pub fn face(&self, f: FaceIdx) -> &Face {
        &self.faces[f as usize]
    }

    pub fn num_vertices(&self) -> usize {
        self.verts.len()
    }

    /// Number of undirected edges. Isolated-vertex markers are not edges.
    pub fn num_edges(&self) -> usize {
        let paired = self
            .edges
            .iter()
            .enumerate()
            .filter(|(i, e)| e.twin as usize != *i)
            .count();
        paired / 2
    }

    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    pub fn outer_face(&self) -> FaceIdx {
        OUTER_FACE
    }

    /// Indices of all bounded faces.
    pub fn inner_faces(&self) -> impl Iterator<Item = FaceIdx> + '_ {
        self.faces
            .iter()
            .enumerate()
            .filter(|(_, f)| !f.is_outer)
            .map(|(i, _)| i as FaceIdx)
    }

    /// The first vertex inserted, if any.
    pub fn start_vertex(&self) -> Option<VertIdx> {
        if self.verts.is_empty() {
            None
        } else {
            Some(0)
        }
    }

    // ──────────────────────── Navigation helpers ───────────────────────────

    #[inline]
    pub fn origin(&self, e: EdgeIdx) -> VertIdx {
        self.edges[e as usize].origin
    }

    #[inline]
    pub fn destination(&self, e: EdgeIdx) -> VertIdx {
        self.edges[self.edges[e as usize].twin as usize].origin
    }

    #[inline]
    pub fn twin(&self, e: EdgeIdx) -> EdgeIdx {
        self.edges[e as usize].twin
    }

    #[inline]
    pub fn next(&self, e: EdgeIdx) -> EdgeIdx {
        self.edges[e as usize].next
    }

    #[inline]
    pub fn prev(&self, e: EdgeIdx) -> EdgeIdx {
        self.edges[e as usize].prev
    }

    #[inline]
    fn origin_point(&self, e: EdgeIdx) -> Point {
        self.verts[self.origin(e) as usize].point
    }

    #[inline]
    fn destination_point(&self, e: EdgeIdx) -> Point {
        self.verts[self.destination(e) as usize].point
    }

    /// Endpoints of `e` ordered (upper, lower); ties on y put the left one first.
    pub fn upper_and_lower(&self, e: EdgeIdx) -> (VertIdx, VertIdx) {
        let (p, q) = (self.origin(e), self.destination(e));
        let (pp, qp) = (self.verts[p as usize].point, self.verts[q as usize].point);
        if pp.y > qp.y || (pp.y == qp.y && pp.x < qp.x) {
            (p, q)
        } else {
            (q, p)
        }
    }

    /// True if `v` has no edges yet.
    pub fn is_isolated(&self, v: VertIdx) -> bool {
        let e = self.verts[v as usize].edge;
        self.edges[e as usize].twin == e
    }

    /// Outgoing half-edges of `v` in rotational order.
    pub fn outgoing_edges(&self, v: VertIdx) -> Vec<EdgeIdx> {
        let start = self.verts[v as usize].edge;
        if self.is_isolated(v) {
            return Vec::new();
        }
        let mut out = vec![start];
        let mut e = self.next(self.twin(start));
        while e != start {
            out.push(e);
            e = self.next(self.twin(e));
        }
        out
    }

    /// Outgoing and incoming half-edges of `v`.
    pub fn incident_edges(&self, v: VertIdx) -> Vec<EdgeIdx> {
        self.outgoing_edges(v)
            .into_iter()
            .flat_map(|e| [e, self.twin(e)])
            .collect()
    }

    /// The boundary cycle starting at `e`, following `next`.
    pub fn cycle(&self, e: EdgeIdx) -> Vec<EdgeIdx> {
        let mut out = vec![e];
        let mut cur = self.next(e);
        while cur != e {
            out.push(cur);
            cur = self.next(cur);
        }
        out
    }

    /// Half-edges of the outer boundary of `f` (empty for the outer face).
    pub fn face_edges(&self, f: FaceIdx) -> Vec<EdgeIdx> {
        let start = self.faces[f as usize].outer_component;
        if start == INVALID {
            return Vec::new();
        }
        self.cycle(start)
    }

    pub fn face_vertices(&self, f: FaceIdx) -> Vec<VertIdx> {
        self.face_edges(f).into_iter().map(|e| self.origin(e)).collect()
    }

    pub fn face_points(&self, f: FaceIdx) -> Vec<Point> {
        self.face_edges(f)
            .into_iter()
            .map(|e| self.origin_point(e))
            .collect()
    }

    /// True if `p` lies inside the outer boundary of the bounded face `f`.
    pub fn face_contains(&self, f: FaceIdx, p: Point) -> bool {
        if self.faces[f as usize].is_outer {
            return false;
        }
        polygon_contains(&self.face_points(f), p)
    }

    pub fn find_vertex(&self, p: Point) -> Option<VertIdx> {
        self.verts
            .iter()
            .position(|v| v.point == p)
            .map(|i| i as VertIdx)
    }

    /// The innermost bounded face whose boundary encloses `p`, or the outer face.
    pub fn find_containing_face(&self, p: Point) -> FaceIdx {
        let mut best = OUTER_FACE;
        let mut best_area = Real::INFINITY;
        for f in self.inner_faces() {
            let points = self.face_points(f);
            if polygon_contains(&points, p) {
                let area = signed_area(&points).abs();
                if area < best_area {
                    best = f;
                    best_area = area;
                }
            }
        }
        best
    }

    /// Existing half-edge from `from` to `to`, if any.
    pub fn find_edge(&self, from: VertIdx, to: VertIdx) -> Option<EdgeIdx> {
        self.outgoing_edges(from)
            .into_iter()
            .find(|&e| self.destination(e) == to)
    }

    /// True if the cycle through `e` winds clockwise (negative shoelace area).
    pub fn is_cycle_clockwise(&self, e: EdgeIdx) -> bool {
        let points: Vec<Point> = self
            .cycle(e)
            .into_iter()
            .map(|c| self.origin_point(c))
            .collect();
        signed_area(&points) < 0.0
    }

    // ──────────────────────── Private helpers ──────────────────────────────

    fn alloc_edge(&mut self, origin: VertIdx) -> EdgeIdx {
        let e = self.edges.len() as EdgeIdx;
        self.edges.push(HalfEdge {
            origin,
            twin: e,
            next: e,
            prev: e,
            incident_face: INVALID,
        });
        e
    }

    #[inline]
    fn link(&mut self, a: EdgeIdx, b: EdgeIdx) {
        self.edges[a as usize].next = b;
        self.edges[b as usize].prev = a;
    }

    /// Is `p` inside the angular wedge between the incoming half-edge `e` and
    /// the outgoing `e.next` (the wedge of their common face)?
    fn point_between_edge_and_next(&self, p: Point, e: EdgeIdx) -> bool {
        let e1 = self.next(e);
        if self.twin(e) == e1 {
            return true;
        }
        let (a0, b0) = (self.origin_point(e), self.destination_point(e));
        let (a1, b1) = (self.origin_point(e1), self.destination_point(e1));
        let left0 = orientation(p, a0, b0) == Orientation::Left;
        let left1 = orientation(p, a1, b1) == Orientation::Left;
        // Convex corner: intersection of both half-planes. Reflex: union.
        (left0 && (left1 || orientation(b1, a0, b0) == Orientation::Right))
            || (left1 && orientation(a0, a1, b1) == Orientation::Right)
    }

    /// Incoming half-edge at `v` after which a new edge towards `target`
    /// has to be spliced. The face of that half-edge is the face the new edge
    /// lies in.
    fn find_insertion_slot(&self, v: VertIdx, target: Point) -> Result<EdgeIdx, DcelError> {
        let out = self.verts[v as usize].edge;
        let start = self.twin(out);
        if start == out || start == self.prev(out) {
            // isolated vertex or a single incident edge
            return Ok(start);
        }
        let mut e = start;
        loop {
            if self.point_between_edge_and_next(target, e) {
                return Ok(e);
            }
            e = self.twin(self.next(e));
            if e == start {
                return Err(DcelError::Internal(format!(
                    "no insertion slot around vertex {} towards {}",
                    v, target
                )));
            }
        }
    }

    fn update_face_in_cycle(&mut self, start: EdgeIdx, f: FaceIdx) {
        for e in self.cycle(start) {
            self.edges[e as usize].incident_face = f;
        }
    }

    /// Split `f` after an edge closed a new cycle through `e` and `e.twin`.
    /// The counter-clockwise side becomes the new face.
    fn split_face(&mut self, e: EdgeIdx, f: FaceIdx) -> FaceIdx {
        let inner = if self.is_cycle_clockwise(e) { self.twin(e) } else { e };
        let outer = self.twin(inner);

        let new_face = self.faces.len() as FaceIdx;
        self.faces.push(Face {
            outer_component: inner,
            is_outer: false,
        });

        // Both sides counter-clockwise: the outer boundary of `f` itself was cut,
        // and its old representative may now belong to the new face.
        if !self.faces[f as usize].is_outer && !self.is_cycle_clockwise(outer) {
            self.faces[f as usize].outer_component = outer;
        }

        self.update_face_in_cycle(inner, new_face);
        self.update_face_in_cycle(outer, f);
        new_face
    }

    // ──────────────────────── Public operations ────────────────────────────

    /// Add an isolated vertex. Returns None if a vertex already exists at `p`.
    pub fn add_vertex(&mut self, p: Point) -> Option<VertIdx> {
        if self.find_vertex(p).is_some() {
            return None;
        }
        let v = self.verts.len() as VertIdx;
        let face = self.find_containing_face(p);
        let e = self.alloc_edge(v);
        self.edges[e as usize].incident_face = face;
        self.verts.push(Vertex { point: p, edge: e });
        Some(v)
    }

    /// Connect two existing vertices with a straight edge.
    ///
    /// Out-of-range indices (and `from == to`) are ignored. On error the
    /// subdivision is left unchanged.
    pub fn add_edge(&mut self, from: VertIdx, to: VertIdx) -> Result<(), DcelError> {
        let n = self.verts.len() as VertIdx;
        if from >= n || to >= n || from == to {
            return Ok(());
        }
        if self.find_edge(from, to).is_some() {
            warn!(from, to, "edge already present");
            return Err(DcelError::EdgeExists { from, to });
        }

        let p_from = self.verts[from as usize].point;
        let p_to = self.verts[to as usize].point;
        let from_isolated = self.is_isolated(from);
        let to_isolated = self.is_isolated(to);

        // Locate the splice positions and the face before touching anything.
        let slot_from = self.find_insertion_slot(from, p_to)?;
        let slot_to = self.find_insertion_slot(to, p_from)?;
        let face_from = if from_isolated {
            self.find_containing_face(p_from)
        } else {
            self.edges[slot_from as usize].incident_face
        };
        let face_to = if to_isolated {
            self.find_containing_face(p_to)
        } else {
            self.edges[slot_to as usize].incident_face
        };
        if face_from != face_to {
            warn!(from, to, face_from, face_to, "endpoints lie in different faces");
            return Err(DcelError::NotCoVisible { from, to });
        }
        let face = face_from;

        let he0 = if from_isolated {
            self.verts[from as usize].edge
        } else {
            self.alloc_edge(from)
        };
        let he1 = if to_isolated {
            self.verts[to as usize].edge
        } else {
            self.alloc_edge(to)
        };

        self.edges[he0 as usize].twin = he1;
        self.edges[he1 as usize].twin = he0;
        self.edges[he0 as usize].incident_face = face;
        self.edges[he1 as usize].incident_face = face;

        let old_next_from = self.next(slot_from);
        let old_next_to = self.next(slot_to);
        self.link(slot_from, he0);
        self.link(slot_to, he1);
        self.link(he0, old_next_to);
        self.link(he1, old_next_from);

        // Joining two separate boundary cycles merges them; otherwise the
        // edge closed a new cycle and the face splits in two.
        if !from_isolated && !to_isolated && !self.cycle(he0).contains(&he1) {
            let new_face = self.split_face(he0, face);
            debug!(from, to, old_face = face, new_face, "face split");
        } else {
            debug!(from, to, face, "edge added");
        }
        Ok(())
    }
}

impl Default for Dcel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: Real, y: Real) -> Point {
        Point::new(x, y)
    }

    fn triangle() -> Dcel {
        let mut d = Dcel::new();
        d.add_vertex(p(0.0, 0.0));
        d.add_vertex(p(10.0, 0.0));
        d.add_vertex(p(5.0, 10.0));
        d.add_edge(0, 1).unwrap();
        d.add_edge(1, 2).unwrap();
        d.add_edge(2, 0).unwrap();
        d
    }

    #[test]
    fn new_has_only_outer_face() {
        let d = Dcel::new();
        assert_eq!(d.num_faces(), 1);
        assert!(d.face(OUTER_FACE).is_outer);
        assert_eq!(d.face(OUTER_FACE).outer_component, INVALID);
        assert_eq!(d.start_vertex(), None);
    }

    #[test]
    fn isolated_vertex_has_self_marker() {
        let mut d = Dcel::new();
        let v = d.add_vertex(p(1.0, 1.0)).unwrap();
        let e = d.vertex(v).edge;
        assert_eq!(d.twin(e), e);
        assert_eq!(d.next(e), e);
        assert!(d.is_isolated(v));
        assert!(d.outgoing_edges(v).is_empty());
        assert_eq!(d.num_edges(), 0);
    }

    #[test]
    fn duplicate_vertex_rejected() {
        let mut d = Dcel::new();
        assert!(d.add_vertex(p(1.0, 1.0)).is_some());
        assert!(d.add_vertex(p(1.0, 1.0)).is_none());
        assert_eq!(d.num_vertices(), 1);
    }

    #[test]
    fn single_edge_forms_two_cycle() {
        let mut d = Dcel::new();
        d.add_vertex(p(0.0, 0.0));
        d.add_vertex(p(3.0, 1.0));
        d.add_edge(0, 1).unwrap();
        let e = d.vertex(0).edge;
        assert_eq!(d.destination(e), 1);
        assert_eq!(d.cycle(e).len(), 2);
        assert_eq!(d.num_edges(), 1);
        assert_eq!(d.num_faces(), 1);
    }

    #[test]
    fn triangle_splits_off_inner_face() {
        let d = triangle();
        assert_eq!(d.num_faces(), 2);
        assert_eq!(d.num_edges(), 3);
        let inner: Vec<FaceIdx> = d.inner_faces().collect();
        assert_eq!(inner.len(), 1);
        let f = inner[0];
        assert_eq!(d.face_vertices(f).len(), 3);
        assert!(!d.is_cycle_clockwise(d.face(f).outer_component));
    }

    #[test]
    fn invalid_indices_are_ignored() {
        let mut d = triangle();
        assert!(d.add_edge(0, 17).is_ok());
        assert!(d.add_edge(1, 1).is_ok());
        assert_eq!(d.num_edges(), 3);
    }

    #[test]
    fn existing_edge_rejected() {
        let mut d = triangle();
        assert_eq!(
            d.add_edge(1, 0),
            Err(DcelError::EdgeExists { from: 1, to: 0 })
        );
    }

    #[test]
    fn containing_face_prefers_innermost() {
        let d = triangle();
        assert_eq!(d.find_containing_face(p(5.0, 3.0)), 1);
        assert_eq!(d.find_containing_face(p(50.0, 50.0)), OUTER_FACE);
    }

    #[test]
    fn upper_and_lower_orders_by_y() {
        let d = triangle();
        let e = d.find_edge(0, 2).unwrap();
        assert_eq!(d.upper_and_lower(e), (2, 0));
        let e = d.find_edge(1, 0).unwrap();
        assert_eq!(d.upper_and_lower(e), (0, 1));
    }
}
