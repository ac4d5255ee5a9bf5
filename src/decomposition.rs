// Copyright 2025 Lars Brubaker
// License: MIT
//
// Trapezoid map (vertical decomposition).
//
// Every trapezoid is bounded by a top and a bottom segment and by the vertical
// extensions through its left and right points. Trapezoids live in a slot map
// and refer to each other by key, so retired trapezoids turn into stale keys
// instead of dangling references.
//
// The two segments of the bounding box are stored at fixed indices:
//   segments[TOP_SEGMENT]    = upper-left  -> upper-right
//   segments[BOTTOM_SEGMENT] = lower-left  -> lower-right  (outer face above)

use slotmap::{new_key_type, SlotMap};
use tracing::trace;

use crate::dcel::OUTER_FACE;
use crate::error::{LocateError, Result};
use crate::geom::{point_leq, BoundingBox, Point, VerticalOrientation};
use crate::search::NodeId;
use crate::segment::{SegIdx, Segment};

new_key_type! {
    /// Key of a trapezoid in the decomposition.
    pub struct TrapId;
}

pub const TOP_SEGMENT: SegIdx = 0;
pub const BOTTOM_SEGMENT: SegIdx = 1;

/// Neighbor slot of a trapezoid.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Corner {
    UpperRight = 0,
    UpperLeft = 1,
    LowerLeft = 2,
    LowerRight = 3,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::UpperRight,
        Corner::UpperLeft,
        Corner::LowerLeft,
        Corner::LowerRight,
    ];

    /// The slot of the neighbor that points back.
    #[inline]
    pub fn mirror(self) -> Corner {
        match self {
            Corner::UpperRight => Corner::UpperLeft,
            Corner::UpperLeft => Corner::UpperRight,
            Corner::LowerLeft => Corner::LowerRight,
            Corner::LowerRight => Corner::LowerLeft,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Trapezoid {
    pub top: SegIdx,
    pub bottom: SegIdx,
    pub left_point: Point,
    pub right_point: Point,
    /// Indexed by `Corner as usize`.
    pub neighbors: [Option<TrapId>; 4],
    /// The search leaf that resolves to this trapezoid.
    pub leaf: Option<NodeId>,
}

impl Trapezoid {
    pub fn new(top: SegIdx, bottom: SegIdx, left_point: Point, right_point: Point) -> Self {
        Trapezoid {
            top,
            bottom,
            left_point,
            right_point,
            neighbors: [None; 4],
            leaf: None,
        }
    }

    #[inline]
    pub fn neighbor(&self, c: Corner) -> Option<TrapId> {
        self.neighbors[c as usize]
    }
}

/// Outcome of inserting one segment into the map.
///
/// `crossed[i]` is the i-th trapezoid the segment passed through, left to
/// right; `old_leaves[i]` is its search leaf before the insertion. `above[i]`
/// and `below[i]` are the trapezoids now covering the part of `crossed[i]`
/// above and below the segment. Consecutive entries repeat when one
/// trapezoid spans several crossed ones.
#[derive(Clone, Debug)]
pub struct Split {
    pub segment: SegIdx,
    pub crossed: Vec<TrapId>,
    pub old_leaves: Vec<NodeId>,
    pub above: Vec<TrapId>,
    pub below: Vec<TrapId>,
    pub left: Option<TrapId>,
    pub right: Option<TrapId>,
    /// Trapezoids that need a fresh search leaf. May contain crossed ones
    /// that were shrunk and reused.
    pub created: Vec<TrapId>,
}

#[derive(Clone, Debug)]
pub struct Decomposition {
    bounds: BoundingBox,
    segments: Vec<Segment>,
    traps: SlotMap<TrapId, Trapezoid>,
}

impl Decomposition {
    /// A map with one trapezoid covering the whole bounding box.
    pub fn new(bounds: BoundingBox) -> Self {
        Self::with_seed(bounds).0
    }

    /// Like `new`, also returning the key of the initial trapezoid.
    pub fn with_seed(bounds: BoundingBox) -> (Self, TrapId) {
        let segments = vec![
            Segment {
                left: bounds.upper_left(),
                right: bounds.upper_right(),
                above_face: None,
            },
            Segment {
                left: bounds.lower_left(),
                right: bounds.lower_right(),
                above_face: Some(OUTER_FACE),
            },
        ];
        let mut traps = SlotMap::with_key();
        let seed = traps.insert(Trapezoid::new(
            TOP_SEGMENT,
            BOTTOM_SEGMENT,
            bounds.lower_left(),
            bounds.upper_right(),
        ));
        let dec = Decomposition {
            bounds,
            segments,
            traps,
        };
        (dec, seed)
    }

    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    /// All segments, the two bounding-box segments first.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segment(&self, s: SegIdx) -> &Segment {
        &self.segments[s as usize]
    }

    pub fn trapezoids(&self) -> impl Iterator<Item = (TrapId, &Trapezoid)> + '_ {
        self.traps.iter()
    }

    pub fn trapezoid(&self, id: TrapId) -> Option<&Trapezoid> {
        self.traps.get(id)
    }

    pub fn num_trapezoids(&self) -> usize {
        self.traps.len()
    }

    pub(crate) fn set_leaf(&mut self, id: TrapId, leaf: NodeId) {
        if let Some(t) = self.traps.get_mut(id) {
            t.leaf = Some(leaf);
        }
    }

    fn get(&self, id: TrapId) -> Result<&Trapezoid> {
        self.traps
            .get(id)
            .ok_or_else(|| LocateError::Inconsistent(format!("stale trapezoid {:?}", id)))
    }

    /// Set `a`'s slot `c` to `b` and make `b` point back through the mirror slot.
    fn link(&mut self, a: TrapId, c: Corner, b: Option<TrapId>) {
        if let Some(t) = self.traps.get_mut(a) {
            t.neighbors[c as usize] = b;
        }
        if let Some(b) = b {
            if let Some(t) = self.traps.get_mut(b) {
                t.neighbors[c.mirror() as usize] = Some(a);
            }
        }
    }

    fn link_all(&mut self, a: TrapId, slots: [Option<TrapId>; 4]) {
        for c in Corner::ALL {
            self.link(a, c, slots[c as usize]);
        }
    }

    /// Rejects an endpoint that would land in the interior of a bounding segment.
    fn check_endpoint_clear(&self, p: Point, s: SegIdx) -> Result<()> {
        let seg = self.segment(s);
        if seg.orientation_of(p) == VerticalOrientation::On && p != seg.left && p != seg.right {
            return Err(LocateError::Degenerate {
                point: p,
                reason: "endpoint lies in the interior of an existing segment",
            });
        }
        Ok(())
    }

    /// Insert segment `s` whose left endpoint lies in trapezoid `start`.
    ///
    /// All inputs are validated before the first mutation, so an error leaves
    /// the map unchanged.
    pub fn insert(&mut self, s: Segment, start: TrapId) -> Result<Split> {
        let (p, q) = (s.left, s.right);

        // Walk right along the segment. `above_sides[i]` records whether the
        // right point of crossed[i] lies above the segment.
        let mut crossed = vec![start];
        let mut above_sides = Vec::new();
        let mut cur = start;
        loop {
            let t = self.get(cur)?;
            if point_leq(q, t.right_point) {
                break;
            }
            let r = t.right_point;
            let next = match s.orientation_of(r) {
                VerticalOrientation::On => {
                    return Err(LocateError::Degenerate {
                        point: r,
                        reason: "segment passes through an existing endpoint",
                    })
                }
                VerticalOrientation::Below => {
                    above_sides.push(false);
                    t.neighbor(Corner::UpperRight)
                }
                VerticalOrientation::Above => {
                    above_sides.push(true);
                    t.neighbor(Corner::LowerRight)
                }
            };
            cur = next.ok_or_else(|| {
                LocateError::Inconsistent(format!("walk along segment lost its way at {}", r))
            })?;
            crossed.push(cur);
        }

        let orig: Vec<Trapezoid> = crossed
            .iter()
            .map(|&id| self.get(id).cloned())
            .collect::<Result<_>>()?;
        let old_leaves = orig
            .iter()
            .map(|t| {
                t.leaf
                    .ok_or_else(|| LocateError::Inconsistent("trapezoid without leaf".to_string()))
            })
            .collect::<Result<Vec<_>>>()?;

        let last = &orig[orig.len() - 1];
        self.check_endpoint_clear(q, last.top)?;
        self.check_endpoint_clear(q, last.bottom)?;

        self.segments.push(s);
        let seg = (self.segments.len() - 1) as SegIdx;
        trace!(segment = seg, crossed = crossed.len(), "inserting segment");

        let split = if crossed.len() == 1 {
            self.split_single(seg, p, q, &crossed, &orig)
        } else {
            self.split_multiple(seg, p, q, &crossed, &orig, &above_sides)
        };
        Ok(Split {
            old_leaves,
            ..split
        })
    }

    fn split_single(
        &mut self,
        seg: SegIdx,
        p: Point,
        q: Point,
        crossed: &[TrapId],
        orig: &[Trapezoid],
    ) -> Split {
        let d = &orig[0];
        let a = self.traps.insert(Trapezoid::new(d.top, seg, p, q));
        let b = self.traps.insert(Trapezoid::new(seg, d.bottom, p, q));
        let mut created = vec![a, b];

        let left = if p != d.left_point {
            let l = self.traps.insert(Trapezoid::new(d.top, d.bottom, d.left_point, p));
            self.link_all(
                l,
                [
                    Some(a),
                    d.neighbor(Corner::UpperLeft),
                    d.neighbor(Corner::LowerLeft),
                    Some(b),
                ],
            );
            created.push(l);
            Some(l)
        } else {
            self.link(a, Corner::UpperLeft, d.neighbor(Corner::UpperLeft));
            self.link(b, Corner::LowerLeft, d.neighbor(Corner::LowerLeft));
            None
        };

        let right = if q != d.right_point {
            let r = self.traps.insert(Trapezoid::new(d.top, d.bottom, q, d.right_point));
            self.link_all(
                r,
                [
                    d.neighbor(Corner::UpperRight),
                    Some(a),
                    Some(b),
                    d.neighbor(Corner::LowerRight),
                ],
            );
            created.push(r);
            Some(r)
        } else {
            self.link(a, Corner::UpperRight, d.neighbor(Corner::UpperRight));
            self.link(b, Corner::LowerRight, d.neighbor(Corner::LowerRight));
            None
        };

        self.traps.remove(crossed[0]);

        Split {
            segment: seg,
            crossed: crossed.to_vec(),
            old_leaves: Vec::new(),
            above: vec![a],
            below: vec![b],
            left,
            right,
            created,
        }
    }

    /// The segment crosses crossed[0..=k] with k >= 1.
    ///
    /// crossed[0] becomes the left remainder (or is retired), the right
    /// remainder is new, and every crossed[j] with j >= 1 is shrunk to the
    /// side of the segment on which its left point lies. That side starts a
    /// new piece there; the other side keeps extending the running piece.
    fn split_multiple(
        &mut self,
        seg: SegIdx,
        p: Point,
        q: Point,
        crossed: &[TrapId],
        orig: &[Trapezoid],
        above_sides: &[bool],
    ) -> Split {
        let k = crossed.len() - 1;
        let d0 = &orig[0];
        let dk = &orig[k];

        // Pieces as (first crossed index, last crossed index, id).
        let mut above_pieces: Vec<(usize, usize, TrapId)> = Vec::new();
        let mut below_pieces: Vec<(usize, usize, TrapId)> = Vec::new();
        let mut above = Vec::with_capacity(k + 1);
        let mut below = Vec::with_capacity(k + 1);

        for j in 0..=k {
            let right_point = if j == k { q } else { orig[j].right_point };
            let starts_above = j == 0 || above_sides[j - 1];
            let starts_below = j == 0 || !above_sides[j - 1];

            if starts_above {
                let id = if j == 0 {
                    self.traps.insert(Trapezoid::new(d0.top, seg, p, right_point))
                } else {
                    let t = &mut self.traps[crossed[j]];
                    t.bottom = seg;
                    t.right_point = right_point;
                    crossed[j]
                };
                above_pieces.push((j, j, id));
            } else if let Some(piece) = above_pieces.last_mut() {
                piece.1 = j;
                self.traps[piece.2].right_point = right_point;
            }

            if starts_below {
                let id = if j == 0 {
                    self.traps.insert(Trapezoid::new(seg, d0.bottom, p, right_point))
                } else {
                    let t = &mut self.traps[crossed[j]];
                    t.top = seg;
                    t.right_point = right_point;
                    crossed[j]
                };
                below_pieces.push((j, j, id));
            } else if let Some(piece) = below_pieces.last_mut() {
                piece.1 = j;
                self.traps[piece.2].right_point = right_point;
            }

            above.extend(above_pieces.last().map(|piece| piece.2));
            below.extend(below_pieces.last().map(|piece| piece.2));
        }

        let left = if p != d0.left_point {
            self.traps[crossed[0]].right_point = p;
            Some(crossed[0])
        } else {
            None
        };
        let right = if q != dk.right_point {
            Some(
                self.traps
                    .insert(Trapezoid::new(dk.top, dk.bottom, q, dk.right_point)),
            )
        } else {
            None
        };

        for (n, &(a, b, id)) in above_pieces.iter().enumerate() {
            let upper_left = if a == 0 {
                left.or(d0.neighbor(Corner::UpperLeft))
            } else {
                orig[a].neighbor(Corner::UpperLeft)
            };
            let lower_left = if a == 0 {
                None
            } else {
                Some(above_pieces[n - 1].2)
            };
            let upper_right = if b == k {
                right.or(dk.neighbor(Corner::UpperRight))
            } else {
                orig[b].neighbor(Corner::UpperRight)
            };
            let lower_right = above_pieces.get(n + 1).map(|piece| piece.2);
            self.link_all(id, [upper_right, upper_left, lower_left, lower_right]);
        }

        for (n, &(a, b, id)) in below_pieces.iter().enumerate() {
            let lower_left = if a == 0 {
                left.or(d0.neighbor(Corner::LowerLeft))
            } else {
                orig[a].neighbor(Corner::LowerLeft)
            };
            let upper_left = if a == 0 {
                None
            } else {
                Some(below_pieces[n - 1].2)
            };
            let lower_right = if b == k {
                right.or(dk.neighbor(Corner::LowerRight))
            } else {
                orig[b].neighbor(Corner::LowerRight)
            };
            let upper_right = below_pieces.get(n + 1).map(|piece| piece.2);
            self.link_all(id, [upper_right, upper_left, lower_left, lower_right]);
        }

        // The left remainder keeps its own left neighbors.
        if let Some(l) = left {
            self.link(l, Corner::UpperRight, above.first().copied());
            self.link(l, Corner::LowerRight, below.first().copied());
        } else {
            self.traps.remove(crossed[0]);
        }
        if let Some(r) = right {
            self.link(r, Corner::UpperRight, dk.neighbor(Corner::UpperRight));
            self.link(r, Corner::LowerRight, dk.neighbor(Corner::LowerRight));
        }

        let mut created: Vec<TrapId> = above_pieces
            .iter()
            .chain(below_pieces.iter())
            .map(|piece| piece.2)
            .collect();
        created.extend(left);
        created.extend(right);

        Split {
            segment: seg,
            crossed: crossed.to_vec(),
            old_leaves: Vec::new(),
            above,
            below,
            left,
            right,
            created,
        }
    }

    /// Check the neighbor invariants of every live trapezoid.
    pub fn validate(&self) -> Result<()> {
        let fail = |id: TrapId, what: &str| {
            Err(LocateError::Inconsistent(format!("trapezoid {:?}: {}", id, what)))
        };

        for (id, t) in self.traps.iter() {
            let top = self.segment(t.top);
            let bottom = self.segment(t.bottom);
            if !point_leq(t.left_point, t.right_point) || t.left_point == t.right_point {
                return fail(id, "left point is not left of right point");
            }

            // A side that starts or ends at the bounding segment's endpoint has
            // no neighbor there; any other interior side has one.
            let rules = [
                (Corner::UpperLeft, t.left_point == top.left, t.left_point.x > self.bounds.left),
                (Corner::LowerLeft, t.left_point == bottom.left, t.left_point.x > self.bounds.left),
                (Corner::UpperRight, t.right_point == top.right, t.right_point.x < self.bounds.right),
                (Corner::LowerRight, t.right_point == bottom.right, t.right_point.x < self.bounds.right),
            ];
            for (c, at_endpoint, interior) in rules {
                let n = t.neighbor(c);
                if at_endpoint && n.is_some() {
                    return fail(id, &format!("forbidden {:?} neighbor", c));
                }
                if !at_endpoint && interior && n.is_none() {
                    return fail(id, &format!("missing {:?} neighbor", c));
                }
            }

            for c in Corner::ALL {
                let Some(nid) = t.neighbor(c) else { continue };
                let Some(other) = self.traps.get(nid) else {
                    return fail(id, &format!("{:?} neighbor is retired", c));
                };
                if other.neighbor(c.mirror()) != Some(id) {
                    return fail(id, &format!("{:?} neighbor does not point back", c));
                }
                let joined = match c {
                    Corner::UpperRight | Corner::LowerRight => other.left_point == t.right_point,
                    Corner::UpperLeft | Corner::LowerLeft => other.right_point == t.left_point,
                };
                if !joined {
                    return fail(id, &format!("{:?} neighbor does not share the boundary point", c));
                }
            }
        }
        Ok(())
    }
}
