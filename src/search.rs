// Copyright 2025 Lars Brubaker
// License: MIT
//
// Search structure over the trapezoid map: a rooted DAG whose inner nodes
// test a point against an endpoint (x-node) or a segment (y-node) and whose
// leaves name trapezoids. A node may have several parents; each node keeps
// its parent list so a leaf can be swapped for a subtree in place.

use slotmap::{new_key_type, SecondaryMap, SlotMap};
use tracing::trace;

use crate::decomposition::{Decomposition, Split, TrapId};
use crate::error::{LocateError, Result};
use crate::geom::{point_lt, Point, VerticalOrientation};
use crate::segment::{SegIdx, Segment};

new_key_type! {
    /// Key of a node in the search structure.
    pub struct NodeId;
}

#[derive(Clone, Debug)]
pub enum NodeKind {
    /// Points lexicographically before `point` go left, all others right.
    X {
        point: Point,
        left: NodeId,
        right: NodeId,
    },
    /// Points above the segment's supporting line go to `above`.
    Y {
        segment: SegIdx,
        above: NodeId,
        below: NodeId,
    },
    Leaf(TrapId),
}

#[derive(Clone, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub parents: Vec<NodeId>,
}

impl Node {
    fn children(&self) -> Option<(NodeId, NodeId)> {
        match self.kind {
            NodeKind::X { left, right, .. } => Some((left, right)),
            NodeKind::Y { above, below, .. } => Some((above, below)),
            NodeKind::Leaf(_) => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SearchStructure {
    nodes: SlotMap<NodeId, Node>,
    root: NodeId,
}

impl SearchStructure {
    /// A structure with a single leaf for `trap`. Registers the leaf with the map.
    pub fn new(dec: &mut Decomposition, trap: TrapId) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node {
            kind: NodeKind::Leaf(trap),
            parents: Vec::new(),
        });
        dec.set_leaf(trap, root);
        SearchStructure { nodes, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    fn get(&self, id: NodeId) -> Result<&Node> {
        self.nodes
            .get(id)
            .ok_or_else(|| LocateError::Inconsistent(format!("stale search node {:?}", id)))
    }

    /// Descend from the root to the trapezoid containing `point`.
    ///
    /// `probe` is the segment being inserted when `point` is its left
    /// endpoint. If that endpoint is shared with an existing segment, the
    /// slopes decide which side the new segment leaves on.
    pub fn search(&self, dec: &Decomposition, point: Point, probe: Option<&Segment>) -> Result<TrapId> {
        let mut cur = self.root;
        loop {
            cur = match self.get(cur)?.kind {
                NodeKind::Leaf(t) => return Ok(t),
                NodeKind::X { point: x, left, right } => {
                    if point_lt(point, x) {
                        left
                    } else {
                        right
                    }
                }
                NodeKind::Y {
                    segment,
                    above,
                    below,
                } => {
                    let seg = dec.segment(segment);
                    match seg.orientation_of(point) {
                        VerticalOrientation::Above => above,
                        VerticalOrientation::Below => below,
                        VerticalOrientation::On => match probe {
                            Some(probe) if point == seg.left => {
                                let (new, old) = (probe.slope(), seg.slope());
                                if new > old {
                                    above
                                } else if new < old {
                                    below
                                } else {
                                    return Err(LocateError::Degenerate {
                                        point,
                                        reason: "segment overlaps an existing segment",
                                    });
                                }
                            }
                            Some(_) => {
                                return Err(LocateError::Degenerate {
                                    point,
                                    reason: "endpoint lies in the interior of an existing segment",
                                })
                            }
                            None => {
                                return Err(LocateError::Degenerate {
                                    point,
                                    reason: "query point lies on a segment",
                                })
                            }
                        },
                    }
                }
            };
        }
    }

    fn add_node(&mut self, kind: NodeKind) -> NodeId {
        let id = self.nodes.insert(Node {
            kind,
            parents: Vec::new(),
        });
        if let Some((a, b)) = self.nodes[id].children() {
            self.nodes[a].parents.push(id);
            self.nodes[b].parents.push(id);
        }
        id
    }

    fn add_leaf(&mut self, dec: &mut Decomposition, trap: TrapId) -> NodeId {
        let id = self.add_node(NodeKind::Leaf(trap));
        dec.set_leaf(trap, id);
        id
    }

    /// Point every parent of `old` at `new` and hand over the parent list.
    /// Returns false if `old` was the root (it has no parents).
    pub fn replace_with(&mut self, old: NodeId, new: NodeId) -> Result<bool> {
        let parents = std::mem::take(&mut self.get_mut(old)?.parents);
        if parents.is_empty() {
            return Ok(false);
        }
        for &parent in &parents {
            let kind = &mut self.get_mut(parent)?.kind;
            let slot = match kind {
                NodeKind::X { left, right, .. } => {
                    if *left == old {
                        left
                    } else {
                        right
                    }
                }
                NodeKind::Y { above, below, .. } => {
                    if *above == old {
                        above
                    } else {
                        below
                    }
                }
                NodeKind::Leaf(_) => {
                    return Err(LocateError::Inconsistent(format!(
                        "leaf {:?} listed as a parent",
                        parent
                    )))
                }
            };
            if *slot != old {
                return Err(LocateError::Inconsistent(format!(
                    "{:?} is not a child of its parent {:?}",
                    old, parent
                )));
            }
            *slot = new;
        }
        self.nodes[new].parents = parents;
        Ok(true)
    }

    fn get_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| LocateError::Inconsistent(format!("stale search node {:?}", id)))
    }

    /// Mirror a trapezoid map insertion: swap each crossed trapezoid's leaf
    /// for a subtree resolving to the trapezoids that replaced it.
    pub fn update(&mut self, dec: &mut Decomposition, split: &Split) -> Result<()> {
        let seg = *dec.segment(split.segment);
        let k = split.crossed.len() - 1;

        let mut leaf_of = SecondaryMap::new();
        for &t in &split.created {
            leaf_of.insert(t, self.add_leaf(dec, t));
        }
        let leaf = |t: TrapId| {
            leaf_of
                .get(t)
                .copied()
                .ok_or_else(|| LocateError::Inconsistent(format!("no leaf for trapezoid {:?}", t)))
        };

        for i in 0..=k {
            let mut sub = self.add_node(NodeKind::Y {
                segment: split.segment,
                above: leaf(split.above[i])?,
                below: leaf(split.below[i])?,
            });
            if i == k {
                if let Some(r) = split.right {
                    sub = self.add_node(NodeKind::X {
                        point: seg.right,
                        left: sub,
                        right: leaf(r)?,
                    });
                }
            }
            if i == 0 {
                if let Some(l) = split.left {
                    sub = self.add_node(NodeKind::X {
                        point: seg.left,
                        left: leaf(l)?,
                        right: sub,
                    });
                }
            }

            let old = split.old_leaves[i];
            if !self.replace_with(old, sub)? {
                self.root = sub;
            }
            self.nodes.remove(old);
        }
        trace!(segment = split.segment, nodes = self.nodes.len(), "search structure updated");
        Ok(())
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut memo: SecondaryMap<NodeId, usize> = SecondaryMap::new();
        // Post-order without recursion; the DAG can be deep.
        let mut stack = vec![(self.root, false)];
        while let Some((id, expanded)) = stack.pop() {
            if memo.contains_key(id) {
                continue;
            }
            let Some(node) = self.nodes.get(id) else { continue };
            match node.children() {
                None => {
                    memo.insert(id, 0);
                }
                Some((a, b)) if expanded => {
                    let d = memo.get(a).copied().unwrap_or(0).max(memo.get(b).copied().unwrap_or(0));
                    memo.insert(id, d + 1);
                }
                Some((a, b)) => {
                    stack.push((id, true));
                    stack.push((a, false));
                    stack.push((b, false));
                }
            }
        }
        memo.get(self.root).copied().unwrap_or(0)
    }

    /// Check parent/child agreement, leaf back-links and that the reachable
    /// leaves are exactly the live trapezoids.
    pub fn validate(&self, dec: &Decomposition) -> Result<()> {
        let fail = |msg: String| Err(LocateError::Inconsistent(msg));

        if !self.get(self.root)?.parents.is_empty() {
            return fail("root of the search structure has parents".to_string());
        }

        let mut visited: SecondaryMap<NodeId, ()> = SecondaryMap::new();
        let mut leaves = 0usize;
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            if visited.insert(id, ()).is_some() {
                continue;
            }
            let node = self.get(id)?;
            for &parent in &node.parents {
                let agrees = self
                    .get(parent)?
                    .children()
                    .is_some_and(|(a, b)| a == id || b == id);
                if !agrees {
                    return fail(format!("{:?} lists {:?} as parent, which does not point to it", id, parent));
                }
            }
            if let NodeKind::Leaf(t) = node.kind {
                let Some(trap) = dec.trapezoid(t) else {
                    return fail(format!("leaf {:?} names retired trapezoid {:?}", id, t));
                };
                if trap.leaf != Some(id) {
                    return fail(format!("trapezoid {:?} does not link back to leaf {:?}", t, id));
                }
                leaves += 1;
            } else if let Some((a, b)) = node.children() {
                for child in [a, b] {
                    if !self.get(child)?.parents.contains(&id) {
                        return fail(format!("{:?} is not a parent of its child {:?}", id, child));
                    }
                    stack.push(child);
                }
            }
        }

        if leaves != dec.num_trapezoids() {
            return fail(format!(
                "{} reachable leaves for {} trapezoids",
                leaves,
                dec.num_trapezoids()
            ));
        }
        if visited.len() != self.nodes.len() {
            return fail(format!(
                "{} of {} search nodes unreachable",
                self.nodes.len() - visited.len(),
                self.nodes.len()
            ));
        }
        Ok(())
    }
}
