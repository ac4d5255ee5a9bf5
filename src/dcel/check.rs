// Copyright 2025 Lars Brubaker
// License: MIT
//
// Structural self-check of the edge list.

use super::{Dcel, EdgeIdx, INVALID, OUTER_FACE};
use crate::error::DcelError;

impl Dcel {
    /// Walk every record and verify the pointer invariants:
    /// twin symmetry, next/prev agreement, shared incident face along each
    /// cycle, and vertex/face representatives pointing at the right records.
    pub fn check(&self) -> Result<(), DcelError> {
        let n = self.edges.len() as EdgeIdx;
        let err = |msg: String| Err(DcelError::Internal(msg));

        for e in 0..n {
            let he = &self.edges[e as usize];
            if he.twin >= n || he.next >= n || he.prev >= n {
                return err(format!("half-edge {} has a dangling reference", e));
            }
            if self.twin(he.twin) != e {
                return err(format!("twin of half-edge {} does not point back", e));
            }
            if self.prev(he.next) != e || self.next(he.prev) != e {
                return err(format!("next/prev of half-edge {} disagree", e));
            }
            if he.twin == e {
                // isolated-vertex marker
                if he.next != e || self.verts[he.origin as usize].edge != e {
                    return err(format!("isolated marker {} is not self-contained", e));
                }
                continue;
            }
            if self.origin(he.next) != self.destination(e) {
                return err(format!("half-edge {} does not chain into its next", e));
            }
            if he.incident_face as usize >= self.faces.len() {
                return err(format!("half-edge {} has no valid face", e));
            }
            if self.edges[he.next as usize].incident_face != he.incident_face {
                return err(format!("face changes along the cycle at half-edge {}", e));
            }
        }

        for (v, vert) in self.verts.iter().enumerate() {
            if vert.edge >= n || self.origin(vert.edge) as usize != v {
                return err(format!("vertex {} has a foreign representative edge", v));
            }
        }

        for (f, face) in self.faces.iter().enumerate() {
            if face.is_outer != (f as u32 == OUTER_FACE) {
                return err(format!("face {} has the wrong outer flag", f));
            }
            if face.is_outer {
                if face.outer_component != INVALID {
                    return err("outer face has an outer component".to_string());
                }
                continue;
            }
            let e = face.outer_component;
            if e >= n || self.edges[e as usize].incident_face as usize != f {
                return err(format!("face {} has a foreign outer component", f));
            }
            if self.is_cycle_clockwise(e) {
                return err(format!("outer boundary of face {} is clockwise", f));
            }
        }
        Ok(())
    }

    /// V - E + F. Equals 1 + the number of connected components, isolated
    /// vertices included, so 2 for a connected subdivision.
    pub fn euler_characteristic(&self) -> i64 {
        self.verts.len() as i64 - self.num_edges() as i64 + self.faces.len() as i64
    }
}

#[cfg(test)]
mod tests {
    use crate::dcel::Dcel;
    use crate::geom::Point;

    #[test]
    fn square_with_diagonal_is_consistent() {
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        let d = Dcel::from_parts(&pts, &[(0, 1), (1, 2), (2, 3), (3, 0), (0, 2)]).unwrap();
        d.check().unwrap();
        assert_eq!(d.num_faces(), 3);
        assert_eq!(d.euler_characteristic(), 2);
    }

    #[test]
    fn broken_twin_detected() {
        let pts = [Point::new(0.0, 0.0), Point::new(1.0, 0.0)];
        let mut d = Dcel::from_parts(&pts, &[(0, 1)]).unwrap();
        d.check().unwrap();
        d.edges[0].twin = 0;
        assert!(d.check().is_err());
    }
}
