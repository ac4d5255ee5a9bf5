// Copyright 2025 Lars Brubaker
// License: MIT
//
// Error taxonomy for subdivision edits and point location.

use crate::dcel::VertIdx;
use crate::geom::Point;

/// Errors reported by edge insertion into a [`Dcel`](crate::dcel::Dcel).
///
/// A failed insertion leaves the subdivision untouched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DcelError {
    /// The endpoints are not reachable from one common face.
    #[error("vertices {from} and {to} do not lie in the same face")]
    NotCoVisible { from: VertIdx, to: VertIdx },

    /// The two vertices are already joined by an edge.
    #[error("vertices {from} and {to} are already connected")]
    EdgeExists { from: VertIdx, to: VertIdx },

    /// A topological invariant is broken. This is a defect, not bad input.
    #[error("internal DCEL inconsistency: {0}")]
    Internal(String),
}

/// Errors reported by the trapezoid map and its search structure.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LocateError {
    /// The input touches an existing segment in a way the map cannot represent:
    /// a query point exactly on a segment, overlapping segments, or a segment
    /// passing through an existing endpoint.
    #[error("degenerate input at {point}: {reason}")]
    Degenerate { point: Point, reason: &'static str },

    /// Both endpoints of a segment coincide.
    #[error("segment has zero length at {0}")]
    InvalidSegment(Point),

    /// The point lies on or outside the bounding box.
    #[error("point {0} is not strictly inside the bounding box")]
    OutOfBounds(Point),

    /// The trapezoid map or search structure violates an invariant. After this
    /// the structure must be rebuilt.
    #[error("point location structure is inconsistent: {0}")]
    Inconsistent(String),

    #[error(transparent)]
    Dcel(#[from] DcelError),
}

pub type Result<T, E = LocateError> = std::result::Result<T, E>;
