// planar-locate: planar subdivisions and trapezoid-map point location
// Copyright 2025 Lars Brubaker
// License: MIT

pub mod dcel;
pub mod decomposition;
pub mod error;
pub mod geom;
pub mod locate;
pub mod search;
pub mod segment;

pub use dcel::{Dcel, EdgeIdx, FaceIdx, VertIdx, INVALID, OUTER_FACE};
pub use decomposition::{Corner, TrapId, Trapezoid};
pub use error::{DcelError, LocateError, Result};
pub use geom::{BoundingBox, Point, Real};
pub use locate::{LocateOption, PointLocation};
pub use search::NodeId;
pub use segment::{segments_of, Segment};
