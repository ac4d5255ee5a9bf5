// Copyright 2025 Lars Brubaker
// WASM bindings for planar-locate

use planar_locate::{BoundingBox, Corner, LocateOption, Point, PointLocation};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn main_js() {
    console_error_panic_hook::set_once();
}

/// A subdivision that is edited vertex by vertex and edge by edge, then
/// turned into a trapezoid map for point queries.
#[wasm_bindgen]
pub struct PointLocatorJs {
    inner: PointLocation,
    last_error: Option<String>,
}

#[wasm_bindgen]
impl PointLocatorJs {
    #[wasm_bindgen(constructor)]
    pub fn new(left: f64, lower: f64, right: f64, upper: f64) -> PointLocatorJs {
        let bounds = BoundingBox::new(Point::new(left, lower), Point::new(right, upper));
        PointLocatorJs {
            inner: PointLocation::new(bounds),
            last_error: None,
        }
    }

    /// Option 0 = validate after each insertion.
    pub fn set_option(&mut self, option: u32, value: bool) {
        if option == 0 {
            self.inner
                .set_option(LocateOption::ValidateEachInsertion, value);
        }
    }

    /// Returns the new vertex index, or -1 if a vertex already exists there.
    pub fn add_vertex(&mut self, x: f64, y: f64) -> i32 {
        match self.inner.dcel_mut().add_vertex(Point::new(x, y)) {
            Some(v) => v as i32,
            None => -1,
        }
    }

    /// Connect two vertices. Returns false and records the reason on failure.
    pub fn add_edge(&mut self, from: u32, to: u32) -> bool {
        let result = self.inner.dcel_mut().add_edge(from, to);
        self.record(result.map_err(Into::into))
    }

    /// Rebuild the trapezoid map from the current subdivision.
    pub fn build(&mut self) -> bool {
        let result = self.inner.rebuild();
        self.record(result)
    }

    pub fn clear(&mut self) {
        self.inner.clear();
        self.last_error = None;
    }

    /// Face index at (x, y), or -1 if the point is on a segment, outside
    /// the bounding box, or below an untagged segment.
    pub fn query(&self, x: f64, y: f64) -> i32 {
        match self.inner.query(Point::new(x, y)) {
            Ok(Some(f)) => f as i32,
            _ => -1,
        }
    }

    pub fn last_error(&self) -> Option<String> {
        self.last_error.clone()
    }

    pub fn vertex_count(&self) -> u32 {
        self.inner.dcel().num_vertices() as u32
    }

    pub fn edge_count(&self) -> u32 {
        self.inner.dcel().num_edges() as u32
    }

    pub fn face_count(&self) -> u32 {
        self.inner.dcel().num_faces() as u32
    }

    pub fn trapezoid_count(&self) -> u32 {
        self.inner.num_trapezoids() as u32
    }

    /// Flat vertex positions [x0,y0, x1,y1, ...].
    pub fn get_vertices(&self) -> Vec<f64> {
        self.inner
            .dcel()
            .vertices()
            .iter()
            .flat_map(|v| [v.point.x, v.point.y])
            .collect()
    }

    /// Flat segment endpoints [lx,ly, rx,ry, ...] in insertion order.
    pub fn get_segments(&self) -> Vec<f64> {
        self.inner
            .segments()
            .iter()
            .flat_map(|s| [s.left.x, s.left.y, s.right.x, s.right.y])
            .collect()
    }

    /// Left and right points of every trapezoid [lx,ly, rx,ry, ...], enough
    /// to draw the vertical walls of the decomposition.
    pub fn get_trapezoid_walls(&self) -> Vec<f64> {
        self.inner
            .trapezoids()
            .flat_map(|(_, t)| [t.left_point.x, t.left_point.y, t.right_point.x, t.right_point.y])
            .collect()
    }

    /// Number of neighbor links over all trapezoids.
    pub fn neighbor_link_count(&self) -> u32 {
        self.inner
            .trapezoids()
            .map(|(_, t)| Corner::ALL.iter().filter(|&&c| t.neighbor(c).is_some()).count())
            .sum::<usize>() as u32
    }

    pub fn search_depth(&self) -> u32 {
        self.inner.search_structure().depth() as u32
    }
}

impl PointLocatorJs {
    fn record(&mut self, result: planar_locate::Result<()>) -> bool {
        match result {
            Ok(()) => {
                self.last_error = None;
                true
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                false
            }
        }
    }
}

impl Default for PointLocatorJs {
    fn default() -> Self {
        let b = BoundingBox::default();
        Self::new(b.left, b.lower, b.right, b.upper)
    }
}
