//! Cap triangulation for planar polygons with holes.
//!
//! All triangulators index into a [`FlatPolygon`] and return triangles wound
//! clockwise when seen from +z, which is the orientation of the bottom cap of
//! an extruded solid.

mod cdt;
mod ear_clip;
mod fan;
mod flat_polygon;

pub use cdt::ConstrainedDelaunay;
pub use ear_clip::EarClipper;
pub use fan::FanTriangulator;
pub use flat_polygon::FlatPolygon;

use crate::config::TriangulatorKind;
use crate::error::Result;

/// Splits a flat polygon into triangles over its own vertices.
pub trait Triangulator: Send + Sync {
    /// Triangulates the polygon, returning clockwise index triples.
    ///
    /// # Errors
    ///
    /// Returns a triangulation error if the rings are degenerate or
    /// self-intersecting.
    fn triangulate(&self, polygon: &FlatPolygon) -> Result<Vec<[u32; 3]>>;
}

/// Returns the triangulator selected by `kind`.
#[must_use]
pub fn triangulator_for(kind: TriangulatorKind) -> Box<dyn Triangulator> {
    match kind {
        TriangulatorKind::EarClipping => Box::new(EarClipper),
        TriangulatorKind::ConstrainedDelaunay => Box::new(ConstrainedDelaunay),
    }
}
