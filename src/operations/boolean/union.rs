use geo::{BooleanOps, MultiPolygon};
use tracing::debug;

use crate::geometry::Ring;

use super::convert::ring_to_geo;

/// Merges a set of possibly overlapping rings into one region.
pub struct Union<'a> {
    rings: &'a [Ring],
}

impl<'a> Union<'a> {
    /// Creates a new `Union` operation over `rings`.
    #[must_use]
    pub fn new(rings: &'a [Ring]) -> Self {
        Self { rings }
    }

    /// Executes the union.
    #[must_use]
    pub fn execute(&self) -> MultiPolygon<f64> {
        let merged = self
            .rings
            .iter()
            .map(|ring| MultiPolygon::new(vec![geo::Polygon::new(ring_to_geo(ring), vec![])]))
            .fold(MultiPolygon::new(Vec::new()), |acc, next| acc.union(&next));
        debug!(rings = self.rings.len(), regions = merged.0.len(), "merged cut rings");
        merged
    }
}
