use geo::{BooleanOps, MultiPolygon};
use tracing::debug;

use crate::error::{BooleanError, Result};
use crate::geometry::{PolygonWithHoles, Ring};
use crate::math::intersect_2d::first_self_intersection;
use crate::math::TOLERANCE;

use super::convert::{polygons_from_geo, ring_to_geo};
use super::union::Union;

/// Computes `exterior - union(cuts)` as zero or more polygons with holes.
pub struct Subtract<'a> {
    exterior: &'a Ring,
    cuts: &'a [Ring],
}

impl<'a> Subtract<'a> {
    /// Creates a new `Subtract` operation.
    #[must_use]
    pub fn new(exterior: &'a Ring, cuts: &'a [Ring]) -> Self {
        Self { exterior, cuts }
    }

    /// Executes the difference.
    ///
    /// Without cuts the exterior passes through unchanged. An empty result
    /// means the cuts cover the exterior completely.
    ///
    /// # Errors
    ///
    /// Returns [`BooleanError`] if any input ring encloses no area or
    /// crosses itself.
    pub fn execute(&self) -> Result<Vec<PolygonWithHoles>> {
        if self.cuts.is_empty() {
            return Ok(vec![PolygonWithHoles::solid(self.exterior.clone())]);
        }

        validate_ring(self.exterior)?;
        for cut in self.cuts {
            validate_ring(cut)?;
        }

        let cut_region = Union::new(self.cuts).execute();
        let exterior = MultiPolygon::new(vec![geo::Polygon::new(ring_to_geo(self.exterior), vec![])]);
        let difference = exterior.difference(&cut_region);
        let polygons = polygons_from_geo(&difference);

        debug!(
            cuts = self.cuts.len(),
            components = polygons.len(),
            holes = polygons.iter().map(|p| p.holes.len()).sum::<usize>(),
            "subtracted cuts"
        );
        Ok(polygons)
    }
}

fn validate_ring(ring: &Ring) -> Result<()> {
    if ring.area() < TOLERANCE {
        return Err(BooleanError::InvalidRing(format!("ring of {} points encloses no area", ring.len())).into());
    }
    if let Some((first, second)) = first_self_intersection(ring.points()) {
        return Err(BooleanError::SelfIntersection { first, second }.into());
    }
    Ok(())
}
