use std::ops::Range;

use crate::error::{Result, TriangulationError};
use crate::geometry::{PolygonWithHoles, Ring};
use crate::math::polygon_2d::{ensure_finite, signed_area_2d};
use crate::math::Point2;

/// A polygon flattened into one point list: the exterior ring first, then
/// each hole ring, with the end offset of every ring recorded.
///
/// Every ring is stored counter-clockwise. Cap triangulations and the
/// extruded mesh index into [`FlatPolygon::points`].
#[derive(Debug, Clone, PartialEq)]
pub struct FlatPolygon {
    points: Vec<Point2>,
    ring_ends: Vec<usize>,
}

impl FlatPolygon {
    /// Creates a flat polygon from a point list and cumulative ring end offsets.
    ///
    /// Rings wound clockwise are reversed in place.
    ///
    /// # Errors
    ///
    /// Returns [`TriangulationError::DegenerateRing`] if the offsets are not
    /// increasing, do not cover the point list, or leave a ring with fewer
    /// than 3 points. Non-finite coordinates are a geometry error.
    pub fn new(mut points: Vec<Point2>, ring_ends: Vec<usize>) -> Result<Self> {
        ensure_finite(&points)?;
        if ring_ends.last() != Some(&points.len()) {
            return Err(TriangulationError::DegenerateRing(format!(
                "ring ends {ring_ends:?} do not cover {} points",
                points.len()
            ))
            .into());
        }
        let mut start = 0;
        for &end in &ring_ends {
            if end < start + 3 {
                return Err(TriangulationError::DegenerateRing(format!(
                    "ring {start}..{end} has fewer than 3 points"
                ))
                .into());
            }
            let ring = &mut points[start..end];
            if signed_area_2d(ring) < 0.0 {
                ring.reverse();
            }
            start = end;
        }
        Ok(Self { points, ring_ends })
    }

    /// Flattens a polygon with holes.
    #[must_use]
    pub fn from_polygon(polygon: &PolygonWithHoles) -> Self {
        let mut points = Vec::with_capacity(polygon.point_count());
        let mut ring_ends = Vec::with_capacity(polygon.holes.len() + 1);
        for ring in std::iter::once(&polygon.exterior).chain(&polygon.holes) {
            let ring = ring.clone().into_ccw();
            points.extend_from_slice(ring.points());
            ring_ends.push(points.len());
        }
        Self { points, ring_ends }
    }

    /// Flattens a single exterior ring, ignoring any holes.
    #[must_use]
    pub fn from_exterior(exterior: &Ring) -> Self {
        let ring = exterior.clone().into_ccw();
        let len = ring.len();
        Self {
            points: ring.into_points(),
            ring_ends: vec![len],
        }
    }

    /// All points, exterior first.
    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// Cumulative end offset of each ring.
    #[must_use]
    pub fn ring_ends(&self) -> &[usize] {
        &self.ring_ends
    }

    /// Index ranges of each ring, exterior first.
    pub fn rings(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        self.ring_ends.iter().scan(0, |start, &end| {
            let range = *start..end;
            *start = end;
            Some(range)
        })
    }

    /// The exterior ring's points.
    #[must_use]
    pub fn exterior(&self) -> &[Point2] {
        &self.points[..self.ring_ends[0]]
    }

    /// Total number of points across all rings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false` for a constructed polygon.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of hole rings.
    #[must_use]
    pub fn hole_count(&self) -> usize {
        self.ring_ends.len() - 1
    }

    /// Triangle count of any triangulation that uses exactly the ring
    /// vertices: `n + 2h - 2`.
    #[must_use]
    pub fn expected_triangle_count(&self) -> usize {
        self.len() + 2 * self.hole_count() - 2
    }
}
