use crate::error::{ContourError, Result};
use crate::math::polygon_2d::{ensure_finite, ring_area_2d, signed_area_2d};
use crate::math::Point2;

/// An implicitly closed loop of 2D points.
///
/// Holds at least 3 points with no consecutive duplicates and no repeated
/// closing point. Orientation is preserved as given; counter-clockwise rings
/// have positive signed area.
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    points: Vec<Point2>,
}

impl Ring {
    /// Creates a ring from points that are already deduplicated.
    ///
    /// # Errors
    ///
    /// Returns [`ContourError::TooFewPoints`] for fewer than 3 points, or a
    /// geometry error if any coordinate is non-finite.
    pub fn new(points: Vec<Point2>) -> Result<Self> {
        if points.len() < 3 {
            return Err(ContourError::TooFewPoints { found: points.len() }.into());
        }
        ensure_finite(&points)?;
        Ok(Self { points })
    }

    /// Creates a ring from coordinate pairs.
    ///
    /// # Errors
    ///
    /// Same as [`Ring::new`].
    pub fn from_coords(coords: &[(f64, f64)]) -> Result<Self> {
        Self::new(coords.iter().map(|&(x, y)| Point2::new(x, y)).collect())
    }

    /// Returns the ring's points in order.
    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// Returns the number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`: a ring has at least three points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Signed shoelace area.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        signed_area_2d(&self.points)
    }

    /// Unsigned shoelace area.
    #[must_use]
    pub fn area(&self) -> f64 {
        ring_area_2d(&self.points)
    }

    /// Returns `true` if the ring winds counter-clockwise.
    #[must_use]
    pub fn is_ccw(&self) -> bool {
        self.signed_area() > 0.0
    }

    /// Returns this ring wound counter-clockwise.
    #[must_use]
    pub fn into_ccw(mut self) -> Self {
        if !self.is_ccw() {
            self.points.reverse();
        }
        self
    }

    /// Consumes the ring, returning its points.
    #[must_use]
    pub fn into_points(self) -> Vec<Point2> {
        self.points
    }
}

/// An exterior ring with zero or more holes strictly inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonWithHoles {
    pub exterior: Ring,
    pub holes: Vec<Ring>,
}

impl PolygonWithHoles {
    /// Creates a polygon.
    #[must_use]
    pub fn new(exterior: Ring, holes: Vec<Ring>) -> Self {
        Self { exterior, holes }
    }

    /// Creates a polygon without holes.
    #[must_use]
    pub fn solid(exterior: Ring) -> Self {
        Self {
            exterior,
            holes: Vec::new(),
        }
    }

    /// Material area: exterior area minus the area of every hole.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.exterior.area() - self.holes.iter().map(Ring::area).sum::<f64>()
    }

    /// Total point count across all rings.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.exterior.len() + self.holes.iter().map(Ring::len).sum::<usize>()
    }
}
