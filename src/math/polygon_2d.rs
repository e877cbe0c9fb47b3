use super::{cross, Point2};
use crate::error::{GeometryError, Result};

/// Computes the signed area of a closed ring (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise. The closing edge
/// from the last point back to the first is implied.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Unsigned area of a closed ring.
#[must_use]
pub fn ring_area_2d(points: &[Point2]) -> f64 {
    signed_area_2d(points).abs()
}

/// Returns `true` if `p` lies inside or on the boundary of triangle `(a, b, c)`.
///
/// Works for either winding of the triangle.
#[must_use]
pub fn point_in_triangle(a: &Point2, b: &Point2, c: &Point2, p: &Point2) -> bool {
    let d1 = cross(a, b, p);
    let d2 = cross(b, c, p);
    let d3 = cross(c, a, p);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

/// Euclidean distance between two points.
#[must_use]
pub fn distance_2d(a: &Point2, b: &Point2) -> f64 {
    (b - a).norm()
}

/// Checks that every coordinate is finite.
///
/// # Errors
///
/// Returns [`GeometryError::NonFinite`] for the first NaN or infinite point.
pub fn ensure_finite(points: &[Point2]) -> Result<()> {
    match points.iter().find(|p| !p.x.is_finite() || !p.y.is_finite()) {
        Some(p) => Err(GeometryError::NonFinite { x: p.x, y: p.y }.into()),
        None => Ok(()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::TOLERANCE;

    fn square() -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ]
    }

    #[test]
    fn signed_area_ccw_square() {
        assert!((signed_area_2d(&square()) - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn signed_area_cw_square() {
        let mut pts = square();
        pts.reverse();
        assert!((signed_area_2d(&pts) + 1.0).abs() < TOLERANCE);
        assert!((ring_area_2d(&pts) - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn signed_area_degenerate() {
        assert!((signed_area_2d(&[Point2::new(0.0, 0.0)])).abs() < TOLERANCE);
        assert!((signed_area_2d(&[])).abs() < TOLERANCE);
    }

    #[test]
    fn point_in_triangle_either_winding() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(4.0, 0.0);
        let c = Point2::new(0.0, 4.0);
        let inside = Point2::new(1.0, 1.0);
        let outside = Point2::new(3.0, 3.0);
        assert!(point_in_triangle(&a, &b, &c, &inside));
        assert!(point_in_triangle(&a, &c, &b, &inside));
        assert!(!point_in_triangle(&a, &b, &c, &outside));
        // Boundary points count as inside.
        assert!(point_in_triangle(&a, &b, &c, &Point2::new(2.0, 0.0)));
    }

    #[test]
    fn ensure_finite_rejects_nan() {
        let pts = vec![Point2::new(0.0, 0.0), Point2::new(f64::NAN, 1.0)];
        assert!(ensure_finite(&pts).is_err());
        assert!(ensure_finite(&square()).is_ok());
    }
}
