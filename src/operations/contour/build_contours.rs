use tracing::{debug, warn};

use crate::config::PipelineConfig;
use crate::error::{ContourError, Result};
use crate::geometry::{CurvePath, RawCurve, Ring};
use crate::math::polygon_2d::{distance_2d, ensure_finite};
use crate::math::{CLOSE_EPSILON, TOLERANCE};

use super::join_segments::join_open_paths;

/// Extracts closed rings from the raw curves of one layer.
///
/// Curves that do not form a valid boundary are skipped; they never fail the
/// layer as a whole.
pub struct BuildContours {
    circle_segments: usize,
    close_epsilon: f64,
    join_open_segments: bool,
}

impl BuildContours {
    /// Creates a `BuildContours` operation with the given settings.
    #[must_use]
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            circle_segments: config.circle_segments,
            close_epsilon: config.close_epsilon,
            join_open_segments: config.join_open_segments,
        }
    }

    /// Executes the extraction, returning rings in curve order.
    ///
    /// With segment joining enabled, loops assembled from open pieces follow
    /// the rings of curves that were closed on their own.
    #[must_use]
    pub fn execute(&self, curves: &[RawCurve]) -> Vec<Ring> {
        let mut rings = Vec::new();
        let mut open_paths = Vec::new();

        for (index, curve) in curves.iter().enumerate() {
            let path = match curve.sample(self.circle_segments) {
                Ok(path) => path,
                Err(e) => {
                    warn!(curve = index, error = %e, "skipping curve");
                    continue;
                }
            };
            if self.join_open_segments && !path.closed {
                open_paths.push(path.points);
                continue;
            }
            self.push_ring(&mut rings, path, index);
        }

        if !open_paths.is_empty() {
            let joined = join_open_paths(open_paths, self.close_epsilon);
            debug!(loops = joined.len(), "joined open segments");
            for (index, path) in joined.into_iter().enumerate() {
                self.push_ring(&mut rings, path, curves.len() + index);
            }
        }

        debug!(curves = curves.len(), rings = rings.len(), "built contours");
        rings
    }

    fn push_ring(&self, rings: &mut Vec<Ring>, path: CurvePath, index: usize) {
        match close_ring(path, self.close_epsilon) {
            Ok(ring) => rings.push(ring),
            Err(e) => debug!(curve = index, error = %e, "curve is not a solid boundary"),
        }
    }
}

impl Default for BuildContours {
    fn default() -> Self {
        Self::new(&PipelineConfig::default())
    }
}

/// Applies the closing policy to a sampled path and finalizes it as a ring.
///
/// Paths flagged closed are trusted. An open path whose end lies within
/// `close_epsilon` of its start has its end snapped onto the start; any
/// other open path is rejected. Consecutive duplicate points and a repeated
/// closing point are then removed.
///
/// # Errors
///
/// Returns [`ContourError::OpenCurve`] for open paths,
/// [`ContourError::TooFewPoints`] when fewer than 3 distinct points remain,
/// [`ContourError::ZeroArea`] for collinear rings, and a geometry error for
/// non-finite coordinates.
pub fn close_ring(path: CurvePath, close_epsilon: f64) -> Result<Ring> {
    let CurvePath { mut points, closed } = path;
    ensure_finite(&points)?;

    if !closed {
        let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
            return Err(ContourError::TooFewPoints { found: 0 }.into());
        };
        let gap = distance_2d(&first, &last);
        if gap >= close_epsilon {
            return Err(ContourError::OpenCurve { gap }.into());
        }
        if let Some(end) = points.last_mut() {
            *end = first;
        }
    }

    points.dedup();
    while points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    if points.len() < 3 {
        return Err(ContourError::TooFewPoints { found: points.len() }.into());
    }

    let ring = Ring::new(points)?;
    if ring.area() < TOLERANCE {
        return Err(ContourError::ZeroArea.into());
    }
    Ok(ring)
}

/// [`close_ring`] with the default closing distance.
///
/// # Errors
///
/// Same as [`close_ring`].
pub fn close_ring_default(path: CurvePath) -> Result<Ring> {
    close_ring(path, CLOSE_EPSILON)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ExtrudoError;

    fn open(coords: &[(f64, f64)]) -> CurvePath {
        match RawCurve::polyline(coords, false) {
            RawCurve::Polyline { points, closed } => CurvePath { points, closed },
            _ => unreachable!(),
        }
    }

    #[test]
    fn closed_polyline_is_trusted() {
        let curves = vec![RawCurve::polyline(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)], true)];
        let rings = BuildContours::default().execute(&curves);
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].len(), 4);
    }

    #[test]
    fn nearly_closed_polyline_is_snapped() {
        let path = open(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0005, 0.0)]);
        let ring = close_ring_default(path).unwrap();
        assert_eq!(ring.len(), 4);
        assert!((ring.area() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn explicitly_repeated_start_point_is_dropped() {
        let path = open(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]);
        let ring = close_ring_default(path).unwrap();
        assert_eq!(ring.len(), 3);
    }

    #[test]
    fn open_polyline_is_rejected() {
        let path = open(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        let err = close_ring_default(path).unwrap_err();
        assert!(matches!(err, ExtrudoError::Contour(ContourError::OpenCurve { .. })));
    }

    #[test]
    fn duplicates_are_removed_before_counting() {
        let curves = vec![RawCurve::polyline(&[(0.0, 0.0), (0.0, 0.0), (5.0, 5.0), (5.0, 5.0)], true)];
        let rings = BuildContours::default().execute(&curves);
        assert!(rings.is_empty());
    }

    #[test]
    fn collinear_ring_is_rejected() {
        let path = CurvePath {
            points: vec![
                crate::math::Point2::new(0.0, 0.0),
                crate::math::Point2::new(1.0, 0.0),
                crate::math::Point2::new(2.0, 0.0),
            ],
            closed: true,
        };
        assert!(close_ring_default(path).is_err());
    }

    #[test]
    fn lone_line_yields_nothing() {
        let rings = BuildContours::default().execute(&[RawCurve::line(0.0, 0.0, 5.0, 0.0)]);
        assert!(rings.is_empty());
    }

    #[test]
    fn circle_becomes_32_point_ring() {
        let rings = BuildContours::default().execute(&[RawCurve::circle(0.0, 0.0, 1.0)]);
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].len(), 32);
    }

    #[test]
    fn bad_curves_do_not_stop_the_layer() {
        let curves = vec![
            RawCurve::circle(0.0, 0.0, -1.0),
            RawCurve::polyline(&[(0.0, 0.0), (f64::NAN, 0.0), (1.0, 1.0)], true),
            RawCurve::polyline(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0)], true),
        ];
        let rings = BuildContours::default().execute(&curves);
        assert_eq!(rings.len(), 1);
    }

    #[test]
    fn joined_lines_form_a_square() {
        let config = PipelineConfig::default().with_join_open_segments(true);
        let curves = vec![
            RawCurve::line(0.0, 0.0, 10.0, 0.0),
            RawCurve::line(10.0, 10.0, 10.0, 0.0),
            RawCurve::line(10.0, 10.0, 0.0, 10.0),
            RawCurve::line(0.0, 10.0, 0.0, 0.0),
        ];
        let rings = BuildContours::new(&config).execute(&curves);
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].len(), 4);
        assert!((rings[0].area() - 100.0).abs() < 1e-9);
    }
}
