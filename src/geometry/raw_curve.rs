use std::f64::consts::TAU;

use crate::error::{ContourError, Result};
use crate::math::polygon_2d::ensure_finite;
use crate::math::Point2;

/// Number of sides used to approximate circles.
pub const CIRCLE_SEGMENTS: usize = 32;

/// A planar curve as delivered by the drawing source for one layer.
///
/// Coordinates are the document's XY plane with Z already dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCurve {
    /// A straight segment.
    Line { start: Point2, end: Point2 },
    /// An ordered point sequence, optionally flagged closed by the source.
    Polyline { points: Vec<Point2>, closed: bool },
    /// A full circle.
    Circle { center: Point2, radius: f64 },
    /// A circular arc running counter-clockwise from `start_angle` to
    /// `end_angle`, both in degrees.
    Arc {
        center: Point2,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    },
}

/// The sampled point sequence of a curve, before any closing policy is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct CurvePath {
    pub points: Vec<Point2>,
    /// Whether the source guarantees the path is closed.
    pub closed: bool,
}

impl RawCurve {
    /// Creates a line from `(x0, y0)` to `(x1, y1)`.
    #[must_use]
    pub fn line(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self::Line {
            start: Point2::new(x0, y0),
            end: Point2::new(x1, y1),
        }
    }

    /// Creates a polyline from coordinate pairs.
    #[must_use]
    pub fn polyline(coords: &[(f64, f64)], closed: bool) -> Self {
        Self::Polyline {
            points: coords.iter().map(|&(x, y)| Point2::new(x, y)).collect(),
            closed,
        }
    }

    /// Creates a circle.
    #[must_use]
    pub fn circle(cx: f64, cy: f64, radius: f64) -> Self {
        Self::Circle {
            center: Point2::new(cx, cy),
            radius,
        }
    }

    /// Samples the curve into a point path.
    ///
    /// Circles become a regular `segments`-gon starting at angle zero. Arcs
    /// get a proportional share of `segments` over their sweep, always
    /// including both end points.
    ///
    /// # Errors
    ///
    /// Returns [`ContourError::NonPositiveRadius`] for circles and arcs whose
    /// radius is not positive, and a geometry error for non-finite input.
    pub fn sample(&self, segments: usize) -> Result<CurvePath> {
        let segments = segments.max(3);
        let path = match self {
            Self::Line { start, end } => CurvePath {
                points: vec![*start, *end],
                closed: false,
            },
            Self::Polyline { points, closed } => CurvePath {
                points: points.clone(),
                closed: *closed,
            },
            Self::Circle { center, radius } => {
                check_radius(*radius)?;
                #[allow(clippy::cast_precision_loss)]
                let points = (0..segments)
                    .map(|i| {
                        let angle = (i as f64 / segments as f64) * TAU;
                        Point2::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
                    })
                    .collect();
                CurvePath { points, closed: true }
            }
            Self::Arc {
                center,
                radius,
                start_angle,
                end_angle,
            } => {
                check_radius(*radius)?;
                let sweep = normalized_sweep(*start_angle, *end_angle);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let steps = ((segments as f64 * sweep / 360.0).ceil() as usize).max(1);
                let start = start_angle.to_radians();
                let sweep = sweep.to_radians();
                #[allow(clippy::cast_precision_loss)]
                let points = (0..=steps)
                    .map(|j| {
                        let angle = start + sweep * (j as f64 / steps as f64);
                        Point2::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
                    })
                    .collect();
                CurvePath {
                    points,
                    closed: false,
                }
            }
        };
        ensure_finite(&path.points)?;
        Ok(path)
    }
}

fn check_radius(radius: f64) -> Result<()> {
    if radius > 0.0 && radius.is_finite() {
        Ok(())
    } else {
        Err(ContourError::NonPositiveRadius(radius).into())
    }
}

/// Counter-clockwise sweep from `start` to `end` in degrees, in `(0, 360]`.
fn normalized_sweep(start: f64, end: f64) -> f64 {
    let sweep = (end - start).rem_euclid(360.0);
    if sweep == 0.0 {
        360.0
    } else {
        sweep
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::TOLERANCE;

    #[test]
    fn circle_is_closed_32_gon_from_angle_zero() {
        let path = RawCurve::circle(1.0, 2.0, 3.0).sample(CIRCLE_SEGMENTS).unwrap();
        assert!(path.closed);
        assert_eq!(path.points.len(), 32);
        assert!((path.points[0] - Point2::new(4.0, 2.0)).norm() < TOLERANCE);
        assert!((path.points[8] - Point2::new(1.0, 5.0)).norm() < 1e-9);
    }

    #[test]
    fn circle_rejects_zero_radius() {
        assert!(RawCurve::circle(0.0, 0.0, 0.0).sample(CIRCLE_SEGMENTS).is_err());
        assert!(RawCurve::circle(0.0, 0.0, -1.0).sample(CIRCLE_SEGMENTS).is_err());
    }

    #[test]
    fn line_is_open_two_point_path() {
        let path = RawCurve::line(0.0, 0.0, 1.0, 0.0).sample(CIRCLE_SEGMENTS).unwrap();
        assert!(!path.closed);
        assert_eq!(path.points.len(), 2);
    }

    #[test]
    fn quarter_arc_samples_proportionally() {
        let arc = RawCurve::Arc {
            center: Point2::origin(),
            radius: 1.0,
            start_angle: 0.0,
            end_angle: 90.0,
        };
        let path = arc.sample(CIRCLE_SEGMENTS).unwrap();
        assert!(!path.closed);
        assert_eq!(path.points.len(), 9);
        assert!((path.points[8] - Point2::new(0.0, 1.0)).norm() < 1e-9);
    }

    #[test]
    fn full_arc_ends_on_its_start() {
        let arc = RawCurve::Arc {
            center: Point2::origin(),
            radius: 2.0,
            start_angle: 45.0,
            end_angle: 45.0,
        };
        let path = arc.sample(CIRCLE_SEGMENTS).unwrap();
        let first = path.points[0];
        let last = path.points[path.points.len() - 1];
        assert!((first - last).norm() < 1e-9);
    }

    #[test]
    fn nan_polyline_is_rejected() {
        let curve = RawCurve::polyline(&[(0.0, 0.0), (f64::NAN, 1.0), (1.0, 1.0)], true);
        assert!(curve.sample(CIRCLE_SEGMENTS).is_err());
    }
}
