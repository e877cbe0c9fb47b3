use crate::error::{Result, TriangulationError};

use super::{FlatPolygon, Triangulator};

/// Fan triangulation of the exterior ring around its first vertex.
///
/// Holes are ignored and concave rings produce overlapping triangles. Used
/// by the approximate engine and as the last-resort cap when the configured
/// triangulator fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct FanTriangulator;

impl Triangulator for FanTriangulator {
    #[allow(clippy::cast_possible_truncation)]
    fn triangulate(&self, polygon: &FlatPolygon) -> Result<Vec<[u32; 3]>> {
        let n = polygon.exterior().len();
        if n < 3 {
            return Err(TriangulationError::DegenerateRing(format!("fan needs 3 points, found {n}")).into());
        }
        Ok((1..n - 1).map(|i| [0, i as u32 + 1, i as u32]).collect())
    }
}
