use crate::error::{GeometryError, Result, SpecError};
use crate::geometry::Mesh;
use crate::math::Point3;
use crate::tessellation::FlatPolygon;

/// Extrudes a triangulated flat polygon along +z into a closed mesh.
///
/// Vertices are the polygon's points at `z_offset` followed by the same
/// points at `z_offset + height`. Faces are the bottom cap, the top cap,
/// then the walls of each ring in ring order.
pub struct Extrude {
    z_offset: f64,
    height: f64,
}

impl Extrude {
    /// Creates a new `Extrude` operation.
    #[must_use]
    pub fn new(z_offset: f64, height: f64) -> Self {
        Self { z_offset, height }
    }

    /// Executes the extrusion.
    ///
    /// `cap` must hold triangles over `polygon`'s points wound clockwise
    /// when seen from +z; they become the bottom cap as given.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError`] if the height is not a positive finite number
    /// or the offset is not finite, and
    /// [`GeometryError::IndexOutOfRange`] if a cap triangle references a
    /// point the polygon does not have.
    #[allow(clippy::cast_possible_truncation)]
    pub fn execute(&self, polygon: &FlatPolygon, cap: &[[u32; 3]]) -> Result<Mesh> {
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(SpecError::NonPositiveHeight(self.height).into());
        }
        if !self.z_offset.is_finite() {
            return Err(SpecError::NonFiniteOffset(self.z_offset).into());
        }

        let points = polygon.points();
        let len = points.len();
        if let Some(&index) = cap.iter().flatten().find(|&&i| i as usize >= len) {
            return Err(GeometryError::IndexOutOfRange { index, len }.into());
        }

        let n = len as u32;
        let top_z = self.z_offset + self.height;
        let mut vertices = Vec::with_capacity(2 * len);
        vertices.extend(points.iter().map(|p| Point3::new(p.x, p.y, self.z_offset)));
        vertices.extend(points.iter().map(|p| Point3::new(p.x, p.y, top_z)));

        let mut faces = Vec::with_capacity(2 * cap.len() + 2 * len);
        faces.extend_from_slice(cap);
        faces.extend(cap.iter().map(|&[a, b, c]| [a + n, c + n, b + n]));

        for (ring, range) in polygon.rings().enumerate() {
            let start = range.start as u32;
            let count = range.len() as u32;
            for k in 0..count {
                let i = start + k;
                let j = start + (k + 1) % count;
                if ring == 0 {
                    faces.push([i, j, n + i]);
                    faces.push([j, n + j, n + i]);
                } else {
                    faces.push([i, n + i, j]);
                    faces.push([j, n + i, n + j]);
                }
            }
        }

        Ok(Mesh { vertices, faces })
    }
}
