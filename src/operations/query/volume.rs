use crate::geometry::{Mesh, PolygonWithHoles};

/// Volume of a polygon extruded by `height`: its area (exterior minus holes,
/// by the shoelace formula) times the height.
#[must_use]
pub fn exact_volume(polygon: &PolygonWithHoles, height: f64) -> f64 {
    polygon.area() * height
}

/// Volume reported when no true difference was computed.
///
/// `effective_area` is the exterior area minus every cut area, already
/// clamped at zero.
#[must_use]
pub fn approximate_volume(effective_area: f64, height: f64) -> f64 {
    effective_area.max(0.0) * height
}

/// Computes the enclosed volume of a closed mesh.
///
/// Uses the signed tetrahedron method. For each triangle, computes
/// `(1/6) * v0 . (v1 x v2)` and sums over all triangles. The result is
/// positive when faces are wound outward.
pub struct MeshVolume<'a> {
    mesh: &'a Mesh,
}

impl<'a> MeshVolume<'a> {
    /// Creates a new `MeshVolume` query.
    #[must_use]
    pub fn new(mesh: &'a Mesh) -> Self {
        Self { mesh }
    }

    /// Executes the query, returning the signed volume.
    #[must_use]
    pub fn execute(&self) -> f64 {
        let sum: f64 = self
            .mesh
            .faces
            .iter()
            .map(|face| {
                let [v0, v1, v2] = self.mesh.triangle(face);
                v0.coords.dot(&v1.coords.cross(&v2.coords))
            })
            .sum();
        sum / 6.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::geometry::Ring;
    use crate::math::Point3;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn exact_volume_subtracts_holes() {
        let square = |min: f64, max: f64| Ring::from_coords(&[(min, min), (max, min), (max, max), (min, max)]).unwrap();
        let poly = PolygonWithHoles::new(square(0.0, 10.0), vec![square(4.0, 6.0)]);
        assert_relative_eq!(exact_volume(&poly, 2.0), 192.0);
    }

    #[test]
    fn approximate_volume_scales_area() {
        assert_relative_eq!(approximate_volume(68.0, 1.0), 68.0);
        assert_relative_eq!(approximate_volume(-3.0, 2.0), 0.0);
    }

    #[test]
    fn tetrahedron_volume() {
        let mesh = Mesh {
            vertices: vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0), p(0.0, 0.0, 1.0)],
            faces: vec![[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]],
        };
        assert_relative_eq!(MeshVolume::new(&mesh).execute(), 1.0 / 6.0, epsilon = 1e-12);
    }

    #[test]
    fn inverted_mesh_is_negative() {
        let mesh = Mesh {
            vertices: vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0), p(0.0, 0.0, 1.0)],
            faces: vec![[0, 1, 2], [0, 3, 1], [0, 2, 3], [1, 3, 2]],
        };
        assert!(MeshVolume::new(&mesh).execute() < 0.0);
    }
}
