use crate::math::Point3;

/// An indexed triangle mesh.
///
/// Faces are wound so that `(v1 - v0) x (v2 - v0)` points out of the solid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions.
    pub vertices: Vec<Point3>,
    /// Triangle indices (each triple defines a triangle).
    pub faces: Vec<[u32; 3]>,
}

impl Mesh {
    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Returns the three corner positions of a face.
    #[must_use]
    pub fn triangle(&self, face: &[u32; 3]) -> [Point3; 3] {
        face.map(|i| self.vertices[i as usize])
    }
}
