use std::collections::HashMap;

use crate::geometry::Mesh;
use crate::math::Vector3;

/// Checks that a mesh is a closed, consistently wound surface.
///
/// Every directed edge `a -> b` must appear exactly once and be matched by
/// exactly one `b -> a`. Faces must have three distinct in-range indices.
pub struct IsClosed<'a> {
    mesh: &'a Mesh,
}

impl<'a> IsClosed<'a> {
    /// Creates a new `IsClosed` query.
    #[must_use]
    pub fn new(mesh: &'a Mesh) -> Self {
        Self { mesh }
    }

    /// Executes the check.
    #[must_use]
    pub fn execute(&self) -> bool {
        let len = self.mesh.vertices.len();
        let mut edges: HashMap<(u32, u32), usize> = HashMap::with_capacity(self.mesh.faces.len() * 3);

        for &[a, b, c] in &self.mesh.faces {
            if a == b || b == c || a == c || [a, b, c].iter().any(|&i| i as usize >= len) {
                return false;
            }
            for edge in [(a, b), (b, c), (c, a)] {
                *edges.entry(edge).or_default() += 1;
            }
        }

        !edges.is_empty()
            && edges
                .iter()
                .all(|(&(a, b), &count)| count == 1 && edges.get(&(b, a)) == Some(&1))
    }
}

/// Sums the area-weighted normals of every face.
///
/// Zero for any closed surface, whatever its shape.
pub struct NormalSum<'a> {
    mesh: &'a Mesh,
}

impl<'a> NormalSum<'a> {
    /// Creates a new `NormalSum` query.
    #[must_use]
    pub fn new(mesh: &'a Mesh) -> Self {
        Self { mesh }
    }

    /// Executes the query. Each face contributes `(v1 - v0) x (v2 - v0) / 2`.
    #[must_use]
    pub fn execute(&self) -> Vector3 {
        self.mesh.faces.iter().fold(Vector3::zeros(), |acc, face| {
            let [v0, v1, v2] = self.mesh.triangle(face);
            acc + (v1 - v0).cross(&(v2 - v0)) * 0.5
        })
    }
}
