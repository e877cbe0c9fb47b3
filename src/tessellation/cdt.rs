use std::collections::{HashMap, HashSet, VecDeque};

use spade::handles::{FixedFaceHandle, FixedVertexHandle, InnerTag};
use spade::{ConstrainedDelaunayTriangulation, InsertionError, Point2 as SpadePoint2, Triangulation};

use crate::error::{Result, TriangulationError};

use super::{FlatPolygon, Triangulator};

type Cdt = ConstrainedDelaunayTriangulation<SpadePoint2<f64>>;

/// Constrained Delaunay triangulator backed by `spade`.
///
/// Every ring is inserted as a closed loop of constraint edges, then the
/// faces inside the polygon are found by flood-filling from the convex hull
/// and counting constraint crossings.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstrainedDelaunay;

impl Triangulator for ConstrainedDelaunay {
    #[allow(clippy::cast_possible_truncation)]
    fn triangulate(&self, polygon: &FlatPolygon) -> Result<Vec<[u32; 3]>> {
        let points = polygon.points();
        let mut cdt = Cdt::new();
        let mut vertex_map: HashMap<usize, u32> = HashMap::with_capacity(points.len());

        for range in polygon.rings() {
            let mut handles = Vec::with_capacity(range.len());
            for i in range {
                let p = points[i];
                let handle = insert_unique(&mut cdt, SpadePoint2::new(p.x, p.y))?;
                vertex_map.insert(handle.index(), i as u32);
                handles.push(handle);
            }
            insert_constraint_loop(&mut cdt, &handles)?;
        }

        let interior = classify_interior_faces(&cdt);
        let mut triangles = Vec::with_capacity(polygon.expected_triangle_count());
        for face in cdt.inner_faces() {
            if !interior.contains(&face.fix().index()) {
                continue;
            }
            let [a, b, c] = face.vertices().map(|v| vertex_map.get(&v.fix().index()).copied());
            let (Some(a), Some(b), Some(c)) = (a, b, c) else {
                return Err(TriangulationError::Constraint("face references an unknown vertex".into()).into());
            };
            // spade faces are counter-clockwise
            triangles.push([a, c, b]);
        }

        Ok(triangles)
    }
}

/// Inserts a point, failing if it coincides with one already present.
fn insert_unique(cdt: &mut Cdt, point: SpadePoint2<f64>) -> Result<FixedVertexHandle> {
    let before = cdt.num_vertices();
    let handle = cdt
        .insert(point)
        .map_err(|e: InsertionError| TriangulationError::Constraint(format!("insert: {e}")))?;
    if cdt.num_vertices() == before {
        return Err(TriangulationError::DegenerateRing(format!(
            "duplicate vertex at ({}, {})",
            point.x, point.y
        ))
        .into());
    }
    Ok(handle)
}

/// Adds the closed loop through `handles` as constraint edges.
fn insert_constraint_loop(cdt: &mut Cdt, handles: &[FixedVertexHandle]) -> Result<()> {
    if handles.len() < 3 {
        return Err(TriangulationError::DegenerateRing("constraint loop needs at least 3 points".into()).into());
    }

    for i in 0..handles.len() {
        let from = handles[i];
        let to = handles[(i + 1) % handles.len()];
        if !cdt.can_add_constraint(from, to) {
            return Err(TriangulationError::Constraint(format!(
                "edge {}-{} crosses an existing boundary",
                from.index(),
                to.index()
            ))
            .into());
        }
        cdt.add_constraint(from, to);
    }

    Ok(())
}

/// Collects the inner faces lying inside the constrained boundary.
///
/// Faces touching the convex hull start at depth 0 (or 1 across a
/// constraint). Crossing a constraint edge increments the depth; odd depth
/// is interior.
fn classify_interior_faces(cdt: &Cdt) -> HashSet<usize> {
    let mut interior = HashSet::new();
    let mut depth_map: HashMap<usize, u32> = HashMap::new();
    let mut queue: VecDeque<(FixedFaceHandle<InnerTag>, u32)> = VecDeque::new();

    let outer = cdt.outer_face().fix();
    for edge in cdt.directed_edges() {
        if edge.face().fix() != outer {
            continue;
        }
        let Some(inner) = edge.rev().face().as_inner() else {
            continue;
        };
        let idx = inner.fix().index();
        if depth_map.contains_key(&idx) {
            continue;
        }
        let depth = u32::from(cdt.is_constraint_edge(edge.as_undirected().fix()));
        depth_map.insert(idx, depth);
        if depth % 2 == 1 {
            interior.insert(idx);
        }
        queue.push_back((inner.fix(), depth));
    }

    while let Some((face, depth)) = queue.pop_front() {
        for edge in cdt.face(face).adjacent_edges() {
            let Some(neighbor) = edge.rev().face().as_inner() else {
                continue;
            };
            let idx = neighbor.fix().index();
            if depth_map.contains_key(&idx) {
                continue;
            }
            let depth = depth + u32::from(cdt.is_constraint_edge(edge.as_undirected().fix()));
            depth_map.insert(idx, depth);
            if depth % 2 == 1 {
                interior.insert(idx);
            }
            queue.push_back((neighbor.fix(), depth));
        }
    }

    interior
}
