use crate::error::{Result, TriangulationError};
use crate::math::polygon_2d::{point_in_triangle, signed_area_2d};
use crate::math::{cross, Point2};

use super::{FlatPolygon, Triangulator};

/// Ear-clipping triangulator for polygons with holes.
///
/// Each hole is joined to the outer boundary by a zero-width bridge from its
/// leftmost vertex, turning the polygon into one weakly simple loop with
/// `n + 2h` vertices. Ears are then clipped until two vertices remain, so
/// the output always has `n + 2h - 2` triangles and none of them is
/// degenerate. No vertices are added or dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct EarClipper;

impl Triangulator for EarClipper {
    fn triangulate(&self, polygon: &FlatPolygon) -> Result<Vec<[u32; 3]>> {
        let points = polygon.points();
        let mut list = NodeList::with_capacity(polygon.len() + 2 * polygon.hole_count());
        let mut rings = polygon.rings();

        let Some(outer_range) = rings.next() else {
            return Err(TriangulationError::DegenerateRing("polygon has no rings".into()).into());
        };
        let outer = list.link(points, outer_range, true)?;

        let mut holes = Vec::with_capacity(polygon.hole_count());
        for (hole_index, range) in rings.enumerate() {
            let start = list.link(points, range, false)?;
            holes.push((hole_index, list.leftmost(start)));
        }
        holes.sort_by(|&(_, a), &(_, b)| {
            let (a, b) = (list.pos(a), list.pos(b));
            a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y))
        });

        for (hole_index, hole) in holes {
            let bridge = list
                .find_hole_bridge(hole, outer)
                .ok_or(TriangulationError::NoHoleBridge { hole: hole_index })?;
            list.split(bridge, hole);
        }

        list.clip_ears(outer, polygon.expected_triangle_count())
    }
}

#[derive(Debug, Clone, Copy)]
struct Node {
    /// Index into the flat polygon's point list.
    index: u32,
    pos: Point2,
    prev: usize,
    next: usize,
}

/// Circular doubly linked vertex list backed by a vector.
struct NodeList {
    nodes: Vec<Node>,
}

impl NodeList {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    fn pos(&self, id: usize) -> Point2 {
        self.nodes[id].pos
    }

    fn prev(&self, id: usize) -> usize {
        self.nodes[id].prev
    }

    fn next(&self, id: usize) -> usize {
        self.nodes[id].next
    }

    /// Links one ring, wound counter-clockwise when `ccw` is set and
    /// clockwise otherwise. Returns the last inserted node.
    #[allow(clippy::cast_possible_truncation)]
    fn link(&mut self, points: &[Point2], range: std::ops::Range<usize>, ccw: bool) -> Result<usize> {
        let forward = (signed_area_2d(&points[range.clone()]) > 0.0) == ccw;
        let mut order: Vec<usize> = range.collect();
        if !forward {
            order.reverse();
        }

        let mut last = None;
        for i in order {
            last = Some(self.insert(i as u32, points[i], last));
        }
        last.ok_or_else(|| TriangulationError::DegenerateRing("empty ring".into()).into())
    }

    fn insert(&mut self, index: u32, pos: Point2, after: Option<usize>) -> usize {
        let id = self.nodes.len();
        match after {
            None => self.nodes.push(Node {
                index,
                pos,
                prev: id,
                next: id,
            }),
            Some(a) => {
                let next = self.nodes[a].next;
                self.nodes.push(Node {
                    index,
                    pos,
                    prev: a,
                    next,
                });
                self.nodes[a].next = id;
                self.nodes[next].prev = id;
            }
        }
        id
    }

    fn remove(&mut self, id: usize) {
        let Node { prev, next, .. } = self.nodes[id];
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
    }

    fn ring_len(&self, start: usize) -> usize {
        let mut count = 1;
        let mut p = self.next(start);
        while p != start {
            count += 1;
            p = self.next(p);
        }
        count
    }

    /// Leftmost node of a ring, lowest first on ties.
    fn leftmost(&self, start: usize) -> usize {
        let mut best = start;
        let mut p = self.next(start);
        while p != start {
            let (pp, bp) = (self.pos(p), self.pos(best));
            if pp.x < bp.x || (pp.x == bp.x && pp.y < bp.y) {
                best = p;
            }
            p = self.next(p);
        }
        best
    }

    /// Finds an outer vertex visible from the hole's leftmost vertex.
    ///
    /// Casts a ray from the hole vertex towards -x, takes the closest outer
    /// edge it hits, and picks that edge's left end point. If other vertices
    /// lie inside the triangle spanned by the hole vertex, the hit point and
    /// that end point, the one making the smallest angle with the ray wins.
    #[allow(clippy::float_cmp)]
    fn find_hole_bridge(&self, hole: usize, outer: usize) -> Option<usize> {
        let h = self.pos(hole);
        if self.pos(outer) == h {
            return Some(outer);
        }

        let mut p = outer;
        let mut qx = f64::NEG_INFINITY;
        let mut candidate = None;
        loop {
            let (a, next) = (self.pos(p), self.next(p));
            let b = self.pos(next);
            if b == h {
                return Some(next);
            }
            if h.y <= a.y && h.y >= b.y && b.y != a.y {
                let x = a.x + (h.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if x <= h.x && x > qx {
                    qx = x;
                    candidate = Some(if a.x < b.x { p } else { next });
                    if x == h.x {
                        return candidate;
                    }
                }
            }
            p = next;
            if p == outer {
                break;
            }
        }

        let mut m = candidate?;
        let stop = m;
        let mp = self.pos(m);
        let tri_a = Point2::new(if h.y < mp.y { h.x } else { qx }, h.y);
        let tri_c = Point2::new(if h.y < mp.y { qx } else { h.x }, h.y);
        let mut tan_min = f64::INFINITY;

        p = m;
        loop {
            let pos = self.pos(p);
            if h.x >= pos.x && pos.x >= mp.x && h.x != pos.x && point_in_triangle(&tri_a, &mp, &tri_c, &pos) {
                let tan = (h.y - pos.y).abs() / (h.x - pos.x);
                let best = self.pos(m);
                let better = tan < tan_min
                    || (tan == tan_min
                        && (pos.x > best.x || (pos.x == best.x && self.sector_contains_sector(m, p))));
                if self.locally_inside(p, hole) && better {
                    m = p;
                    tan_min = tan;
                }
            }
            p = self.next(p);
            if p == stop {
                break;
            }
        }

        Some(m)
    }

    /// Whether the diagonal from node `a` towards node `b` starts inside the
    /// polygon at `a`.
    fn locally_inside(&self, a: usize, b: usize) -> bool {
        let (pa, na) = (self.pos(self.prev(a)), self.pos(self.next(a)));
        let (a, b) = (self.pos(a), self.pos(b));
        if cross(&pa, &a, &na) > 0.0 {
            cross(&a, &b, &na) <= 0.0 && cross(&a, &pa, &b) <= 0.0
        } else {
            cross(&a, &b, &pa) > 0.0 || cross(&a, &na, &b) > 0.0
        }
    }

    /// Whether the wedge at `m` contains the wedge at `p`.
    fn sector_contains_sector(&self, m: usize, p: usize) -> bool {
        let mp = self.pos(m);
        cross(&self.pos(self.prev(m)), &mp, &self.pos(self.prev(p))) > 0.0
            && cross(&self.pos(self.next(p)), &mp, &self.pos(self.next(m))) > 0.0
    }

    /// Joins hole node `b` to outer node `a` with a two-way bridge,
    /// duplicating both end points.
    fn split(&mut self, a: usize, b: usize) {
        let a2 = self.nodes.len();
        let b2 = a2 + 1;
        let (an, bp) = (self.next(a), self.prev(b));
        self.nodes.push(Node { prev: a2, next: a2, ..self.nodes[a] });
        self.nodes.push(Node { prev: b2, next: b2, ..self.nodes[b] });

        self.nodes[a].next = b;
        self.nodes[b].prev = a;

        self.nodes[a2].next = an;
        self.nodes[an].prev = a2;

        self.nodes[b2].next = a2;
        self.nodes[a2].prev = b2;

        self.nodes[bp].next = b2;
        self.nodes[b2].prev = bp;
    }

    /// Convex, non-degenerate, and no reflex vertex of the remaining loop
    /// lies inside it.
    fn is_ear(&self, ear: usize) -> bool {
        let (prev, next) = (self.prev(ear), self.next(ear));
        let (a, b, c) = (self.pos(prev), self.pos(ear), self.pos(next));
        if cross(&a, &b, &c) <= 0.0 {
            return false;
        }

        let mut p = self.next(next);
        while p != prev {
            let pos = self.pos(p);
            if pos != a
                && point_in_triangle(&a, &b, &c, &pos)
                && cross(&self.pos(self.prev(p)), &pos, &self.pos(self.next(p))) <= 0.0
            {
                return false;
            }
            p = self.next(p);
        }
        true
    }

    /// Clips ears until two vertices remain. Triangles are emitted clockwise.
    fn clip_ears(&mut self, start: usize, expected: usize) -> Result<Vec<[u32; 3]>> {
        let mut triangles = Vec::with_capacity(expected);
        let mut ear = start;
        let mut stop = ear;

        loop {
            let (prev, next) = (self.prev(ear), self.next(ear));
            if prev == next {
                break;
            }
            if self.is_ear(ear) {
                triangles.push([self.nodes[prev].index, self.nodes[next].index, self.nodes[ear].index]);
                self.remove(ear);
                ear = self.next(next);
                stop = ear;
                continue;
            }
            ear = next;
            if ear == stop {
                return Err(TriangulationError::NoEar {
                    remaining: self.ring_len(ear),
                }
                .into());
            }
        }

        Ok(triangles)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::{PolygonWithHoles, Ring};

    fn ring(coords: &[(f64, f64)]) -> Ring {
        Ring::from_coords(coords).unwrap()
    }

    fn square(min: f64, max: f64) -> Ring {
        ring(&[(min, min), (max, min), (max, max), (min, max)])
    }

    /// Sum of signed triangle areas; asserts every triangle is clockwise.
    fn cap_area(flat: &FlatPolygon, triangles: &[[u32; 3]]) -> f64 {
        let pts = flat.points();
        triangles
            .iter()
            .map(|t| {
                let area = cross(&pts[t[0] as usize], &pts[t[1] as usize], &pts[t[2] as usize]) * 0.5;
                assert!(area < 0.0, "triangle {t:?} is not clockwise (area {area})");
                -area
            })
            .sum()
    }

    #[test]
    fn square_gives_two_triangles() {
        let flat = FlatPolygon::from_exterior(&square(0.0, 10.0));
        let tris = EarClipper.triangulate(&flat).unwrap();
        assert_eq!(tris.len(), 2);
        assert!((cap_area(&flat, &tris) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn concave_l_shape() {
        let l = ring(&[(0.0, 0.0), (4.0, 0.0), (4.0, 2.0), (2.0, 2.0), (2.0, 4.0), (0.0, 4.0)]);
        let flat = FlatPolygon::from_exterior(&l);
        let tris = EarClipper.triangulate(&flat).unwrap();
        assert_eq!(tris.len(), 4);
        assert!((cap_area(&flat, &tris) - 12.0).abs() < 1e-9);
    }

    #[test]
    fn clockwise_input_is_handled() {
        let cw = ring(&[(0.0, 0.0), (0.0, 3.0), (3.0, 3.0), (3.0, 0.0)]);
        let flat = FlatPolygon::from_exterior(&cw);
        let tris = EarClipper.triangulate(&flat).unwrap();
        assert!((cap_area(&flat, &tris) - 9.0).abs() < 1e-9);
    }

    #[test]
    fn square_with_centered_hole() {
        let poly = PolygonWithHoles::new(square(0.0, 10.0), vec![square(4.0, 6.0)]);
        let flat = FlatPolygon::from_polygon(&poly);
        let tris = EarClipper.triangulate(&flat).unwrap();
        assert_eq!(tris.len(), 8);
        assert!((cap_area(&flat, &tris) - 96.0).abs() < 1e-9);
    }

    #[test]
    fn two_holes_follow_euler_count() {
        let poly = PolygonWithHoles::new(
            ring(&[(0.0, 0.0), (20.0, 0.0), (20.0, 10.0), (0.0, 10.0)]),
            vec![square(2.0, 4.0), ring(&[(12.0, 3.0), (16.0, 3.0), (14.0, 7.0)])],
        );
        let flat = FlatPolygon::from_polygon(&poly);
        let tris = EarClipper.triangulate(&flat).unwrap();
        assert_eq!(tris.len(), flat.expected_triangle_count());
        assert_eq!(tris.len(), 11 + 4 - 2);
        assert!((cap_area(&flat, &tris) - poly.area()).abs() < 1e-9);
    }

    #[test]
    fn circle_hole_in_square() {
        let mut coords = Vec::new();
        for i in 0..32 {
            let a = f64::from(i) / 32.0 * std::f64::consts::TAU;
            coords.push((5.0 + 2.0 * a.cos(), 5.0 + 2.0 * a.sin()));
        }
        let poly = PolygonWithHoles::new(square(0.0, 10.0), vec![ring(&coords)]);
        let flat = FlatPolygon::from_polygon(&poly);
        let tris = EarClipper.triangulate(&flat).unwrap();
        assert_eq!(tris.len(), 36 + 2 - 2);
        assert!((cap_area(&flat, &tris) - poly.area()).abs() < 1e-9);
    }

    #[test]
    fn collinear_vertex_is_kept() {
        let t = ring(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (1.0, 1.0)]);
        let flat = FlatPolygon::from_exterior(&t);
        let tris = EarClipper.triangulate(&flat).unwrap();
        assert_eq!(tris.len(), 2);
        assert!((cap_area(&flat, &tris) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn collinear_loop_has_no_ear() {
        let points = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(2.0, 0.0)];
        let flat = FlatPolygon::new(points, vec![3]).unwrap();
        let err = EarClipper.triangulate(&flat).unwrap_err();
        assert!(matches!(
            err,
            crate::error::ExtrudoError::Triangulation(TriangulationError::NoEar { remaining: 3 })
        ));
    }
}
