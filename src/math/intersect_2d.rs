use super::{cross, Point2};

/// Returns `true` if segments `a0-a1` and `b0-b1` share at least one point,
/// including touching endpoints and collinear overlap.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn segments_touch(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2) -> bool {
    let d1 = cross(b0, b1, a0);
    let d2 = cross(b0, b1, a1);
    let d3 = cross(a0, a1, b0);
    let d4 = cross(a0, a1, b1);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && on_segment(b0, b1, a0))
        || (d2 == 0.0 && on_segment(b0, b1, a1))
        || (d3 == 0.0 && on_segment(a0, a1, b0))
        || (d4 == 0.0 && on_segment(a0, a1, b1))
}

/// For a point `p` known to be collinear with `a-b`, checks it lies within the segment box.
fn on_segment(a: &Point2, b: &Point2, p: &Point2) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// Finds the first pair of ring edges that intersect each other.
///
/// Edge `i` runs from `points[i]` to `points[(i + 1) % n]`. Adjacent edges
/// may share their common vertex but must not fold back over each other.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn first_self_intersection(points: &[Point2]) -> Option<(usize, usize)> {
    let n = points.len();
    if n < 3 {
        return None;
    }
    for i in 0..n {
        let a0 = &points[i];
        let a1 = &points[(i + 1) % n];
        for j in (i + 1)..n {
            let b0 = &points[j];
            let b1 = &points[(j + 1) % n];
            let adjacent = j == i + 1 || (i == 0 && j == n - 1);
            if adjacent {
                // Shared vertex is fine; a collinear fold-back is not.
                let (shared, far_a, far_b) = if j == i + 1 { (a1, a0, b1) } else { (a0, a1, b0) };
                let fold = cross(shared, far_a, far_b) == 0.0
                    && (far_a - shared).dot(&(far_b - shared)) > 0.0;
                if fold {
                    return Some((i, j));
                }
            } else if segments_touch(a0, a1, b0, b1) {
                return Some((i, j));
            }
        }
    }
    None
}
