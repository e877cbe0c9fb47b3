use crate::geometry::CurvePath;
use crate::math::polygon_2d::distance_2d;
use crate::math::Point2;

/// Chains open point paths end-to-end.
///
/// Starting from each unused path in input order, the chain is extended by
/// any unused path whose start or end lies within `epsilon` of the chain's
/// tail (reversing it if needed) until the chain closes or no piece fits.
/// The returned paths are all marked open; the closing policy decides which
/// of them are loops.
#[must_use]
pub fn join_open_paths(paths: Vec<Vec<Point2>>, epsilon: f64) -> Vec<CurvePath> {
    let mut pool: Vec<Option<Vec<Point2>>> = paths
        .into_iter()
        .filter(|p| p.len() >= 2)
        .map(Some)
        .collect();
    let mut joined = Vec::new();

    for start in 0..pool.len() {
        let Some(mut chain) = pool[start].take() else {
            continue;
        };

        loop {
            let (Some(&head), Some(&tail)) = (chain.first(), chain.last()) else {
                break;
            };
            if chain.len() > 2 && distance_2d(&head, &tail) < epsilon {
                break;
            }

            let next = pool.iter().position(|piece| {
                piece.as_ref().is_some_and(|piece| touches(piece, &tail, epsilon))
            });
            let Some(mut piece) = next.and_then(|k| pool[k].take()) else {
                break;
            };
            if piece.first().is_some_and(|p| distance_2d(p, &tail) >= epsilon) {
                piece.reverse();
            }
            chain.extend(piece.into_iter().skip(1));
        }

        joined.push(CurvePath {
            points: chain,
            closed: false,
        });
    }

    joined
}

fn touches(piece: &[Point2], tail: &Point2, epsilon: f64) -> bool {
    let near = |p: Option<&Point2>| p.is_some_and(|p| distance_2d(p, tail) < epsilon);
    near(piece.first()) || near(piece.last())
}
