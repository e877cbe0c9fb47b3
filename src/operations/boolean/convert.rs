use geo::{Coord, LineString, MultiPolygon};

use crate::geometry::{PolygonWithHoles, Ring};
use crate::math::{Point2, TOLERANCE};

/// Converts a ring to a closed `geo` line string.
pub fn ring_to_geo(ring: &Ring) -> LineString<f64> {
    let mut coords: Vec<Coord<f64>> = ring.points().iter().map(|p| Coord { x: p.x, y: p.y }).collect();
    if let Some(&first) = coords.first() {
        coords.push(first);
    }
    LineString::new(coords)
}

/// Converts `geo` output back to polygons, dropping degenerate pieces.
///
/// Exteriors or holes with fewer than 3 distinct points or no area are
/// discarded; a discarded exterior discards its holes too.
pub fn polygons_from_geo(multi: &MultiPolygon<f64>) -> Vec<PolygonWithHoles> {
    multi
        .iter()
        .filter_map(|polygon| {
            let exterior = ring_from_geo(polygon.exterior())?;
            let holes = polygon.interiors().iter().filter_map(ring_from_geo).collect();
            Some(PolygonWithHoles::new(exterior, holes))
        })
        .collect()
}

fn ring_from_geo(line: &LineString<f64>) -> Option<Ring> {
    let mut points: Vec<Point2> = line.coords().map(|c| Point2::new(c.x, c.y)).collect();
    points.dedup();
    while points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    let ring = Ring::new(points).ok()?;
    (ring.area() >= TOLERANCE).then_some(ring)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use geo::Polygon as GeoPolygon;

    use super::*;

    #[test]
    fn closing_coordinate_is_added_and_removed() {
        let ring = Ring::from_coords(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]).unwrap();
        let line = ring_to_geo(&ring);
        assert_eq!(line.0.len(), 5);

        let multi = MultiPolygon(vec![GeoPolygon::new(line, vec![])]);
        let back = polygons_from_geo(&multi);
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].exterior.len(), 4);
    }

    #[test]
    fn sliver_output_is_dropped() {
        let line = LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (0.0, 0.0)]);
        let multi = MultiPolygon(vec![GeoPolygon::new(line, vec![])]);
        assert!(polygons_from_geo(&multi).is_empty());
    }
}
