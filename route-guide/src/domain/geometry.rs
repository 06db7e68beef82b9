//! Distances between a point and route geometry.
//!
//! Closest points lie on great-circle arcs, found with geo's
//! [`HaversineClosestPoint`] and measured with haversine.

use geo::{Closest, Distance, Haversine, HaversineClosestPoint, Line, Point};

use super::Coordinate;

/// Distance in meters from `point` to the great-circle segment `a`-`b`.
pub fn distance_to_segment(point: &Coordinate, a: &Coordinate, b: &Coordinate) -> f64 {
    if a == b {
        return point.distance_to(a);
    }

    let from = Point::from(*point);
    let line = Line::new(Point::from(*a), Point::from(*b));
    match line.haversine_closest_point(&from) {
        Closest::Intersection(closest) | Closest::SinglePoint(closest) => {
            Haversine.distance(from, closest)
        }
        Closest::Indeterminate => point.distance_to(a).min(point.distance_to(b)),
    }
}

/// Distance in meters from `point` to the nearest point of `line`.
///
/// Returns `None` for an empty line. A single-point line degenerates to a
/// point distance.
pub fn distance_to_polyline(point: &Coordinate, line: &[Coordinate]) -> Option<f64> {
    match line {
        [] => None,
        [only] => Some(point.distance_to(only)),
        _ => line
            .windows(2)
            .map(|w| distance_to_segment(point, &w[0], &w[1]))
            .min_by(f64::total_cmp),
    }
}
