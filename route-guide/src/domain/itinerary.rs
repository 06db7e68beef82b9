//! Itinerary types.
//!
//! An `Itinerary` is the ordered concatenation of the routes between each pair
//! of consecutive stops. Derived values (totals, flattened steps, combined
//! geometry) are computed once at construction; the itinerary is never
//! mutated afterwards and is replaced wholesale on recomputation.

use chrono::Duration;

use super::route::secs_to_duration;
use super::{Coordinate, DomainError, Route, RouteStep};

/// A multi-stop route.
///
/// # Invariants
///
/// - `segments.len() == stops.len() - 1` and there is at least one segment
/// - `segments[i]` runs from `stops[i]` to `stops[i + 1]`
/// - `steps` is the concatenation of segment steps in stop order
#[derive(Debug, Clone)]
pub struct Itinerary {
    stops: Vec<Coordinate>,
    segments: Vec<Route>,
    steps: Vec<RouteStep>,
    geometry: Vec<Coordinate>,
    total_distance: f64,
    total_duration_secs: f64,
}

impl Itinerary {
    /// Assemble an itinerary from the visited points and one route per consecutive pair.
    ///
    /// `stops` includes the starting point.
    pub fn new(stops: Vec<Coordinate>, segments: Vec<Route>) -> Result<Self, DomainError> {
        if segments.is_empty() {
            return Err(DomainError::EmptyItinerary);
        }

        if stops.len() != segments.len() + 1 {
            return Err(DomainError::SegmentCountMismatch {
                stops: stops.len(),
                segments: segments.len(),
            });
        }

        let mut steps = Vec::with_capacity(segments.iter().map(|s| s.steps.len()).sum());
        let mut geometry: Vec<Coordinate> = Vec::new();

        for segment in &segments {
            steps.extend(segment.steps.iter().cloned());

            // Consecutive segments share their junction point; keep it once.
            let mut points = segment.geometry.iter();
            if let (Some(last), Some(first)) = (geometry.last(), segment.geometry.first())
                && last.approx_eq(first)
            {
                points.next();
            }
            geometry.extend(points.copied());
        }

        let total_distance = segments.iter().map(|s| s.distance).sum();
        let total_duration_secs = segments.iter().map(|s| s.duration_secs).sum();

        Ok(Self {
            stops,
            segments,
            steps,
            geometry,
            total_distance,
            total_duration_secs,
        })
    }

    /// Visited points, starting point first.
    pub fn stops(&self) -> &[Coordinate] {
        &self.stops
    }

    /// Final stop.
    pub fn destination(&self) -> Coordinate {
        // Non-empty by construction.
        self.stops[self.stops.len() - 1]
    }

    /// Per-pair routes, in stop order.
    pub fn segments(&self) -> &[Route] {
        &self.segments
    }

    /// Every step of every segment, in stop order.
    pub fn steps(&self) -> &[RouteStep] {
        &self.steps
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Combined polyline of all segments.
    pub fn geometry(&self) -> &[Coordinate] {
        &self.geometry
    }

    /// Sum of segment distances, in meters.
    pub fn total_distance(&self) -> f64 {
        self.total_distance
    }

    /// Sum of segment durations, in seconds.
    pub fn total_duration_secs(&self) -> f64 {
        self.total_duration_secs
    }

    /// Sum of segment durations.
    pub fn total_duration(&self) -> Duration {
        secs_to_duration(self.total_duration_secs)
    }
}
