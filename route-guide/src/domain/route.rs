//! Route and step types.
//!
//! A `Route` is what the directions provider returns for one origin and
//! destination pair. Routes are immutable once produced.

use std::fmt;

use chrono::Duration;
use serde::Serialize;

use super::Coordinate;

/// How the traveler moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelMode {
    Walking,
    Driving,
}

impl TravelMode {
    /// Routing profile name understood by OSRM-compatible providers.
    pub fn profile(&self) -> &'static str {
        match self {
            TravelMode::Walking => "walking",
            TravelMode::Driving => "driving",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.profile())
    }
}

/// One maneuver of a route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteStep {
    /// Raw maneuver text as produced by the provider (e.g. "Turn left onto Main Street").
    pub instruction: String,
    /// Distance covered by this step, i.e. to the next maneuver, in meters.
    pub distance: f64,
    /// Geometry of the step. The first point is the maneuver location.
    pub geometry: Vec<Coordinate>,
}

impl RouteStep {
    pub fn new(instruction: impl Into<String>, distance: f64, geometry: Vec<Coordinate>) -> Self {
        Self {
            instruction: instruction.into(),
            distance,
            geometry,
        }
    }

    /// Where the maneuver happens, if the step has any geometry.
    pub fn anchor(&self) -> Option<&Coordinate> {
        self.geometry.first()
    }
}

/// A single directions result between two coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    /// Full route geometry.
    pub geometry: Vec<Coordinate>,
    /// Ordered maneuvers.
    pub steps: Vec<RouteStep>,
    /// Total distance in meters.
    pub distance: f64,
    /// Provider-estimated travel time in seconds.
    pub duration_secs: f64,
}

impl Route {
    pub fn new(
        geometry: Vec<Coordinate>,
        steps: Vec<RouteStep>,
        distance: f64,
        duration_secs: f64,
    ) -> Self {
        Self {
            geometry,
            steps,
            distance,
            duration_secs,
        }
    }

    /// Provider-estimated travel time, rounded to the millisecond.
    pub fn duration(&self) -> Duration {
        secs_to_duration(self.duration_secs)
    }
}

/// Convert fractional seconds to a `Duration` at millisecond precision.
pub(crate) fn secs_to_duration(secs: f64) -> Duration {
    Duration::milliseconds((secs * 1000.0).round() as i64)
}
