//! OSRM route API response DTOs.
//!
//! These types map directly to the JSON returned by `/route/v1` with
//! `steps=true&geometries=geojson`. Positions are `[longitude, latitude]`
//! pairs. Fields the provider may omit are `Option` or defaulted.

use serde::Deserialize;

/// Top-level response of the route service.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteResponse {
    /// "Ok" on success, otherwise an error code such as "NoRoute".
    pub code: String,

    /// Human-readable detail accompanying an error code.
    pub message: Option<String>,

    /// Candidate routes, best first.
    #[serde(default)]
    pub routes: Vec<RouteDto>,
}

/// One candidate route.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteDto {
    /// Meters.
    pub distance: f64,

    /// Seconds.
    pub duration: f64,

    /// Full route geometry (requires `overview=full`).
    pub geometry: Option<GeometryDto>,

    /// One leg per waypoint pair.
    #[serde(default)]
    pub legs: Vec<LegDto>,
}

/// GeoJSON LineString.
#[derive(Debug, Clone, Deserialize)]
pub struct GeometryDto {
    /// `[lon, lat]` positions.
    pub coordinates: Vec<[f64; 2]>,
}

/// Route between two waypoints.
#[derive(Debug, Clone, Deserialize)]
pub struct LegDto {
    pub distance: f64,
    pub duration: f64,

    /// Present when requested with `steps=true`.
    #[serde(default)]
    pub steps: Vec<StepDto>,
}

/// One maneuver and the road following it.
#[derive(Debug, Clone, Deserialize)]
pub struct StepDto {
    /// Meters to the next maneuver.
    pub distance: f64,

    /// Seconds to the next maneuver.
    pub duration: f64,

    /// Geometry of the road following the maneuver.
    pub geometry: Option<GeometryDto>,

    /// Name of the road following the maneuver (may be empty).
    #[serde(default)]
    pub name: String,

    pub maneuver: ManeuverDto,
}

/// What happens at the start of a step.
#[derive(Debug, Clone, Deserialize)]
pub struct ManeuverDto {
    /// e.g. "depart", "turn", "roundabout", "arrive".
    #[serde(rename = "type")]
    pub kind: String,

    /// e.g. "left", "slight right", "uturn".
    pub modifier: Option<String>,

    /// `[lon, lat]` of the maneuver.
    pub location: [f64; 2],

    /// Roundabout exit number.
    pub exit: Option<u32>,
}
