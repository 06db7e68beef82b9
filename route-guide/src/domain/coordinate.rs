//! Geographic coordinate and stop types.

use std::fmt;

use geo::{Distance, Haversine};
use serde::Serialize;

/// Tolerance (degrees, per axis) under which two coordinates are the same point.
pub const COORDINATE_TOLERANCE_DEG: f64 = 1e-9;

/// Error returned when constructing a coordinate from out-of-range values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid coordinate ({lat}, {lon}): {reason}")]
pub struct InvalidCoordinate {
    lat: f64,
    lon: f64,
    reason: &'static str,
}

/// A WGS84 position in degrees.
///
/// Latitude is always within [-90, 90] and longitude within [-180, 180].
/// Both components are finite. This type guarantees that by construction.
///
/// # Examples
///
/// ```
/// use route_guide::domain::Coordinate;
///
/// let origin = Coordinate::new(0.0, 0.0).unwrap();
/// let east = Coordinate::new(0.0, 0.001).unwrap();
/// assert!((origin.distance_to(&east) - 111.2).abs() < 0.5);
///
/// assert!(Coordinate::new(91.0, 0.0).is_err());
/// assert!(Coordinate::new(0.0, f64::NAN).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

impl Coordinate {
    /// Create a coordinate from latitude and longitude in degrees.
    pub fn new(lat: f64, lon: f64) -> Result<Self, InvalidCoordinate> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(InvalidCoordinate {
                lat,
                lon,
                reason: "components must be finite",
            });
        }

        if !(-90.0..=90.0).contains(&lat) {
            return Err(InvalidCoordinate {
                lat,
                lon,
                reason: "latitude must be within [-90, 90]",
            });
        }

        if !(-180.0..=180.0).contains(&lon) {
            return Err(InvalidCoordinate {
                lat,
                lon,
                reason: "longitude must be within [-180, 180]",
            });
        }

        Ok(Self { lat, lon })
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Great-circle distance to `other`, in meters.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        Haversine.distance(geo::Point::from(*self), geo::Point::from(*other))
    }

    /// True if both components are within [`COORDINATE_TOLERANCE_DEG`].
    pub fn approx_eq(&self, other: &Coordinate) -> bool {
        (self.lat - other.lat).abs() <= COORDINATE_TOLERANCE_DEG
            && (self.lon - other.lon).abs() <= COORDINATE_TOLERANCE_DEG
    }
}

impl fmt::Debug for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coordinate({}, {})", self.lat, self.lon)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lon)
    }
}

impl From<Coordinate> for geo::Point<f64> {
    fn from(c: Coordinate) -> Self {
        geo::Point::new(c.lon, c.lat)
    }
}

/// A stop on an itinerary.
///
/// The name and id belong to the caller; routing only looks at the coordinate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stop {
    /// Where the stop is.
    pub coordinate: Coordinate,
    /// Display name.
    pub name: String,
    /// Caller-side identifier, if any.
    pub id: Option<String>,
}

impl Stop {
    /// Create a stop without an id.
    pub fn new(coordinate: Coordinate, name: impl Into<String>) -> Self {
        Self {
            coordinate,
            name: name.into(),
            id: None,
        }
    }

    /// Attach a caller-side identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

impl From<&Stop> for Coordinate {
    fn from(stop: &Stop) -> Self {
        stop.coordinate
    }
}
