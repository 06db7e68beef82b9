//! Directions provider access.
//!
//! The routing core only sees the [`DirectionsClient`] trait: one request in,
//! a best-first list of candidate routes (or an error) out. This module
//! provides an HTTP implementation for OSRM-compatible route APIs and a mock
//! for tests and offline runs.
//!
//! Key characteristics of the provider:
//! - Positions travel as `lon,lat` on the wire but are `lat, lon` in the domain
//! - "No route between these points" is an empty list, not an error
//! - Instruction text is built locally from structured maneuvers

mod client;
mod convert;
mod error;
pub mod mock;
mod provider;
mod types;

pub use client::{API_KEY_ENV, BASE_URL_ENV, DirectionsConfig, HttpDirectionsClient};
pub use convert::{ConversionError, convert_route, maneuver_text};
pub use error::DirectionsError;
pub use mock::MockDirectionsClient;
pub use provider::DirectionsClient;
pub use types::{GeometryDto, LegDto, ManeuverDto, RouteDto, RouteResponse, StepDto};
