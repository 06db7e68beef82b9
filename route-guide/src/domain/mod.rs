//! Domain types for the route guide.
//!
//! This module contains the core value types shared by aggregation and
//! guidance. Types that carry invariants enforce them at construction time,
//! so code that receives them can trust their validity.

mod coordinate;
mod error;
pub mod geometry;
mod itinerary;
mod position;
mod route;

pub use coordinate::{COORDINATE_TOLERANCE_DEG, Coordinate, InvalidCoordinate, Stop};
pub use error::DomainError;
pub use itinerary::Itinerary;
pub use position::PositionFix;
pub use route::{Route, RouteStep, TravelMode};
