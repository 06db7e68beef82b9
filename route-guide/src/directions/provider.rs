//! The directions provider contract.

use std::future::Future;
use std::sync::Arc;

use crate::domain::{Coordinate, Route, TravelMode};

use super::error::DirectionsError;

/// Trait for requesting routes from a directions provider.
///
/// This abstraction isolates routing logic from any specific vendor, and
/// allows the planner to be tested with mock data. One call is one request.
pub trait DirectionsClient {
    /// Request routes from `origin` to `destination`.
    ///
    /// Returns candidates best-first. An empty list means the provider found
    /// no route. With `allow_alternates == false` the provider is asked for a
    /// single route.
    fn request(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: TravelMode,
        allow_alternates: bool,
    ) -> impl Future<Output = Result<Vec<Route>, DirectionsError>> + Send;
}

impl<C: DirectionsClient + Send + Sync> DirectionsClient for Arc<C> {
    fn request(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: TravelMode,
        allow_alternates: bool,
    ) -> impl Future<Output = Result<Vec<Route>, DirectionsError>> + Send {
        (**self).request(origin, destination, mode, allow_alternates)
    }
}
