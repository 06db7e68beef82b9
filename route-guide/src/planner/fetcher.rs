//! Single-segment route fetching.
//!
//! Wraps one directions request with segment semantics: the canonical path
//! between two consecutive stops, never provider-suggested alternatives.

use tracing::{debug, trace};

use crate::directions::DirectionsClient;
use crate::domain::{Coordinate, Route, TravelMode};

use super::error::RoutingError;

/// Fetches the route for one segment of an itinerary.
#[derive(Debug, Clone)]
pub struct SegmentFetcher<C> {
    client: C,
}

impl<C: DirectionsClient> SegmentFetcher<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// The underlying directions client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Fetch the single canonical route for segment `index`.
    ///
    /// Issues exactly one request with alternates disabled. Zero candidates is
    /// `SegmentUnavailable`; a provider error is wrapped as `Provider`.
    pub async fn fetch_segment(
        &self,
        index: usize,
        from: Coordinate,
        to: Coordinate,
        mode: TravelMode,
    ) -> Result<Route, RoutingError> {
        trace!(index, %from, %to, %mode, "Fetching segment");

        let candidates = self
            .client
            .request(from, to, mode, false)
            .await
            .map_err(|source| RoutingError::Provider { index, source })?;

        candidates
            .into_iter()
            .next()
            .ok_or_else(|| RoutingError::SegmentUnavailable {
                index,
                cause: format!("no route from {from} to {to}"),
            })
    }

    /// Fetch a route that deliberately differs from the primary one.
    ///
    /// Asks for alternates and returns the second candidate. The first
    /// candidate is the primary route and is skipped on purpose. Returns
    /// `None` when the provider offers no alternative. Errors carry `index`
    /// the same way [`fetch_segment`](Self::fetch_segment) does.
    pub async fn fetch_alternative(
        &self,
        index: usize,
        from: Coordinate,
        to: Coordinate,
        mode: TravelMode,
    ) -> Result<Option<Route>, RoutingError> {
        let candidates = self
            .client
            .request(from, to, mode, true)
            .await
            .map_err(|source| RoutingError::Provider { index, source })?;

        if candidates.is_empty() {
            return Err(RoutingError::SegmentUnavailable {
                index,
                cause: format!("no route from {from} to {to}"),
            });
        }

        debug!(index, candidates = candidates.len(), "Alternative route request complete");
        Ok(candidates.into_iter().nth(1))
    }
}
