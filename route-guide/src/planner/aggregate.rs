//! Multi-stop itinerary aggregation.
//!
//! Fans out one segment fetch per consecutive stop pair, fans the results
//! back in through slots indexed by segment number, and produces either a
//! complete itinerary or a single error. Completion order never affects the
//! result: segments are assembled in stop order and the reported failure is
//! the one with the lowest segment index.

use futures::future::join_all;
use tracing::{debug, warn};

use crate::directions::DirectionsClient;
use crate::domain::{Coordinate, Itinerary, Route, Stop, TravelMode};

use super::config::AggregatorConfig;
use super::error::RoutingError;
use super::fetcher::SegmentFetcher;

/// Computes itineraries for ordered stop lists.
#[derive(Debug, Clone)]
pub struct RouteAggregator<C> {
    fetcher: SegmentFetcher<C>,
    config: AggregatorConfig,
}

impl<C: DirectionsClient> RouteAggregator<C> {
    /// Create a new aggregator.
    pub fn new(client: C, config: AggregatorConfig) -> Self {
        Self {
            fetcher: SegmentFetcher::new(client),
            config,
        }
    }

    /// The segment fetcher, for single-segment and alternative-route requests.
    pub fn fetcher(&self) -> &SegmentFetcher<C> {
        &self.fetcher
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Compute the itinerary `start -> stops[0] -> ... -> stops[n-1]`.
    ///
    /// Fails with `NoViableRoute` before any provider call when `stops` is
    /// empty or every point coincides. Segment fetches run concurrently in
    /// batches of `max_concurrent_segments`; every fetch of a batch is
    /// awaited even when a sibling fails. No caching and no retries.
    ///
    /// Dropping the returned future cancels all outstanding fetches.
    pub async fn compute_itinerary(
        &self,
        start: Coordinate,
        stops: &[Coordinate],
        mode: TravelMode,
    ) -> Result<Itinerary, RoutingError> {
        let points = validate_points(start, stops)?;
        let pairs = segment_pairs(&points);
        let batch_size = self.config.batch_size();

        debug!(
            segments = pairs.len(),
            batch_size,
            %mode,
            "Computing itinerary"
        );

        // One slot per segment, filled by index regardless of completion order.
        let mut slots: Vec<Option<Result<Route, RoutingError>>> =
            std::iter::repeat_with(|| None).take(pairs.len()).collect();

        for (batch_idx, batch) in pairs.chunks(batch_size).enumerate() {
            let first_index = batch_idx * batch_size;

            let futures: Vec<_> = batch
                .iter()
                .enumerate()
                .map(|(offset, &(from, to))| {
                    let index = first_index + offset;
                    async move {
                        let result = self.fetcher.fetch_segment(index, from, to, mode).await;
                        (index, result)
                    }
                })
                .collect();

            let mut batch_failed = false;
            for (index, result) in join_all(futures).await {
                batch_failed |= result.is_err();
                slots[index] = Some(result);
            }

            // Lower indices are all settled; a later batch cannot change the outcome.
            if batch_failed {
                break;
            }
        }

        let fetched = slots.iter().filter(|s| matches!(s, Some(Ok(_)))).count();

        let mut routes = Vec::with_capacity(pairs.len());
        for (index, slot) in slots.into_iter().enumerate() {
            match slot {
                Some(Ok(route)) => routes.push(route),
                Some(Err(e)) => {
                    warn!(
                        index,
                        fetched,
                        total = pairs.len(),
                        error = %e,
                        "Itinerary aggregation failed"
                    );
                    return Err(e);
                }
                None => {
                    return Err(RoutingError::SegmentUnavailable {
                        index,
                        cause: "segment was not fetched".to_string(),
                    });
                }
            }
        }

        let itinerary = Itinerary::new(points, routes)?;

        debug!(
            segments = itinerary.segments().len(),
            steps = itinerary.step_count(),
            distance_m = itinerary.total_distance(),
            duration_s = itinerary.total_duration_secs(),
            "Itinerary computed"
        );

        Ok(itinerary)
    }

    /// Compute an itinerary for caller-side stops.
    pub async fn compute_itinerary_for_stops(
        &self,
        start: Coordinate,
        stops: &[Stop],
        mode: TravelMode,
    ) -> Result<Itinerary, RoutingError> {
        let coordinates: Vec<Coordinate> = stops.iter().map(Coordinate::from).collect();
        self.compute_itinerary(start, &coordinates, mode).await
    }

    /// Compute a fresh itinerary from the traveler's position to the destination.
    ///
    /// Used to answer a reroute request from guidance.
    pub async fn compute_reroute(
        &self,
        from: Coordinate,
        destination: Coordinate,
        mode: TravelMode,
    ) -> Result<Itinerary, RoutingError> {
        self.compute_itinerary(from, &[destination], mode).await
    }

    /// Fetch a deliberately different route for segment `index` of `itinerary`.
    pub async fn compute_alternative(
        &self,
        itinerary: &Itinerary,
        index: usize,
        mode: TravelMode,
    ) -> Result<Option<Route>, RoutingError> {
        let stops = itinerary.stops();
        let (Some(&from), Some(&to)) = (stops.get(index), stops.get(index + 1)) else {
            return Err(RoutingError::SegmentUnavailable {
                index,
                cause: format!("itinerary has {} segments", itinerary.segments().len()),
            });
        };
        self.fetcher.fetch_alternative(index, from, to, mode).await
    }
}

/// Check the preconditions and return `[start, stops...]`.
fn validate_points(start: Coordinate, stops: &[Coordinate]) -> Result<Vec<Coordinate>, RoutingError> {
    if stops.is_empty() {
        return Err(RoutingError::NoViableRoute("no stops given".to_string()));
    }

    if stops.iter().all(|stop| stop.approx_eq(&start)) {
        return Err(RoutingError::NoViableRoute(
            "all points coincide".to_string(),
        ));
    }

    let mut points = Vec::with_capacity(stops.len() + 1);
    points.push(start);
    points.extend_from_slice(stops);
    Ok(points)
}

/// Consecutive `(from, to)` pairs over the visited points.
fn segment_pairs(points: &[Coordinate]) -> Vec<(Coordinate, Coordinate)> {
    points.windows(2).map(|w| (w[0], w[1])).collect()
}

#[cfg(test)]
#[path = "aggregate_tests.rs"]
mod aggregate_tests;
