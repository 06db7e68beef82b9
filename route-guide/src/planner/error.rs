//! Routing error types.

use crate::directions::DirectionsError;
use crate::domain::DomainError;

/// Error from segment fetching or itinerary aggregation.
///
/// Every variant is terminal for the call that produced it; the caller may
/// re-invoke. Aggregation never reports a mix of success and failure.
#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    /// The stop list cannot produce a route (detected before any provider call)
    #[error("no viable route: {0}")]
    NoViableRoute(String),

    /// The provider answered but had no route for this segment
    #[error("segment {index} unavailable: {cause}")]
    SegmentUnavailable { index: usize, cause: String },

    /// The provider or transport failed for this segment
    #[error("directions provider failed for segment {index}: {source}")]
    Provider {
        index: usize,
        #[source]
        source: DirectionsError,
    },

    /// Segment results could not be assembled into an itinerary
    #[error("could not assemble itinerary: {0}")]
    Assembly(#[from] DomainError),
}

impl RoutingError {
    /// Index of the segment this error belongs to, if any.
    pub fn segment_index(&self) -> Option<usize> {
        match self {
            RoutingError::SegmentUnavailable { index, .. } | RoutingError::Provider { index, .. } => {
                Some(*index)
            }
            RoutingError::NoViableRoute(_) | RoutingError::Assembly(_) => None,
        }
    }
}
